//! # Vessel Case
//!
//! A `VesselCase` bundles everything a command-line run needs: the hull
//! offset table, the loading condition and the analysis settings. Cases
//! serialize to human-readable JSON (see [`crate::case_io`] for atomic saves).
//!
//! ## Structure
//!
//! ```text
//! VesselCase
//! ├── version: schema version of the file
//! ├── name: free-form label
//! ├── hull: HullGeometry (stations, waterlines, half-breadths)
//! ├── loadcase: Loadcase (water density, KG)
//! └── settings: AnalysisSettings (sweep, criteria limits)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::case::VesselCase;
//!
//! let case = VesselCase::sample_barge().unwrap();
//! let json = serde_json::to_string_pretty(&case).unwrap();
//! let back: VesselCase = serde_json::from_str(&json).unwrap();
//! assert_eq!(case, back);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::HydroResult;
use crate::geometry::HullGeometry;
use crate::loadcase::Loadcase;
use crate::settings::AnalysisSettings;
use crate::stability::GzCurveInput;

/// Current schema version for case files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root container of a case file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VesselCase {
    /// Schema version the file was written with
    pub version: String,

    /// Vessel or case label
    pub name: String,

    /// Offset table, validated on load
    pub hull: HullGeometry,

    /// Water density and KG
    pub loadcase: Loadcase,

    /// Sweep defaults and criteria limits
    #[serde(default)]
    pub settings: AnalysisSettings,
}

impl VesselCase {
    /// Create a case with default settings at the current schema version.
    pub fn new(name: impl Into<String>, hull: HullGeometry, loadcase: Loadcase) -> Self {
        VesselCase {
            version: SCHEMA_VERSION.to_string(),
            name: name.into(),
            hull,
            loadcase,
            settings: AnalysisSettings::default(),
        }
    }

    /// Replace the analysis settings.
    pub fn with_settings(mut self, settings: AnalysisSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Heel sweep at `draft_m` using the case's sweep settings.
    pub fn gz_input(&self, draft_m: f64) -> GzCurveInput {
        GzCurveInput::from_sweep(draft_m, &self.settings.sweep)
    }

    /// Loadcase at `kg_m` in the settings' water density.
    pub fn loadcase_with_kg(&self, kg_m: f64) -> HydroResult<Loadcase> {
        Loadcase::new(self.settings.water_density_kg_m3, kg_m)
    }

    /// Validate loadcase and settings; the hull is validated on construction.
    pub fn validate(&self) -> HydroResult<()> {
        self.loadcase.validate()?;
        self.settings.validate()
    }

    /// 100 m × 20 m × 10 m box barge, KG 6 m, sea water.
    pub fn sample_barge() -> HydroResult<Self> {
        let hull = HullGeometry::rectangular_barge(100.0, 20.0, 10.0, 21, 41)?;
        Ok(VesselCase::new("Box barge 100x20x10", hull, Loadcase::sea_water(6.0)?))
    }

    /// Wigley hull L = 100 m, B = 10 m, T = 6.25 m, KG 4 m, sea water.
    pub fn sample_wigley() -> HydroResult<Self> {
        let hull = HullGeometry::wigley(100.0, 10.0, 6.25, 10.0, 41, 33)?;
        Ok(VesselCase::new("Wigley 100x10x6.25", hull, Loadcase::sea_water(4.0)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_case_uses_current_version() {
        let case = VesselCase::sample_barge().unwrap();
        assert_eq!(case.version, SCHEMA_VERSION);
        assert_eq!(case.settings, AnalysisSettings::default());
        assert!(case.validate().is_ok());
    }

    #[test]
    fn test_settings_optional_in_json() {
        let json = r#"{
            "version": "0.1.0",
            "name": "pontoon",
            "hull": {
                "stations_m": [0.0, 10.0],
                "waterlines_m": [0.0, 2.0],
                "half_breadths_m": [[3.0, 3.0], [3.0, 3.0]]
            },
            "loadcase": {"water_density_kg_m3": 1000.0, "kg_m": 1.5}
        }"#;
        let case: VesselCase = serde_json::from_str(json).unwrap();
        assert_eq!(case.hull.station_count(), 2);
        assert_eq!(case.settings.sweep.max_angle_deg, 60.0);
    }

    #[test]
    fn test_invalid_hull_rejected_on_deserialize() {
        let json = r#"{
            "version": "0.1.0",
            "name": "bad",
            "hull": {
                "stations_m": [10.0, 0.0],
                "waterlines_m": [0.0, 2.0],
                "half_breadths_m": [[3.0, 3.0], [3.0, 3.0]]
            },
            "loadcase": {"water_density_kg_m3": 1000.0, "kg_m": 1.5}
        }"#;
        assert!(serde_json::from_str::<VesselCase>(json).is_err());
    }

    #[test]
    fn test_gz_input_follows_sweep_settings() {
        let mut case = VesselCase::sample_wigley().unwrap();
        case.settings.sweep.max_angle_deg = 45.0;
        let input = case.gz_input(5.0);
        assert_eq!(input.draft_m, 5.0);
        assert_eq!(input.max_angle_deg, 45.0);
        assert_eq!(input.angle_step_deg, 1.0);
    }

    #[test]
    fn test_loadcase_with_kg_uses_settings_density() {
        let mut case = VesselCase::sample_barge().unwrap();
        case.settings.water_density_kg_m3 = 1000.0;
        let lc = case.loadcase_with_kg(3.0).unwrap();
        assert_eq!(lc.water_density_kg_m3, 1000.0);
        assert_eq!(lc.kg_m, 3.0);
        assert!(case.loadcase_with_kg(f64::NAN).is_err());
    }
}
