//! # Analysis Settings
//!
//! Defaults for per-call configuration: water density, the heel sweep, and
//! the intact-stability criteria limits. Every field falls back to its
//! default when absent from a case file, so a partial settings object such as
//! `{"criteria": {"downflooding_angle_deg": 35.0}}` is valid.
//!
//! The criteria defaults are the IMO intact-stability general criteria
//! (2008 IS Code, Part A, 2.2).

use serde::{Deserialize, Serialize};

use crate::errors::{HydroError, HydroResult};
use crate::stability::StabilityMethod;
use crate::units::KgPerCubicMeter;

/// Settings applied to every calculation in a case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Water density for loadcases built from a bare KG (kg/m³)
    pub water_density_kg_m3: f64,

    /// Default heel sweep
    pub sweep: SweepSettings,

    /// Intact-stability limits
    pub criteria: CriteriaLimits,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            water_density_kg_m3: KgPerCubicMeter::SEA_WATER.0,
            sweep: SweepSettings::default(),
            criteria: CriteriaLimits::default(),
        }
    }
}

impl AnalysisSettings {
    /// Validate input parameters.
    pub fn validate(&self) -> HydroResult<()> {
        if !self.water_density_kg_m3.is_finite() || self.water_density_kg_m3 <= 0.0 {
            return Err(HydroError::invalid_input(
                "settings.water_density_kg_m3",
                self.water_density_kg_m3.to_string(),
                "Water density must be positive",
            ));
        }
        self.criteria.validate()
    }
}

/// Heel sweep bounds (deg) and method.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SweepSettings {
    pub min_angle_deg: f64,
    pub max_angle_deg: f64,
    pub angle_step_deg: f64,
    pub method: StabilityMethod,
}

impl Default for SweepSettings {
    fn default() -> Self {
        SweepSettings {
            min_angle_deg: 0.0,
            max_angle_deg: 60.0,
            angle_step_deg: 1.0,
            method: StabilityMethod::WallSided,
        }
    }
}

/// Thresholds for the six intact-stability criteria.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CriteriaLimits {
    /// Minimum area under GZ from 0° to 30° (m·rad)
    pub min_area_0_30_m_rad: f64,

    /// Minimum area under GZ from 0° to 40° or downflooding (m·rad)
    pub min_area_0_40_m_rad: f64,

    /// Minimum area under GZ from 30° to 40° or downflooding (m·rad)
    pub min_area_30_40_m_rad: f64,

    /// Minimum GZ at or beyond `max_gz_reference_angle_deg` (m)
    pub min_max_gz_m: f64,

    /// Heel beyond which the GZ requirement applies (deg)
    pub max_gz_reference_angle_deg: f64,

    /// Minimum heel of the GZ maximum (deg)
    pub min_angle_at_max_gz_deg: f64,

    /// Minimum initial GMt (m)
    pub min_gmt_m: f64,

    /// Heel at which unprotected openings immerse (deg), if below 40°
    pub downflooding_angle_deg: Option<f64>,
}

impl Default for CriteriaLimits {
    fn default() -> Self {
        CriteriaLimits {
            min_area_0_30_m_rad: 0.055,
            min_area_0_40_m_rad: 0.090,
            min_area_30_40_m_rad: 0.030,
            min_max_gz_m: 0.20,
            max_gz_reference_angle_deg: 30.0,
            min_angle_at_max_gz_deg: 25.0,
            min_gmt_m: 0.15,
            downflooding_angle_deg: None,
        }
    }
}

impl CriteriaLimits {
    /// Upper bound of the 0°–40° and 30°–40° area ranges (deg)
    pub fn upper_area_bound_deg(&self) -> f64 {
        match self.downflooding_angle_deg {
            Some(flood) => flood.min(40.0),
            None => 40.0,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> HydroResult<()> {
        if let Some(flood) = self.downflooding_angle_deg {
            if !flood.is_finite() || flood <= 0.0 || flood >= 90.0 {
                return Err(HydroError::invalid_input(
                    "criteria.downflooding_angle_deg",
                    flood.to_string(),
                    "Downflooding angle must lie between 0° and 90°",
                ));
            }
        }
        if !self.max_gz_reference_angle_deg.is_finite() || self.max_gz_reference_angle_deg < 0.0 {
            return Err(HydroError::invalid_input(
                "criteria.max_gz_reference_angle_deg",
                self.max_gz_reference_angle_deg.to_string(),
                "Reference angle must be zero or positive",
            ));
        }
        Ok(())
    }
}
