//! # Loading Condition
//!
//! The two numbers the hydrostatic core needs from a loading condition:
//! the density of the water the hull floats in and the height of the
//! vessel's centre of gravity above the keel (KG).
//!
//! KG may be given directly or derived from a list of weight items.
//!
//! ```rust
//! use hydro_core::loadcase::{Loadcase, LoadItem};
//!
//! let items = [
//!     LoadItem::new("Lightship", 2_000_000.0, 4.0),
//!     LoadItem::new("Cargo", 6_000_000.0, 2.0),
//! ];
//! let lc = Loadcase::from_items(1025.0, &items).unwrap();
//! assert!((lc.kg_m - 2.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{HydroError, HydroResult};
use crate::units::KgPerCubicMeter;

/// Water density and vertical centre of gravity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Loadcase {
    /// Water density ρ (kg/m³)
    pub water_density_kg_m3: f64,

    /// Vertical centre of gravity above keel, KG (m)
    pub kg_m: f64,
}

impl Loadcase {
    /// Create a validated loadcase.
    pub fn new(water_density_kg_m3: f64, kg_m: f64) -> HydroResult<Self> {
        let lc = Loadcase {
            water_density_kg_m3,
            kg_m,
        };
        lc.validate()?;
        Ok(lc)
    }

    /// Loadcase in standard sea water (1025 kg/m³)
    pub fn sea_water(kg_m: f64) -> HydroResult<Self> {
        Loadcase::new(KgPerCubicMeter::SEA_WATER.0, kg_m)
    }

    /// Loadcase in fresh water (1000 kg/m³)
    pub fn fresh_water(kg_m: f64) -> HydroResult<Self> {
        Loadcase::new(KgPerCubicMeter::FRESH_WATER.0, kg_m)
    }

    /// Derive KG as the mass-weighted mean of the items' vertical centres.
    pub fn from_items(water_density_kg_m3: f64, items: &[LoadItem]) -> HydroResult<Self> {
        if items.is_empty() {
            return Err(HydroError::invalid_input(
                "items",
                "[]",
                "At least one load item is required",
            ));
        }
        let mut total_mass = 0.0;
        let mut moment = 0.0;
        for item in items {
            item.validate()?;
            total_mass += item.mass_kg;
            moment += item.mass_kg * item.vcg_m;
        }
        if total_mass <= 0.0 {
            return Err(HydroError::invalid_input(
                "items",
                total_mass.to_string(),
                "Total mass must be positive",
            ));
        }
        Loadcase::new(water_density_kg_m3, moment / total_mass)
    }

    /// Validate input parameters.
    pub fn validate(&self) -> HydroResult<()> {
        if !self.water_density_kg_m3.is_finite() || self.water_density_kg_m3 <= 0.0 {
            return Err(HydroError::invalid_input(
                "water_density_kg_m3",
                self.water_density_kg_m3.to_string(),
                "Water density must be positive",
            ));
        }
        if !self.kg_m.is_finite() {
            return Err(HydroError::invalid_input(
                "kg_m",
                self.kg_m.to_string(),
                "KG must be finite",
            ));
        }
        Ok(())
    }
}

/// A single weight contributing to KG.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadItem {
    /// Description (e.g., "Lightship", "Fuel tank 3P")
    pub name: String,

    /// Mass (kg)
    pub mass_kg: f64,

    /// Vertical centre of the item above keel (m)
    pub vcg_m: f64,
}

impl LoadItem {
    pub fn new(name: impl Into<String>, mass_kg: f64, vcg_m: f64) -> Self {
        LoadItem {
            name: name.into(),
            mass_kg,
            vcg_m,
        }
    }

    fn validate(&self) -> HydroResult<()> {
        if !self.mass_kg.is_finite() || self.mass_kg < 0.0 {
            return Err(HydroError::invalid_input(
                format!("items.{}.mass_kg", self.name),
                self.mass_kg.to_string(),
                "Mass must be zero or positive",
            ));
        }
        if !self.vcg_m.is_finite() {
            return Err(HydroError::invalid_input(
                format!("items.{}.vcg_m", self.name),
                self.vcg_m.to_string(),
                "VCG must be finite",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_density() {
        assert!(Loadcase::new(0.0, 3.0).is_err());
        assert!(Loadcase::new(-1025.0, 3.0).is_err());
        assert!(Loadcase::new(1025.0, f64::NAN).is_err());
        assert!(Loadcase::new(1000.0, -0.5).is_ok());
    }

    #[test]
    fn test_sea_water_density() {
        let lc = Loadcase::sea_water(5.0).unwrap();
        assert_eq!(lc.water_density_kg_m3, 1025.0);
        let fresh = Loadcase::fresh_water(5.0).unwrap();
        assert_eq!(fresh.water_density_kg_m3, 1000.0);
    }

    #[test]
    fn test_from_items() {
        let items = [LoadItem::new("A", 1000.0, 1.0), LoadItem::new("B", 3000.0, 5.0)];
        let lc = Loadcase::from_items(1000.0, &items).unwrap();
        assert!((lc.kg_m - 4.0).abs() < 1e-12);

        assert!(Loadcase::from_items(1000.0, &[]).is_err());
        assert!(Loadcase::from_items(1000.0, &[LoadItem::new("empty", 0.0, 2.0)]).is_err());
        assert!(Loadcase::from_items(1000.0, &[LoadItem::new("neg", -5.0, 2.0)]).is_err());
    }
}
