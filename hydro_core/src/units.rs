//! # Unit Types
//!
//! Type-safe wrappers for the handful of units the hydrostatics core deals in.
//! They are plain f64 newtypes and serialize as bare numbers.
//!
//! ## SI Units (Primary)
//!
//! hydro_core works in SI throughout:
//! - Length: metres (m)
//! - Angle: degrees at the API boundary, radians inside formulas
//! - Density: kilograms per cubic metre (kg/m³)
//! - Mass: kilograms (kg), tonnes (t = 1000 kg)
//!
//! Unit conversion for display (feet, long tons...) belongs to the caller.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::units::{Degrees, Radians};
//!
//! let heel = Degrees(30.0);
//! let rad: Radians = heel.into();
//! assert!((rad.0 - std::f64::consts::FRAC_PI_6).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Angle
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Radians(pub f64);

impl From<Degrees> for Radians {
    fn from(deg: Degrees) -> Self {
        Radians(deg.0.to_radians())
    }
}

impl From<Radians> for Degrees {
    fn from(rad: Radians) -> Self {
        Degrees(rad.0.to_degrees())
    }
}

// ============================================================================
// Density & Mass
// ============================================================================

/// Density in kilograms per cubic metre
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerCubicMeter(pub f64);

impl KgPerCubicMeter {
    /// Standard salt water
    pub const SEA_WATER: KgPerCubicMeter = KgPerCubicMeter(1025.0);
    /// Fresh water
    pub const FRESH_WATER: KgPerCubicMeter = KgPerCubicMeter(1000.0);
}

impl Default for KgPerCubicMeter {
    fn default() -> Self {
        KgPerCubicMeter::SEA_WATER
    }
}

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Mass in metric tonnes (1 t = 1000 kg)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tonnes(pub f64);

impl From<Kilograms> for Tonnes {
    fn from(kg: Kilograms) -> Self {
        Tonnes(kg.0 / 1000.0)
    }
}

impl From<Tonnes> for Kilograms {
    fn from(t: Tonnes) -> Self {
        Kilograms(t.0 * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_radian_conversion() {
        let rad: Radians = Degrees(180.0).into();
        assert!((rad.0 - std::f64::consts::PI).abs() < 1e-12);
        let back: Degrees = rad.into();
        assert!((back.0 - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_mass_conversion() {
        let t: Tonnes = Kilograms(10_250_000.0).into();
        assert!((t.0 - 10_250.0).abs() < 1e-9);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Degrees(5.5)).unwrap();
        assert_eq!(json, "5.5");
        assert_eq!(KgPerCubicMeter::default(), KgPerCubicMeter::SEA_WATER);
    }
}
