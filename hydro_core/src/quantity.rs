//! # Defined / Undefined Quantities
//!
//! Ratios such as BMt = I/V or Cb = V/(L·B·T) have no value when their
//! denominator vanishes (a hull at zero draft, a draft below the keel of every
//! station...). Instead of NaN or a silent zero they are carried as
//! [`Quantity::Undefined`] with the reason attached.
//!
//! ```rust
//! use hydro_core::quantity::{Quantity, UndefinedReason};
//!
//! let bm = Quantity::ratio(0.0, 0.0, UndefinedReason::ZeroVolume);
//! assert!(!bm.is_defined());
//! assert!(bm.require("BMt").is_err());
//!
//! let cb = Quantity::ratio(6.0, 8.0, UndefinedReason::ZeroBoundingBox);
//! assert_eq!(cb.value(), Some(0.75));
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{HydroError, HydroResult};

/// Denominators smaller than this (in SI base units) count as zero.
pub const ZERO_TOLERANCE: f64 = 1e-12;

/// Why a derived quantity has no value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UndefinedReason {
    /// Displaced volume is zero
    ZeroVolume,
    /// Waterplane area is zero
    ZeroWaterplaneArea,
    /// Midship sectional area is zero
    ZeroMidshipArea,
    /// Lpp, beam or draft is zero
    ZeroBoundingBox,
    /// Needs a loadcase and none was supplied
    NoLoadcase,
}

impl std::fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            UndefinedReason::ZeroVolume => "displaced volume is zero",
            UndefinedReason::ZeroWaterplaneArea => "waterplane area is zero",
            UndefinedReason::ZeroMidshipArea => "midship sectional area is zero",
            UndefinedReason::ZeroBoundingBox => "length, beam or draft is zero",
            UndefinedReason::NoLoadcase => "no loadcase supplied",
        };
        f.write_str(text)
    }
}

/// A numeric result that may be mathematically undefined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status")]
pub enum Quantity {
    Defined { value: f64 },
    Undefined { reason: UndefinedReason },
}

impl Quantity {
    /// Wrap a known value
    pub fn defined(value: f64) -> Self {
        Quantity::Defined { value }
    }

    /// Mark as undefined
    pub fn undefined(reason: UndefinedReason) -> Self {
        Quantity::Undefined { reason }
    }

    /// `numerator / denominator`, undefined when the denominator is (near) zero
    pub fn ratio(numerator: f64, denominator: f64, reason: UndefinedReason) -> Self {
        if denominator.abs() <= ZERO_TOLERANCE {
            Quantity::undefined(reason)
        } else {
            Quantity::defined(numerator / denominator)
        }
    }

    /// The value, if defined
    pub fn value(&self) -> Option<f64> {
        match self {
            Quantity::Defined { value } => Some(*value),
            Quantity::Undefined { .. } => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Quantity::Defined { .. })
    }

    /// The value, or an `UndefinedQuantity` error naming `quantity`
    pub fn require(&self, quantity: &str) -> HydroResult<f64> {
        match self {
            Quantity::Defined { value } => Ok(*value),
            Quantity::Undefined { reason } => {
                Err(HydroError::undefined(quantity, reason.to_string()))
            }
        }
    }

    /// Apply `f` to a defined value; undefined stays undefined
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Quantity::Defined { value } => Quantity::defined(f(value)),
            undefined => undefined,
        }
    }

    /// Combine two quantities; undefined if either is
    pub fn zip_with(self, other: Quantity, f: impl FnOnce(f64, f64) -> f64) -> Self {
        match (self, other) {
            (Quantity::Defined { value: a }, Quantity::Defined { value: b }) => {
                Quantity::defined(f(a, b))
            }
            (Quantity::Undefined { reason }, _) | (_, Quantity::Undefined { reason }) => {
                Quantity::undefined(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_guards_zero_denominator() {
        assert_eq!(
            Quantity::ratio(1.0, 0.0, UndefinedReason::ZeroWaterplaneArea),
            Quantity::undefined(UndefinedReason::ZeroWaterplaneArea)
        );
        assert_eq!(Quantity::ratio(1.0, 4.0, UndefinedReason::ZeroVolume).value(), Some(0.25));
    }

    #[test]
    fn test_require_reports_quantity_name() {
        let err = Quantity::undefined(UndefinedReason::ZeroVolume).require("GMt").unwrap_err();
        match err {
            HydroError::UndefinedQuantity { quantity, reason } => {
                assert_eq!(quantity, "GMt");
                assert!(reason.contains("volume"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_zip_with_propagates_first_reason() {
        let a = Quantity::defined(2.0);
        let b = Quantity::undefined(UndefinedReason::NoLoadcase);
        assert_eq!(a.zip_with(b, |x, y| x + y), Quantity::undefined(UndefinedReason::NoLoadcase));
        assert_eq!(a.zip_with(Quantity::defined(3.0), |x, y| x * y).value(), Some(6.0));
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_string(&Quantity::defined(1.5)).unwrap();
        assert_eq!(json, r#"{"status":"Defined","value":1.5}"#);
        let json =
            serde_json::to_string(&Quantity::undefined(UndefinedReason::ZeroVolume)).unwrap();
        assert_eq!(json, r#"{"status":"Undefined","reason":"ZeroVolume"}"#);
    }
}
