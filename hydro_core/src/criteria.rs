//! # Intact Stability Criteria
//!
//! Evaluates a righting-arm curve against the IMO general intact-stability
//! criteria:
//!
//! | # | Criterion | Requirement |
//! |---|-----------|-------------|
//! | 1 | Area under GZ, 0°–30° | ≥ 0.055 m·rad |
//! | 2 | Area under GZ, 0°–40° (or downflooding) | ≥ 0.090 m·rad |
//! | 3 | Area under GZ, 30°–40° (or downflooding) | ≥ 0.030 m·rad |
//! | 4 | GZ at heel ≥ 30° | ≥ 0.20 m |
//! | 5 | Angle of maximum GZ | ≥ 25° |
//! | 6 | Initial GMt | ≥ 0.15 m |
//!
//! Limits come from [`CriteriaLimits`]; the defaults are the table above.
//!
//! ## Range Bounds
//!
//! Areas are integrated over the curve's (radian, GZ) samples. When a range
//! bound (30°, 40°, downflooding) falls between two samples the curve is
//! linearly interpolated at the exact bound; the nearest sample is never
//! substituted.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::criteria::check_intact_stability;
//! use hydro_core::geometry::HullGeometry;
//! use hydro_core::loadcase::Loadcase;
//! use hydro_core::stability::{compute_gz_curve, GzCurveInput};
//!
//! let barge = HullGeometry::rectangular_barge(100.0, 20.0, 10.0, 21, 21).unwrap();
//! let lc = Loadcase::new(1025.0, 4.0).unwrap();
//! let curve = compute_gz_curve(&barge, &lc, &GzCurveInput::new(5.0, 0.0, 60.0, 1.0)).unwrap();
//!
//! let report = check_intact_stability(&curve).unwrap();
//! assert_eq!(report.results.len(), 6);
//! assert!(report.all_criteria_passed);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{HydroError, HydroResult};
use crate::integration::{CompositeSimpson, Integrator};
use crate::settings::CriteriaLimits;
use crate::stability::StabilityCurveResult;
use crate::units::{Degrees, Radians};

/// Slack when comparing a curve's end angles with a required range (deg)
const ANGLE_TOLERANCE_DEG: f64 = 1e-9;

/// The six intact-stability checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IntactCriterion {
    /// Area under GZ from 0° to 30°
    AreaTo30,
    /// Area under GZ from 0° to 40° or downflooding
    AreaTo40,
    /// Area under GZ from 30° to 40° or downflooding
    Area30To40,
    /// GZ at a heel of 30° or more
    MaxGzBeyond30,
    /// Heel at which GZ peaks
    AngleOfMaxGz,
    /// Upright transverse metacentric height
    InitialGmt,
}

impl IntactCriterion {
    /// All criteria in table order
    pub const ALL: [IntactCriterion; 6] = [
        IntactCriterion::AreaTo30,
        IntactCriterion::AreaTo40,
        IntactCriterion::Area30To40,
        IntactCriterion::MaxGzBeyond30,
        IntactCriterion::AngleOfMaxGz,
        IntactCriterion::InitialGmt,
    ];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            IntactCriterion::AreaTo30 => "Area under GZ 0°-30°",
            IntactCriterion::AreaTo40 => "Area under GZ 0°-40°",
            IntactCriterion::Area30To40 => "Area under GZ 30°-40°",
            IntactCriterion::MaxGzBeyond30 => "Max GZ at heel >= 30°",
            IntactCriterion::AngleOfMaxGz => "Angle of maximum GZ",
            IntactCriterion::InitialGmt => "Initial GMt",
        }
    }

    /// Unit of the actual and required values
    pub fn unit(&self) -> &'static str {
        match self {
            IntactCriterion::AreaTo30
            | IntactCriterion::AreaTo40
            | IntactCriterion::Area30To40 => "m·rad",
            IntactCriterion::MaxGzBeyond30 | IntactCriterion::InitialGmt => "m",
            IntactCriterion::AngleOfMaxGz => "deg",
        }
    }

    /// Minimum value from `limits`
    pub fn required(&self, limits: &CriteriaLimits) -> f64 {
        match self {
            IntactCriterion::AreaTo30 => limits.min_area_0_30_m_rad,
            IntactCriterion::AreaTo40 => limits.min_area_0_40_m_rad,
            IntactCriterion::Area30To40 => limits.min_area_30_40_m_rad,
            IntactCriterion::MaxGzBeyond30 => limits.min_max_gz_m,
            IntactCriterion::AngleOfMaxGz => limits.min_angle_at_max_gz_deg,
            IntactCriterion::InitialGmt => limits.min_gmt_m,
        }
    }
}

/// Outcome of one criterion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriterionResult {
    pub criterion: IntactCriterion,
    pub name: String,
    /// Value found on the curve
    pub actual: f64,
    /// Minimum required value
    pub required: f64,
    pub unit: String,
    pub passed: bool,
}

/// Outcome of all criteria.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriteriaReport {
    pub results: Vec<CriterionResult>,
    /// True only if every criterion passed
    pub all_criteria_passed: bool,
}

impl CriteriaReport {
    fn new(results: Vec<CriterionResult>) -> Self {
        let all_criteria_passed = results.iter().all(|r| r.passed);
        CriteriaReport {
            results,
            all_criteria_passed,
        }
    }

    /// Result for a specific criterion
    pub fn result(&self, criterion: IntactCriterion) -> Option<&CriterionResult> {
        self.results.iter().find(|r| r.criterion == criterion)
    }

    /// Criteria that did not pass
    pub fn failed(&self) -> impl Iterator<Item = &CriterionResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// One-line outcome, e.g. "FAIL (2 of 6 criteria failed: Initial GMt, ...)"
    pub fn summary(&self) -> String {
        if self.all_criteria_passed {
            return format!("PASS ({} criteria)", self.results.len());
        }
        let names: Vec<&str> = self.failed().map(|r| r.name.as_str()).collect();
        format!(
            "FAIL ({} of {} criteria failed: {})",
            names.len(),
            self.results.len(),
            names.join(", ")
        )
    }
}

/// Check a curve against the default IMO limits.
pub fn check_intact_stability(curve: &StabilityCurveResult) -> HydroResult<CriteriaReport> {
    check_intact_stability_with(curve, &CompositeSimpson::default(), &CriteriaLimits::default())
}

/// Check a curve with an explicit integrator and limits.
///
/// # Errors
///
/// * `Stability` - the curve does not start at or below 0° or does not reach
///   the upper area bound (40° or the downflooding angle, and at least 30°)
/// * `InvalidInput` - invalid limits
pub fn check_intact_stability_with<I: Integrator + ?Sized>(
    curve: &StabilityCurveResult,
    integrator: &I,
    limits: &CriteriaLimits,
) -> HydroResult<CriteriaReport> {
    limits.validate()?;

    let upper_deg = limits.upper_area_bound_deg();
    let reference_deg = limits.max_gz_reference_angle_deg;
    let needed_deg = upper_deg.max(30.0).max(reference_deg);
    let (first_deg, last_deg) = curve.angle_range_deg();
    if first_deg > ANGLE_TOLERANCE_DEG || last_deg < needed_deg - ANGLE_TOLERANCE_DEG {
        return Err(HydroError::stability(format!(
            "GZ curve spans {first_deg}°..{last_deg}° but the criteria need 0°..{needed_deg}°"
        )));
    }

    let xs = curve.angles_rad();
    let ys = curve.gz_values();
    let rad = |deg: f64| Radians::from(Degrees(deg)).0;
    let area = |from_deg: f64, to_deg: f64| -> HydroResult<f64> {
        let (from_deg, to_deg) = (from_deg.max(first_deg), to_deg.min(last_deg));
        if to_deg <= from_deg {
            return Ok(0.0);
        }
        integrator.integrate_between(&xs, &ys, rad(from_deg), rad(to_deg))
    };

    let mut results = Vec::with_capacity(IntactCriterion::ALL.len());
    for criterion in IntactCriterion::ALL {
        let actual = match criterion {
            IntactCriterion::AreaTo30 => area(0.0, 30.0)?,
            IntactCriterion::AreaTo40 => area(0.0, upper_deg)?,
            IntactCriterion::Area30To40 => area(30.0, upper_deg)?,
            IntactCriterion::MaxGzBeyond30 => max_gz_from(curve, reference_deg),
            IntactCriterion::AngleOfMaxGz => curve.angle_at_max_gz_deg,
            IntactCriterion::InitialGmt => curve.initial_gmt_m,
        };
        let required = criterion.required(limits);
        results.push(CriterionResult {
            criterion,
            name: criterion.name().to_string(),
            actual,
            required,
            unit: criterion.unit().to_string(),
            passed: actual >= required,
        });
    }

    let report = CriteriaReport::new(results);
    tracing::debug!(passed = report.all_criteria_passed, "{}", report.summary());
    Ok(report)
}

/// Largest GZ at or beyond `from_deg`, including the interpolated value there.
fn max_gz_from(curve: &StabilityCurveResult, from_deg: f64) -> f64 {
    let at_bound = curve.gz_at(from_deg).unwrap_or(f64::NEG_INFINITY);
    curve
        .points
        .iter()
        .filter(|p| p.heel_deg >= from_deg)
        .map(|p| p.gz_m)
        .fold(at_bound, f64::max)
}
