//! # Stability Calculator
//!
//! Sweeps heel angle and produces the righting-arm (GZ) curve for a hull at
//! a given draft and loading condition.
//!
//! ## Methods
//!
//! - [`StabilityMethod::WallSided`] - closed form per angle,
//!   GZ(φ) = (GMt + ½·BMt·tan²φ)·sin φ, with GMt and BMt taken from the
//!   upright hydrostatics at the requested draft.
//!
//! The wall-sided formula assumes the hull sides stay vertical through the
//! heel range; it is not a large-angle method. Deck-edge immersion and bilge
//! emergence are not modelled.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::geometry::HullGeometry;
//! use hydro_core::loadcase::Loadcase;
//! use hydro_core::stability::{compute_gz_curve, GzCurveInput};
//!
//! let barge = HullGeometry::rectangular_barge(100.0, 20.0, 10.0, 21, 21).unwrap();
//! let lc = Loadcase::new(1025.0, 6.0).unwrap();
//! let input = GzCurveInput::new(5.0, 0.0, 40.0, 5.0);
//!
//! let curve = compute_gz_curve(&barge, &lc, &input).unwrap();
//! assert_eq!(curve.points.len(), 9);
//! assert!(curve.max_gz_m > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::{wall_sided_angle_of_loll, wall_sided_gz};
use crate::errors::{HydroError, HydroResult};
use crate::geometry::HullGeometry;
use crate::hydrostatics::{HydrostaticCalculator, HydrostaticsEngine};
use crate::integration::{interpolate, CompositeSimpson, Integrator};
use crate::interrupt::{Interrupt, Never};
use crate::loadcase::Loadcase;
use crate::quantity::Quantity;
use crate::settings::SweepSettings;
use crate::units::{Degrees, Radians};

/// Heel angles must stay strictly inside ±90° (tan φ diverges there)
const MAX_ABS_HEEL_DEG: f64 = 90.0;

/// Upper bound on the number of heel angles in one sweep
pub const MAX_SWEEP_ANGLES: usize = 10_000_000;

/// How GZ is evaluated at each heel angle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum StabilityMethod {
    /// Closed-form wall-sided approximation
    #[default]
    WallSided,
}

/// Parameters of a heel sweep.
///
/// ## JSON Example
///
/// ```json
/// {
///   "draft_m": 5.0,
///   "min_angle_deg": 0.0,
///   "max_angle_deg": 60.0,
///   "angle_step_deg": 1.0,
///   "method": "WallSided"
/// }
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GzCurveInput {
    /// Upright draft (m)
    pub draft_m: f64,

    /// First heel angle (deg)
    pub min_angle_deg: f64,

    /// Last heel angle (deg); appended if the step does not land on it
    pub max_angle_deg: f64,

    /// Angle increment (deg)
    pub angle_step_deg: f64,

    /// GZ evaluation method
    #[serde(default)]
    pub method: StabilityMethod,
}

impl GzCurveInput {
    /// Wall-sided sweep from `min` to `max` in `step` degrees.
    pub fn new(draft_m: f64, min_angle_deg: f64, max_angle_deg: f64, angle_step_deg: f64) -> Self {
        GzCurveInput {
            draft_m,
            min_angle_deg,
            max_angle_deg,
            angle_step_deg,
            method: StabilityMethod::WallSided,
        }
    }

    /// Sweep at `draft_m` using configured defaults.
    pub fn from_sweep(draft_m: f64, sweep: &SweepSettings) -> Self {
        GzCurveInput {
            draft_m,
            min_angle_deg: sweep.min_angle_deg,
            max_angle_deg: sweep.max_angle_deg,
            angle_step_deg: sweep.angle_step_deg,
            method: sweep.method,
        }
    }

    /// Validate the sweep bounds.
    pub fn validate(&self) -> HydroResult<()> {
        let all_finite = [self.min_angle_deg, self.max_angle_deg, self.angle_step_deg]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(HydroError::stability("Angle range and step must be finite"));
        }
        if self.angle_step_deg <= 0.0 {
            return Err(HydroError::stability(format!(
                "Angle step must be positive, got {}°",
                self.angle_step_deg
            )));
        }
        if self.min_angle_deg >= self.max_angle_deg {
            return Err(HydroError::stability(format!(
                "Empty or inverted angle range {}°..{}°",
                self.min_angle_deg, self.max_angle_deg
            )));
        }
        if self.min_angle_deg.abs() >= MAX_ABS_HEEL_DEG
            || self.max_angle_deg.abs() >= MAX_ABS_HEEL_DEG
        {
            return Err(HydroError::stability(format!(
                "Heel range {}°..{}° must lie strictly inside ±90°",
                self.min_angle_deg, self.max_angle_deg
            )));
        }
        Ok(())
    }

    /// Sampled heel angles (deg), strictly increasing, ending on `max_angle_deg`.
    ///
    /// Fails with `Stability` when the step would give more than
    /// [`MAX_SWEEP_ANGLES`] samples.
    pub fn angles_deg(&self) -> HydroResult<Vec<f64>> {
        self.validate()?;
        let span = self.max_angle_deg - self.min_angle_deg;
        let steps = (span / self.angle_step_deg + 1e-9).floor();
        // one extra sample may be appended for `max_angle_deg`
        if steps + 2.0 > MAX_SWEEP_ANGLES as f64 {
            return Err(HydroError::stability(format!(
                "Angle step {}° gives more than {MAX_SWEEP_ANGLES} heel angles",
                self.angle_step_deg
            )));
        }
        let count = steps as usize;
        let mut angles: Vec<f64> = (0..=count)
            .map(|i| (self.min_angle_deg + self.angle_step_deg * i as f64).min(self.max_angle_deg))
            .collect();
        if let Some(&last) = angles.last() {
            if self.max_angle_deg - last > 1e-9 * self.angle_step_deg {
                angles.push(self.max_angle_deg);
            }
        }
        Ok(angles)
    }
}

/// One sample of the righting-arm curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GzPoint {
    /// Heel angle φ (deg)
    pub heel_deg: f64,

    /// Righting arm GZ (m)
    pub gz_m: f64,
}

impl GzPoint {
    pub fn new(heel_deg: f64, gz_m: f64) -> Self {
        GzPoint { heel_deg, gz_m }
    }
}

/// Hydrostatic condition a curve was computed for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SweepCondition {
    pub method: StabilityMethod,
    pub draft_m: f64,
    pub kg_m: f64,
    pub bmt_m: f64,
    /// Heel at which GZ returns to zero when GMt < 0 (deg)
    pub angle_of_loll_deg: Option<f64>,
}

/// A righting-arm curve and its summary statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StabilityCurveResult {
    /// Samples in strictly increasing heel order
    pub points: Vec<GzPoint>,

    /// Largest sampled GZ (m)
    pub max_gz_m: f64,

    /// Heel of the largest sampled GZ (deg)
    pub angle_at_max_gz_deg: f64,

    /// Upright transverse metacentric height (m), straight from hydrostatics
    pub initial_gmt_m: f64,

    /// Heel past the maximum where GZ falls back to zero (deg)
    pub angle_of_vanishing_stability_deg: Option<f64>,

    /// Area under the whole sampled curve (m·rad)
    pub dynamic_stability_m_rad: f64,

    /// Draft, KG and method, when produced by [`compute_gz_curve`]
    pub condition: Option<SweepCondition>,
}

impl StabilityCurveResult {
    /// Build a curve from samples and derive its summary statistics.
    ///
    /// Samples must be non-empty with strictly increasing, finite angles.
    pub fn from_points<I: Integrator + ?Sized>(
        points: Vec<GzPoint>,
        initial_gmt_m: f64,
        integrator: &I,
    ) -> HydroResult<Self> {
        if points.is_empty() {
            return Err(HydroError::stability("GZ curve has no points"));
        }
        if points.iter().any(|p| !p.heel_deg.is_finite() || !p.gz_m.is_finite()) {
            return Err(HydroError::stability("GZ curve contains non-finite values"));
        }
        if let Some(i) = points.windows(2).position(|w| w[1].heel_deg <= w[0].heel_deg) {
            return Err(HydroError::stability(format!(
                "GZ curve angles must strictly increase ({}° then {}°)",
                points[i].heel_deg,
                points[i + 1].heel_deg
            )));
        }

        let mut max_idx = 0;
        for (i, p) in points.iter().enumerate() {
            if p.gz_m > points[max_idx].gz_m {
                max_idx = i;
            }
        }

        let mut curve = StabilityCurveResult {
            max_gz_m: points[max_idx].gz_m,
            angle_at_max_gz_deg: points[max_idx].heel_deg,
            initial_gmt_m,
            angle_of_vanishing_stability_deg: vanishing_angle(&points, max_idx),
            dynamic_stability_m_rad: 0.0,
            condition: None,
            points,
        };
        curve.dynamic_stability_m_rad =
            integrator.integrate(&curve.angles_rad(), &curve.gz_values())?;
        Ok(curve)
    }

    /// Heel angles in radians
    pub fn angles_rad(&self) -> Vec<f64> {
        self.points.iter().map(|p| Radians::from(Degrees(p.heel_deg)).0).collect()
    }

    /// GZ values in metres
    pub fn gz_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.gz_m).collect()
    }

    /// First and last sampled heel (deg)
    pub fn angle_range_deg(&self) -> (f64, f64) {
        // from_points guarantees at least one point
        let first = self.points.first().map_or(0.0, |p| p.heel_deg);
        let last = self.points.last().map_or(0.0, |p| p.heel_deg);
        (first, last)
    }

    /// GZ linearly interpolated at `heel_deg`; `None` outside the sweep
    pub fn gz_at(&self, heel_deg: f64) -> Option<f64> {
        let angles: Vec<f64> = self.points.iter().map(|p| p.heel_deg).collect();
        interpolate(&angles, &self.gz_values(), heel_deg)
    }
}

/// First positive → non-positive crossing after the maximum, interpolated.
fn vanishing_angle(points: &[GzPoint], max_idx: usize) -> Option<f64> {
    if points[max_idx].gz_m <= 0.0 {
        return None;
    }
    points[max_idx..].windows(2).find_map(|w| {
        let (a, b) = (w[0], w[1]);
        if a.gz_m > 0.0 && b.gz_m <= 0.0 {
            let t = a.gz_m / (a.gz_m - b.gz_m);
            Some(a.heel_deg + t * (b.heel_deg - a.heel_deg))
        } else {
            None
        }
    })
}

/// Pull a metacentric value out of the hydrostatics or fail the sweep.
fn require_for_curve(q: Quantity, name: &str, draft_m: f64) -> HydroResult<f64> {
    match q {
        Quantity::Defined { value } => Ok(value),
        Quantity::Undefined { reason } => Err(HydroError::stability(format!(
            "{name} is undefined at draft {draft_m} m ({reason}); cannot build a GZ curve"
        ))),
    }
}

/// Compute a GZ curve with explicit collaborators.
///
/// # Arguments
///
/// * `hydro` - Upright hydrostatics provider (source of GMt and BMt)
/// * `integrator` - Quadrature for the dynamic-stability area
/// * `hull` - Offset table
/// * `loadcase` - Water density and KG
/// * `input` - Draft and heel sweep
/// * `interrupt` - Polled before every heel angle
///
/// # Errors
///
/// * `Stability` - bad sweep bounds, or GMt/BMt undefined at the draft
/// * `Cancelled` - `interrupt` fired mid-sweep
/// * `InvalidInput` - draft outside the hull or invalid loadcase
pub fn compute_gz_curve_with<H, I, S>(
    hydro: &H,
    integrator: &I,
    hull: &HullGeometry,
    loadcase: &Loadcase,
    input: &GzCurveInput,
    interrupt: &S,
) -> HydroResult<StabilityCurveResult>
where
    H: HydrostaticCalculator + ?Sized,
    I: Integrator + ?Sized,
    S: Interrupt + ?Sized,
{
    let angles = input.angles_deg()?;
    let hs = hydro.compute_at_draft(hull, Some(loadcase), input.draft_m, 0.0)?;
    let gmt = require_for_curve(hs.gmt_m, "GMt", input.draft_m)?;
    let bmt = require_for_curve(hs.bmt_m, "BMt", input.draft_m)?;

    tracing::debug!(
        draft_m = input.draft_m,
        gmt_m = gmt,
        samples = angles.len(),
        method = ?input.method,
        "sweeping heel angles"
    );

    let mut points = Vec::with_capacity(angles.len());
    for (done, &heel_deg) in angles.iter().enumerate() {
        if interrupt.is_interrupted() {
            return Err(HydroError::cancelled("GZ sweep", done));
        }
        let heel_rad = Radians::from(Degrees(heel_deg)).0;
        let gz = match input.method {
            StabilityMethod::WallSided => wall_sided_gz(gmt, bmt, heel_rad),
        };
        points.push(GzPoint::new(heel_deg, gz));
    }

    let mut curve = StabilityCurveResult::from_points(points, gmt, integrator)?;
    curve.condition = Some(SweepCondition {
        method: input.method,
        draft_m: input.draft_m,
        kg_m: loadcase.kg_m,
        bmt_m: bmt,
        angle_of_loll_deg: wall_sided_angle_of_loll(gmt, bmt)
            .map(|rad| Degrees::from(Radians(rad)).0),
    });
    Ok(curve)
}

/// Compute a GZ curve with the default engine and no cancellation.
pub fn compute_gz_curve(
    hull: &HullGeometry,
    loadcase: &Loadcase,
    input: &GzCurveInput,
) -> HydroResult<StabilityCurveResult> {
    let engine = HydrostaticsEngine::<CompositeSimpson>::default();
    compute_gz_curve_with(&engine, engine.integrator(), hull, loadcase, input, &Never)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{barge_bmt, barge_kb};
    use crate::interrupt::{AfterPolls, CancelToken, Deadline};
    use std::time::Duration;

    fn barge() -> HullGeometry {
        HullGeometry::rectangular_barge(100.0, 20.0, 10.0, 21, 41).unwrap()
    }

    #[test]
    fn test_wall_sided_matches_closed_form() {
        let kg = 6.0;
        let lc = Loadcase::new(1025.0, kg).unwrap();
        let curve =
            compute_gz_curve(&barge(), &lc, &GzCurveInput::new(5.0, 0.0, 30.0, 2.5)).unwrap();

        let bmt = barge_bmt(20.0, 5.0);
        let gmt = barge_kb(5.0) + bmt - kg;
        for p in &curve.points {
            let phi = p.heel_deg.to_radians();
            let expected = (gmt + 0.5 * bmt * phi.tan().powi(2)) * phi.sin();
            if expected.abs() < 1e-12 {
                assert!(p.gz_m.abs() < 1e-9);
            } else {
                assert!(((p.gz_m - expected) / expected).abs() < 0.005, "at {}°", p.heel_deg);
            }
        }
        assert!((curve.initial_gmt_m - gmt).abs() < 1e-6);
    }

    #[test]
    fn test_summary_statistics() {
        let lc = Loadcase::new(1025.0, 6.0).unwrap();
        let curve =
            compute_gz_curve(&barge(), &lc, &GzCurveInput::new(5.0, 0.0, 40.0, 1.0)).unwrap();
        assert_eq!(curve.points.len(), 41);
        // wall-sided GZ keeps rising with positive GM
        assert_eq!(curve.angle_at_max_gz_deg, 40.0);
        assert_eq!(curve.max_gz_m, curve.points[40].gz_m);
        assert!(curve.angle_of_vanishing_stability_deg.is_none());
        assert!(curve.dynamic_stability_m_rad > 0.0);

        let condition = curve.condition.unwrap();
        assert_eq!(condition.method, StabilityMethod::WallSided);
        assert_eq!(condition.kg_m, 6.0);
        assert!(condition.angle_of_loll_deg.is_none());
    }

    #[test]
    fn test_angles_append_max() {
        let angles = GzCurveInput::new(5.0, 0.0, 40.0, 7.0).angles_deg().unwrap();
        assert_eq!(angles, vec![0.0, 7.0, 14.0, 21.0, 28.0, 35.0, 40.0]);

        let angles = GzCurveInput::new(5.0, 0.0, 1.0, 0.1).angles_deg().unwrap();
        assert_eq!(angles.len(), 11);
        assert_eq!(*angles.last().unwrap(), 1.0);
        assert!(angles.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_rejects_bad_sweeps() {
        let lc = Loadcase::new(1025.0, 6.0).unwrap();
        for input in [
            GzCurveInput::new(5.0, 30.0, 30.0, 1.0),
            GzCurveInput::new(5.0, 40.0, 0.0, 1.0),
            GzCurveInput::new(5.0, 0.0, 40.0, 0.0),
            GzCurveInput::new(5.0, 0.0, 40.0, -1.0),
            GzCurveInput::new(5.0, 0.0, 90.0, 1.0),
        ] {
            let err = compute_gz_curve(&barge(), &lc, &input).unwrap_err();
            assert_eq!(err.error_code(), "STABILITY_ERROR", "{input:?}");
        }
    }

    #[test]
    fn test_undefined_gmt_fails_whole_curve() {
        let lc = Loadcase::new(1025.0, 1.0).unwrap();
        // zero draft: no volume
        let err =
            compute_gz_curve(&barge(), &lc, &GzCurveInput::new(0.0, 0.0, 30.0, 1.0)).unwrap_err();
        assert!(matches!(err, HydroError::Stability { .. }));

        // zero waterplane at the top waterline
        let pinched = HullGeometry::new(
            vec![0.0, 10.0, 20.0],
            vec![0.0, 1.0, 2.0],
            vec![vec![1.0, 1.0, 0.0]; 3],
        )
        .unwrap();
        let err =
            compute_gz_curve(&pinched, &lc, &GzCurveInput::new(2.0, 0.0, 30.0, 1.0)).unwrap_err();
        match err {
            HydroError::Stability { reason } => assert!(reason.contains("waterplane")),
            other => panic!("expected stability error, got {other:?}"),
        }
    }

    #[test]
    fn test_cancellation_returns_no_curve() {
        let token = CancelToken::new();
        token.cancel();
        let engine = HydrostaticsEngine::<CompositeSimpson>::default();
        let lc = Loadcase::new(1025.0, 6.0).unwrap();
        let err = compute_gz_curve_with(
            &engine,
            engine.integrator(),
            &barge(),
            &lc,
            &GzCurveInput::new(5.0, 0.0, 60.0, 1.0),
            &token,
        )
        .unwrap_err();
        assert_eq!(err, HydroError::cancelled("GZ sweep", 0));
    }

    #[test]
    fn test_tiny_step_rejected_before_allocating() {
        for step in [1e-300, 1e-9, f64::MIN_POSITIVE] {
            let err = GzCurveInput::new(5.0, 0.0, 40.0, step).angles_deg().unwrap_err();
            assert_eq!(err.error_code(), "STABILITY_ERROR");
        }

        let engine = HydrostaticsEngine::<CompositeSimpson>::default();
        let lc = Loadcase::new(1025.0, 6.0).unwrap();
        let err = compute_gz_curve_with(
            &engine,
            engine.integrator(),
            &barge(),
            &lc,
            &GzCurveInput::new(5.0, 0.0, 40.0, 1e-300),
            &Deadline::after(Duration::from_millis(10)),
        )
        .unwrap_err();
        assert!(matches!(err, HydroError::Stability { .. }));
    }

    #[test]
    fn test_cancelled_mid_sweep() {
        let engine = HydrostaticsEngine::<CompositeSimpson>::default();
        let lc = Loadcase::new(1025.0, 6.0).unwrap();
        let interrupt = AfterPolls::new(7);
        let err = compute_gz_curve_with(
            &engine,
            engine.integrator(),
            &barge(),
            &lc,
            &GzCurveInput::new(5.0, 0.0, 60.0, 1.0),
            &interrupt,
        )
        .unwrap_err();
        assert_eq!(err, HydroError::cancelled("GZ sweep", 7));
    }

    #[test]
    fn test_negative_gm_angle_of_loll() {
        // KG well above KM
        let lc = Loadcase::new(1025.0, 10.0).unwrap();
        let curve =
            compute_gz_curve(&barge(), &lc, &GzCurveInput::new(5.0, 0.0, 60.0, 0.5)).unwrap();
        assert!(curve.initial_gmt_m < 0.0);
        let loll = curve.condition.unwrap().angle_of_loll_deg.unwrap();
        // GZ changes sign near the angle of loll
        assert!(curve.gz_at(loll - 1.0).unwrap() < 0.0);
        assert!(curve.gz_at(loll + 1.0).unwrap() > 0.0);
    }

    #[test]
    fn test_from_points_vanishing_angle() {
        let points = vec![
            GzPoint::new(0.0, 0.0),
            GzPoint::new(20.0, 0.4),
            GzPoint::new(40.0, 0.6),
            GzPoint::new(60.0, 0.2),
            GzPoint::new(80.0, -0.2),
        ];
        let curve =
            StabilityCurveResult::from_points(points, 1.0, &CompositeSimpson::default()).unwrap();
        assert_eq!(curve.max_gz_m, 0.6);
        assert_eq!(curve.angle_at_max_gz_deg, 40.0);
        assert!((curve.angle_of_vanishing_stability_deg.unwrap() - 70.0).abs() < 1e-9);
        assert!(curve.condition.is_none());
    }

    #[test]
    fn test_from_points_rejects_unordered() {
        let integ = CompositeSimpson::default();
        assert!(StabilityCurveResult::from_points(vec![], 1.0, &integ).is_err());
        let points = vec![GzPoint::new(10.0, 0.1), GzPoint::new(5.0, 0.2)];
        assert!(StabilityCurveResult::from_points(points, 1.0, &integ).is_err());
    }

    #[test]
    fn test_curve_serialization() {
        let lc = Loadcase::new(1025.0, 6.0).unwrap();
        let curve =
            compute_gz_curve(&barge(), &lc, &GzCurveInput::new(5.0, 0.0, 10.0, 5.0)).unwrap();
        let json = serde_json::to_string(&curve).unwrap();
        let back: StabilityCurveResult = serde_json::from_str(&json).unwrap();
        assert_eq!(curve, back);
    }
}
