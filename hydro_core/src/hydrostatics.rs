//! # Hydrostatic Calculator
//!
//! Computes the hydrostatic properties of a hull at one draft: displaced
//! volume and its centroid, waterplane properties, metacentric radii and
//! heights, and form coefficients.
//!
//! ## Method
//!
//! 1. Per station, integrate half-breadth over height up to the draft and
//!    double it: sectional area A(x) and vertical moment M(x).
//! 2. Integrate A(x), M(x) and A(x)·x along the stations: V, KB, LCB.
//! 3. Integrate the draft waterline y(x): Awp, LCF, Iwp,t = ⅔∫y³dx and
//!    Iwp,l about the centre of flotation.
//! 4. BM = I/V; KM = KB + BM; GM = KM − KG when a loadcase is supplied.
//!
//! Ratios whose denominator vanishes come back as
//! [`Quantity::Undefined`](crate::quantity::Quantity) rather than NaN.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::geometry::HullGeometry;
//! use hydro_core::hydrostatics::compute_at_draft;
//! use hydro_core::loadcase::Loadcase;
//!
//! let barge = HullGeometry::rectangular_barge(100.0, 20.0, 10.0, 21, 21).unwrap();
//! let lc = Loadcase::new(1025.0, 6.0).unwrap();
//! let hs = compute_at_draft(&barge, Some(&lc), 5.0, 0.0).unwrap();
//!
//! assert!((hs.volume_m3 - 10_000.0).abs() < 1e-6);
//! assert!((hs.kb_m - 2.5).abs() < 1e-9);
//! assert!((hs.bmt_m.value().unwrap() - 20.0 / 3.0).abs() < 1e-6);
//! assert!(hs.gmt_m.value().unwrap() > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::wall_sided_buoyancy_shift;
use crate::errors::{HydroError, HydroResult};
use crate::geometry::HullGeometry;
use crate::integration::{interpolate, CompositeSimpson, Integrator};
use crate::interrupt::Interrupt;
use crate::loadcase::Loadcase;
use crate::quantity::{Quantity, UndefinedReason, ZERO_TOLERANCE};
use crate::units::{Kilograms, Tonnes};

/// Drafts may exceed the highest waterline by this much (rounding slack)
const DRAFT_TOLERANCE_M: f64 = 1e-9;

/// Upper bound on the number of drafts [`draft_range`] will generate
pub const MAX_TABLE_ROWS: usize = 10_000_000;

/// Hydrostatic properties at one draft.
///
/// Quantities that need a loadcase are `Undefined(NoLoadcase)` without one.
///
/// ## JSON Example (abridged)
///
/// ```json
/// {
///   "draft_m": 5.0,
///   "heel_deg": 0.0,
///   "volume_m3": 10000.0,
///   "kb_m": 2.5,
///   "lcb_m": { "status": "Defined", "value": 50.0 },
///   "bmt_m": { "status": "Defined", "value": 6.667 },
///   "gmt_m": { "status": "Undefined", "reason": "NoLoadcase" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HydrostaticResult {
    // === Condition ===
    /// Draft above keel (m)
    pub draft_m: f64,

    /// Heel angle (deg); 0 for upright
    pub heel_deg: f64,

    // === Displacement ===
    /// Displaced volume ∇ (m³)
    pub volume_m3: f64,

    /// Displacement mass Δ = ρ·∇ (kg)
    pub displacement_kg: Quantity,

    /// Displacement mass (t)
    pub displacement_t: Quantity,

    // === Centre of Buoyancy ===
    /// Vertical centre of buoyancy above keel (m); 0 at zero volume
    pub kb_m: f64,

    /// Longitudinal centre of buoyancy, same origin as station X (m)
    pub lcb_m: Quantity,

    /// Transverse centre of buoyancy from centreline (m); 0 upright
    pub tcb_m: f64,

    // === Waterplane ===
    /// Waterplane area Awp (m²)
    pub waterplane_area_m2: f64,

    /// Longitudinal centre of flotation (m)
    pub lcf_m: Quantity,

    /// Transverse second moment of the waterplane about the centreline (m⁴)
    pub iwp_transverse_m4: f64,

    /// Longitudinal second moment of the waterplane about the LCF (m⁴)
    pub iwp_longitudinal_m4: f64,

    // === Metacentric Geometry ===
    /// Transverse metacentric radius BMt = Iwp,t / ∇ (m)
    pub bmt_m: Quantity,

    /// Longitudinal metacentric radius BMl = Iwp,l / ∇ (m)
    pub bml_m: Quantity,

    /// Transverse metacentre above keel KMt = KB + BMt (m)
    pub kmt_m: Quantity,

    /// Longitudinal metacentre above keel KMl = KB + BMl (m)
    pub kml_m: Quantity,

    /// Transverse metacentric height GMt = KMt − KG (m)
    pub gmt_m: Quantity,

    /// Longitudinal metacentric height GMl = KMl − KG (m)
    pub gml_m: Quantity,

    // === Principal Dimensions at this Draft ===
    /// Length between perpendiculars (m)
    pub lpp_m: f64,

    /// Maximum immersed beam (m)
    pub beam_m: f64,

    /// Sectional area at midship (m²)
    pub midship_area_m2: f64,

    // === Form Coefficients ===
    /// Block coefficient Cb = ∇ / (L·B·T)
    pub cb: Quantity,

    /// Prismatic coefficient Cp = ∇ / (L·Am)
    pub cp: Quantity,

    /// Midship coefficient Cm = Am / (B·T)
    pub cm: Quantity,

    /// Waterplane coefficient Cwp = Awp / (L·B)
    pub cwp: Quantity,

    // === Trim & Immersion ===
    /// Tonnes per centimetre immersion (t/cm)
    pub tpc_t_per_cm: Quantity,

    /// Moment to change trim one centimetre (t·m/cm)
    pub mct_tm_per_cm: Quantity,
}

/// Capability interface for single-draft hydrostatics.
pub trait HydrostaticCalculator: Send + Sync {
    /// Hydrostatic properties of `hull` floating at `draft_m`, heeled `heel_deg`.
    fn compute_at_draft(
        &self,
        hull: &HullGeometry,
        loadcase: Option<&Loadcase>,
        draft_m: f64,
        heel_deg: f64,
    ) -> HydroResult<HydrostaticResult>;
}

/// Production hydrostatic calculator over an offset grid.
#[derive(Debug, Clone, Default)]
pub struct HydrostaticsEngine<I: Integrator = CompositeSimpson> {
    integrator: I,
}

impl<I: Integrator> HydrostaticsEngine<I> {
    pub fn new(integrator: I) -> Self {
        HydrostaticsEngine { integrator }
    }

    pub fn integrator(&self) -> &I {
        &self.integrator
    }
}

/// Integrated sectional properties, one entry per station.
struct Sections {
    /// Full (both sides) sectional area A(x)
    areas: Vec<f64>,
    /// Full sectional first moment about the keel ∫2y·z dz
    vertical_moments: Vec<f64>,
}

impl<I: Integrator> HydrostaticsEngine<I> {
    fn sections(&self, hull: &HullGeometry, draft_m: f64) -> HydroResult<Sections> {
        let n = hull.station_count();
        let mut areas = Vec::with_capacity(n);
        let mut vertical_moments = Vec::with_capacity(n);
        for station in 0..n {
            let (zs, ys) = hull.immersed_section(station, draft_m);
            let half_area = self.integrator.integrate(&zs, &ys)?;
            let yz: Vec<f64> = ys.iter().zip(&zs).map(|(y, z)| y * z).collect();
            let half_moment = self.integrator.integrate(&zs, &yz)?;
            areas.push(2.0 * half_area);
            vertical_moments.push(2.0 * half_moment);
        }
        Ok(Sections {
            areas,
            vertical_moments,
        })
    }
}

impl<I: Integrator> HydrostaticCalculator for HydrostaticsEngine<I> {
    fn compute_at_draft(
        &self,
        hull: &HullGeometry,
        loadcase: Option<&Loadcase>,
        draft_m: f64,
        heel_deg: f64,
    ) -> HydroResult<HydrostaticResult> {
        validate_draft(hull, draft_m)?;
        validate_heel(heel_deg)?;
        if let Some(lc) = loadcase {
            lc.validate()?;
        }
        tracing::debug!(
            stations = hull.station_count(),
            waterlines = hull.waterline_count(),
            draft_m,
            heel_deg,
            "computing hydrostatics"
        );

        let xs = hull.stations();
        let integ = &self.integrator;

        // --- Volume and centre of buoyancy ---
        let sections = self.sections(hull, draft_m)?;
        let volume = integ.integrate(xs, &sections.areas)?;
        let vertical_moment = integ.integrate(xs, &sections.vertical_moments)?;
        let ax: Vec<f64> = sections.areas.iter().zip(xs).map(|(a, x)| a * x).collect();
        let longitudinal_moment = integ.integrate(xs, &ax)?;

        let has_volume = volume.abs() > ZERO_TOLERANCE;
        let upright_kb = if has_volume { vertical_moment / volume } else { 0.0 };
        let lcb = Quantity::ratio(longitudinal_moment, volume, UndefinedReason::ZeroVolume);

        // --- Waterplane ---
        // below the lowest waterline nothing is immersed
        let wl: Vec<f64> = (0..hull.station_count())
            .map(|i| hull.half_breadth_at(i, draft_m).unwrap_or(0.0))
            .collect();
        let awp = 2.0 * integ.integrate(xs, &wl)?;
        let wl_x: Vec<f64> = wl.iter().zip(xs).map(|(y, x)| y * x).collect();
        let wl_xx: Vec<f64> = wl_x.iter().zip(xs).map(|(yx, x)| yx * x).collect();
        let wl_cubed: Vec<f64> = wl.iter().map(|y| y.powi(3)).collect();
        let lcf = Quantity::ratio(
            2.0 * integ.integrate(xs, &wl_x)?,
            awp,
            UndefinedReason::ZeroWaterplaneArea,
        );
        let iwp_t = 2.0 / 3.0 * integ.integrate(xs, &wl_cubed)?;
        let iwp_l_origin = 2.0 * integ.integrate(xs, &wl_xx)?;
        // parallel axis shift to the centre of flotation
        let iwp_l = match lcf.value() {
            Some(x_f) => (iwp_l_origin - awp * x_f * x_f).max(0.0),
            None => 0.0,
        };

        // --- Metacentric radii ---
        let metacentric = |inertia: f64| {
            if !has_volume {
                Quantity::undefined(UndefinedReason::ZeroVolume)
            } else if awp.abs() <= ZERO_TOLERANCE {
                Quantity::undefined(UndefinedReason::ZeroWaterplaneArea)
            } else {
                Quantity::defined(inertia / volume)
            }
        };
        let bmt = metacentric(iwp_t);
        let bml = metacentric(iwp_l);

        // --- Heel (wall-sided shift of the buoyancy centre) ---
        let heel_rad = heel_deg.to_radians();
        let (tcb, kb) = match bmt.value() {
            Some(bm) if heel_deg != 0.0 => {
                let (dy, dz) = wall_sided_buoyancy_shift(bm, heel_rad);
                (dy, upright_kb + dz)
            }
            _ => (0.0, upright_kb),
        };

        let kmt = bmt.map(|bm| upright_kb + bm);
        let kml = bml.map(|bm| upright_kb + bm);

        // --- Loadcase-dependent ---
        let (displacement_kg, gmt, gml, tpc) = match loadcase {
            Some(lc) => (
                Quantity::defined(lc.water_density_kg_m3 * volume),
                kmt.map(|km| km - lc.kg_m),
                kml.map(|km| km - lc.kg_m),
                Quantity::defined(Tonnes::from(Kilograms(lc.water_density_kg_m3 * awp * 0.01)).0),
            ),
            None => {
                let none = Quantity::undefined(UndefinedReason::NoLoadcase);
                (none, none, none, none)
            }
        };
        let displacement_t = displacement_kg.map(|kg| Tonnes::from(Kilograms(kg)).0);

        // --- Principal dimensions & form coefficients ---
        let lpp = hull.length_between_perpendiculars();
        let beam = 2.0 * hull.max_half_breadth_below(draft_m);
        let midship_area = interpolate(xs, &sections.areas, hull.midship_x()).unwrap_or(0.0);

        let cb = Quantity::ratio(volume, lpp * beam * draft_m, UndefinedReason::ZeroBoundingBox);
        let cm = Quantity::ratio(midship_area, beam * draft_m, UndefinedReason::ZeroBoundingBox);
        let cp = if midship_area.abs() <= ZERO_TOLERANCE {
            Quantity::undefined(UndefinedReason::ZeroMidshipArea)
        } else {
            Quantity::ratio(volume, lpp * midship_area, UndefinedReason::ZeroBoundingBox)
        };
        let cwp = Quantity::ratio(awp, lpp * beam, UndefinedReason::ZeroBoundingBox);

        // MCT1cm = Δ·GMl / (100·L)
        let mct = if lpp.abs() <= ZERO_TOLERANCE {
            Quantity::undefined(UndefinedReason::ZeroBoundingBox)
        } else {
            displacement_t.zip_with(gml, |delta, gm| delta * gm / (100.0 * lpp))
        };

        Ok(HydrostaticResult {
            draft_m,
            heel_deg,
            volume_m3: volume,
            displacement_kg,
            displacement_t,
            kb_m: kb,
            lcb_m: lcb,
            tcb_m: tcb,
            waterplane_area_m2: awp,
            lcf_m: lcf,
            iwp_transverse_m4: iwp_t,
            iwp_longitudinal_m4: iwp_l,
            bmt_m: bmt,
            bml_m: bml,
            kmt_m: kmt,
            kml_m: kml,
            gmt_m: gmt,
            gml_m: gml,
            lpp_m: lpp,
            beam_m: beam,
            midship_area_m2: midship_area,
            cb,
            cp,
            cm,
            cwp,
            tpc_t_per_cm: tpc,
            mct_tm_per_cm: mct,
        })
    }
}

/// Hydrostatics at one draft with the default engine.
///
/// # Arguments
///
/// * `hull` - Validated offset table
/// * `loadcase` - Water density and KG; `None` leaves GM and displacement undefined
/// * `draft_m` - Draft above keel, within the waterline range
/// * `heel_deg` - Heel angle, |φ| < 90°
pub fn compute_at_draft(
    hull: &HullGeometry,
    loadcase: Option<&Loadcase>,
    draft_m: f64,
    heel_deg: f64,
) -> HydroResult<HydrostaticResult> {
    HydrostaticsEngine::<CompositeSimpson>::default()
        .compute_at_draft(hull, loadcase, draft_m, heel_deg)
}

/// Upright hydrostatics for many drafts, one after another.
///
/// Rows come back in the order of `drafts_m`. `interrupt` is polled before
/// each draft; if it fires the whole table is abandoned with `Cancelled`,
/// whose `completed` counts the rows already computed. Callers that want
/// parallelism split `drafts_m` into chunks and call this per chunk.
pub fn hydrostatic_table<C, S>(
    calculator: &C,
    hull: &HullGeometry,
    loadcase: Option<&Loadcase>,
    drafts_m: &[f64],
    interrupt: &S,
) -> HydroResult<Vec<HydrostaticResult>>
where
    C: HydrostaticCalculator + ?Sized,
    S: Interrupt + ?Sized,
{
    tracing::debug!(rows = drafts_m.len(), "computing hydrostatic table");
    let mut rows = Vec::with_capacity(drafts_m.len());
    for (done, &draft) in drafts_m.iter().enumerate() {
        if interrupt.is_interrupted() {
            return Err(HydroError::cancelled("hydrostatic table", done));
        }
        rows.push(calculator.compute_at_draft(hull, loadcase, draft, 0.0)?);
    }
    Ok(rows)
}

/// Evenly spaced drafts from `from_m` to `to_m` inclusive.
///
/// Fails with `InvalidInput` when the step would give more than
/// [`MAX_TABLE_ROWS`] drafts.
pub fn draft_range(from_m: f64, to_m: f64, step_m: f64) -> HydroResult<Vec<f64>> {
    if !step_m.is_finite() || step_m <= 0.0 {
        return Err(HydroError::invalid_input(
            "step_m",
            step_m.to_string(),
            "Step must be positive",
        ));
    }
    if !from_m.is_finite() || !to_m.is_finite() || from_m > to_m {
        return Err(HydroError::invalid_input(
            "range",
            format!("{from_m}..{to_m}"),
            "Start must not exceed end",
        ));
    }
    let steps = ((to_m - from_m) / step_m + 1e-9).floor();
    if steps + 2.0 > MAX_TABLE_ROWS as f64 {
        return Err(HydroError::invalid_input(
            "step_m",
            step_m.to_string(),
            format!("Step gives more than {MAX_TABLE_ROWS} drafts"),
        ));
    }
    let count = steps as usize;
    let mut drafts: Vec<f64> = (0..=count).map(|i| from_m + step_m * i as f64).collect();
    if let Some(&last) = drafts.last() {
        if to_m - last > 1e-9 * step_m {
            drafts.push(to_m);
        }
    }
    Ok(drafts)
}

fn validate_draft(hull: &HullGeometry, draft_m: f64) -> HydroResult<()> {
    if !draft_m.is_finite() || draft_m < 0.0 {
        return Err(HydroError::invalid_input(
            "draft_m",
            draft_m.to_string(),
            "Draft must be zero or positive",
        ));
    }
    if draft_m > hull.max_height() + DRAFT_TOLERANCE_M {
        return Err(HydroError::invalid_input(
            "draft_m",
            draft_m.to_string(),
            format!("Draft exceeds the highest waterline ({} m)", hull.max_height()),
        ));
    }
    Ok(())
}

fn validate_heel(heel_deg: f64) -> HydroResult<()> {
    if !heel_deg.is_finite() || heel_deg.abs() >= 90.0 {
        return Err(HydroError::invalid_input(
            "heel_deg",
            heel_deg.to_string(),
            "Heel must lie strictly between -90° and 90°",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{
        barge_bml, barge_bmt, barge_kb, barge_volume, wigley_volume, WIGLEY_BLOCK_COEFFICIENT,
    };
    use crate::interrupt::{AfterPolls, CancelToken, Never};
    use proptest::prelude::*;

    fn rel_err(actual: f64, expected: f64) -> f64 {
        ((actual - expected) / expected).abs()
    }

    fn barge() -> HullGeometry {
        HullGeometry::rectangular_barge(100.0, 20.0, 10.0, 21, 41).unwrap()
    }

    #[test]
    fn test_barge_analytical() {
        let lc = Loadcase::new(1025.0, 4.0).unwrap();
        let hs = compute_at_draft(&barge(), Some(&lc), 5.0, 0.0).unwrap();

        assert!(rel_err(hs.volume_m3, barge_volume(100.0, 20.0, 5.0)) < 1e-9);
        assert!(rel_err(hs.displacement_kg.value().unwrap(), 10_250_000.0) < 1e-9);
        assert!(rel_err(hs.displacement_t.value().unwrap(), 10_250.0) < 1e-9);
        assert!(rel_err(hs.kb_m, barge_kb(5.0)) < 1e-9);
        assert!(rel_err(hs.lcb_m.value().unwrap(), 50.0) < 1e-9);
        assert_eq!(hs.tcb_m, 0.0);
        assert!(rel_err(hs.bmt_m.value().unwrap(), barge_bmt(20.0, 5.0)) < 0.005);
        assert!(rel_err(hs.bml_m.value().unwrap(), barge_bml(100.0, 5.0)) < 0.005);
        assert!(rel_err(hs.waterplane_area_m2, 2000.0) < 1e-9);
        assert!(rel_err(hs.lcf_m.value().unwrap(), 50.0) < 1e-9);

        for c in [hs.cb, hs.cp, hs.cm, hs.cwp] {
            assert!(rel_err(c.value().unwrap(), 1.0) < 0.01);
        }

        // GMt = KB + BMt - KG
        let gmt = hs.gmt_m.value().unwrap();
        assert!((gmt - (2.5 + 20.0 / 3.0 - 4.0)).abs() < 1e-6);
    }

    #[test]
    fn test_barge_off_grid_draft() {
        // draft between waterlines exercises the interpolated top sample
        let hs = compute_at_draft(&barge(), None, 3.3, 0.0).unwrap();
        assert!(rel_err(hs.volume_m3, barge_volume(100.0, 20.0, 3.3)) < 1e-9);
        assert!(rel_err(hs.kb_m, barge_kb(3.3)) < 1e-9);
        assert!(rel_err(hs.bmt_m.value().unwrap(), barge_bmt(20.0, 3.3)) < 0.005);
    }

    #[test]
    fn test_barge_even_station_count() {
        let hull = HullGeometry::rectangular_barge(100.0, 20.0, 10.0, 10, 8).unwrap();
        let hs = compute_at_draft(&hull, None, 5.0, 0.0).unwrap();
        assert!(rel_err(hs.volume_m3, 10_000.0) < 1e-9);
        assert!(rel_err(hs.kb_m, 2.5) < 1e-9);
        assert!(rel_err(hs.cb.value().unwrap(), 1.0) < 1e-9);
    }

    #[test]
    fn test_zero_draft() {
        let hs = compute_at_draft(&barge(), None, 0.0, 0.0).unwrap();
        assert_eq!(hs.volume_m3, 0.0);
        assert_eq!(hs.kb_m, 0.0);
        assert_eq!(hs.lcb_m, Quantity::undefined(UndefinedReason::ZeroVolume));
        assert_eq!(hs.bmt_m, Quantity::undefined(UndefinedReason::ZeroVolume));
        assert!(!hs.cb.is_defined());
        assert!(hs.bmt_m.require("BMt").is_err());
    }

    #[test]
    fn test_zero_waterplane_is_undefined() {
        // sections pinch to zero breadth at the top waterline
        let hull = HullGeometry::new(
            vec![0.0, 10.0, 20.0],
            vec![0.0, 1.0, 2.0],
            vec![vec![1.0, 1.0, 0.0]; 3],
        )
        .unwrap();
        let lc = Loadcase::sea_water(0.5).unwrap();
        let hs = compute_at_draft(&hull, Some(&lc), 2.0, 0.0).unwrap();
        assert!(hs.volume_m3 > 0.0);
        assert!(hs.waterplane_area_m2.abs() < 1e-12);
        assert_eq!(hs.bmt_m, Quantity::undefined(UndefinedReason::ZeroWaterplaneArea));
        assert_eq!(hs.gmt_m, Quantity::undefined(UndefinedReason::ZeroWaterplaneArea));
        assert_eq!(hs.lcf_m, Quantity::undefined(UndefinedReason::ZeroWaterplaneArea));
    }

    #[test]
    fn test_no_loadcase_leaves_gm_undefined() {
        let hs = compute_at_draft(&barge(), None, 5.0, 0.0).unwrap();
        assert_eq!(hs.gmt_m, Quantity::undefined(UndefinedReason::NoLoadcase));
        assert_eq!(hs.displacement_kg, Quantity::undefined(UndefinedReason::NoLoadcase));
        assert!(hs.kmt_m.is_defined());
    }

    #[test]
    fn test_wigley_benchmark() {
        let hull = HullGeometry::wigley(100.0, 10.0, 6.25, 8.0, 41, 33).unwrap();
        let hs = compute_at_draft(&hull, None, 6.25, 0.0).unwrap();
        let expected = 100.0 * 10.0 * 6.25 * 0.444;
        assert!(rel_err(hs.volume_m3, expected) < 0.02);
        assert!(rel_err(hs.cb.value().unwrap(), 0.444) < 0.02);
        assert!(rel_err(hs.volume_m3, wigley_volume(100.0, 10.0, 6.25)) < 0.02);
        assert!(rel_err(hs.cb.value().unwrap(), WIGLEY_BLOCK_COEFFICIENT) < 0.02);
        // symmetric fore and aft
        assert!((hs.lcb_m.value().unwrap() - 50.0).abs() < 1e-6);
        // Cwp and Cm of the parabolic hull are both 2/3
        assert!(rel_err(hs.cwp.value().unwrap(), 2.0 / 3.0) < 0.02);
        assert!(rel_err(hs.cm.value().unwrap(), 2.0 / 3.0) < 0.02);
    }

    #[test]
    fn test_deterministic() {
        let lc = Loadcase::sea_water(3.0).unwrap();
        let hull = HullGeometry::wigley(100.0, 10.0, 6.25, 8.0, 21, 17).unwrap();
        let a = compute_at_draft(&hull, Some(&lc), 4.1, 0.0).unwrap();
        let b = compute_at_draft(&hull, Some(&lc), 4.1, 0.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_heeled_buoyancy_shift() {
        let hs = compute_at_draft(&barge(), None, 5.0, 10.0).unwrap();
        let bmt = hs.bmt_m.value().unwrap();
        let tan = 10f64.to_radians().tan();
        assert!((hs.tcb_m - bmt * tan).abs() < 1e-9);
        assert!((hs.kb_m - (2.5 + 0.5 * bmt * tan * tan)).abs() < 1e-9);
        // volume is unchanged by heel in the wall-sided model
        assert!(rel_err(hs.volume_m3, 10_000.0) < 1e-9);
    }

    #[test]
    fn test_rejects_bad_drafts_and_heel() {
        assert!(compute_at_draft(&barge(), None, -1.0, 0.0).is_err());
        assert!(compute_at_draft(&barge(), None, 10.5, 0.0).is_err());
        assert!(compute_at_draft(&barge(), None, f64::NAN, 0.0).is_err());
        assert!(compute_at_draft(&barge(), None, 5.0, 90.0).is_err());
    }

    #[test]
    fn test_tpc_and_mct() {
        let lc = Loadcase::new(1025.0, 4.0).unwrap();
        let hs = compute_at_draft(&barge(), Some(&lc), 5.0, 0.0).unwrap();
        // TPC = Awp·ρ/100 000 = 2000·1025/1e5
        assert!(rel_err(hs.tpc_t_per_cm.value().unwrap(), 20.5) < 1e-9);
        let gml = hs.gml_m.value().unwrap();
        let expected = 10_250.0 * gml / (100.0 * 100.0);
        assert!(rel_err(hs.mct_tm_per_cm.value().unwrap(), expected) < 1e-9);
    }

    #[test]
    fn test_table_preserves_order() {
        let drafts = draft_range(1.0, 5.0, 1.0).unwrap();
        assert_eq!(drafts, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let engine = HydrostaticsEngine::<CompositeSimpson>::default();
        let rows = hydrostatic_table(&engine, &barge(), None, &drafts, &Never).unwrap();
        assert_eq!(rows.len(), 5);
        for (row, draft) in rows.iter().zip(&drafts) {
            assert_eq!(row.draft_m, *draft);
            assert!(rel_err(row.volume_m3, 2000.0 * draft) < 1e-9);
        }
    }

    #[test]
    fn test_table_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        let engine = HydrostaticsEngine::<CompositeSimpson>::default();
        let err = hydrostatic_table(&engine, &barge(), None, &[1.0, 2.0], &token).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.error_code(), "CANCELLED");
    }

    #[test]
    fn test_draft_range_appends_end() {
        assert_eq!(draft_range(0.0, 1.0, 0.4).unwrap().last(), Some(&1.0));
        assert!(draft_range(0.0, 1.0, 0.0).is_err());
        assert!(draft_range(2.0, 1.0, 0.5).is_err());
    }

    #[test]
    fn test_draft_range_rejects_tiny_step() {
        for step in [1e-300, 1e-9, f64::MIN_POSITIVE] {
            let err = draft_range(0.0, 10.0, step).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT");
        }
    }

    #[test]
    fn test_table_cancelled_midway() {
        let engine = HydrostaticsEngine::<CompositeSimpson>::default();
        let drafts = draft_range(1.0, 9.0, 1.0).unwrap();
        let err = hydrostatic_table(&engine, &barge(), None, &drafts, &AfterPolls::new(3))
            .unwrap_err();
        assert_eq!(err, HydroError::cancelled("hydrostatic table", 3));
    }

    #[test]
    fn test_result_serialization() {
        let hs = compute_at_draft(&barge(), None, 5.0, 0.0).unwrap();
        let json = serde_json::to_string(&hs).unwrap();
        let back: HydrostaticResult = serde_json::from_str(&json).unwrap();
        assert_eq!(hs, back);
    }

    proptest! {
        #[test]
        fn prop_volume_increases_with_draft(d1 in 0.05f64..7.9, gap in 0.01f64..0.1) {
            let hull = HullGeometry::wigley(100.0, 10.0, 6.25, 8.0, 21, 17).unwrap();
            let d2 = (d1 + gap).min(8.0);
            let v1 = compute_at_draft(&hull, None, d1, 0.0).unwrap().volume_m3;
            let v2 = compute_at_draft(&hull, None, d2, 0.0).unwrap().volume_m3;
            prop_assert!(v1 < v2);
        }
    }
}
