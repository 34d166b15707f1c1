//! # Closed-Form Hydrostatic Equations
//!
//! Analytical formulas used by the calculators and as reference values for
//! benchmark hulls. Having them in one place keeps the wall-sided relations
//! and the box-barge benchmarks consistent across modules.
//!
//! ## Notation
//!
//! - `L` = length between perpendiculars (m)
//! - `B` = moulded beam (m)
//! - `T` = draft (m)
//! - `φ` = heel angle (rad)
//! - `GMt`, `BMt` = transverse metacentric height / radius (m)
//!
//! ## References
//!
//! - Rawson & Tupper, *Basic Ship Theory*, Vol. 1, Ch. 4 (wall-sided formula)
//! - Biran & López-Pulido, *Ship Hydrostatics and Stability*, Ch. 2-3
//! - Wigley, W.C.S., *A comparison of experiment and calculated wave profiles*, 1934

// =============================================================================
// WALL-SIDED RELATIONS
// Valid while the immersed/emerged wedges stay within vertical sides
// =============================================================================

/// Righting arm from the wall-sided formula.
///
/// # Formula
/// GZ(φ) = (GMt + ½·BMt·tan²φ) · sin φ
///
/// # Example
/// ```rust
/// use hydro_core::equations::wall_sided_gz;
///
/// // upright: no righting arm
/// assert_eq!(wall_sided_gz(1.0, 5.0, 0.0), 0.0);
/// // small angles approach GM·sinφ
/// let phi = 0.01_f64;
/// assert!((wall_sided_gz(1.0, 5.0, phi) - phi.sin()).abs() < 1e-3);
/// ```
#[inline]
pub fn wall_sided_gz(gmt_m: f64, bmt_m: f64, heel_rad: f64) -> f64 {
    let tan = heel_rad.tan();
    (gmt_m + 0.5 * bmt_m * tan * tan) * heel_rad.sin()
}

/// Transverse and vertical shift of the centre of buoyancy when heeled.
///
/// # Formula
/// - Δy_B = BMt · tanφ
/// - Δz_B = ½ · BMt · tan²φ
///
/// Returns `(transverse_shift_m, vertical_shift_m)`.
#[inline]
pub fn wall_sided_buoyancy_shift(bmt_m: f64, heel_rad: f64) -> (f64, f64) {
    let tan = heel_rad.tan();
    (bmt_m * tan, 0.5 * bmt_m * tan * tan)
}

/// Angle of loll for a wall-sided hull with negative initial GMt.
///
/// # Formula
/// tan φ_loll = √(−2·GMt / BMt)
///
/// Returns `None` when GMt ≥ 0 (no loll) or BMt ≤ 0.
pub fn wall_sided_angle_of_loll(gmt_m: f64, bmt_m: f64) -> Option<f64> {
    if gmt_m >= 0.0 || bmt_m <= 0.0 {
        return None;
    }
    Some((-2.0 * gmt_m / bmt_m).sqrt().atan())
}

// =============================================================================
// RECTANGULAR BARGE
// Constant rectangular section B × T over the full length L
// =============================================================================

/// Displaced volume of a box barge: V = L·B·T
#[inline]
pub fn barge_volume(length_m: f64, beam_m: f64, draft_m: f64) -> f64 {
    length_m * beam_m * draft_m
}

/// Centre of buoyancy of a box barge: KB = T/2
#[inline]
pub fn barge_kb(draft_m: f64) -> f64 {
    draft_m / 2.0
}

/// Transverse metacentric radius of a box barge: BMt = B²/(12·T)
#[inline]
pub fn barge_bmt(beam_m: f64, draft_m: f64) -> f64 {
    beam_m * beam_m / (12.0 * draft_m)
}

/// Longitudinal metacentric radius of a box barge: BMl = L²/(12·T)
#[inline]
pub fn barge_bml(length_m: f64, draft_m: f64) -> f64 {
    length_m * length_m / (12.0 * draft_m)
}

// =============================================================================
// WIGLEY HULL
// y = B/2 · (1 − (2ξ/L)²) · (1 − (ζ/T)²)
// =============================================================================

/// Block coefficient of the parabolic Wigley hull at its design draft.
///
/// Each parabola contributes a factor 2/3: Cb = (2/3)·(2/3) = 4/9.
pub const WIGLEY_BLOCK_COEFFICIENT: f64 = 4.0 / 9.0;

/// Displaced volume of the Wigley hull at its design draft: V = Cb·L·B·T
#[inline]
pub fn wigley_volume(length_m: f64, beam_m: f64, draft_m: f64) -> f64 {
    WIGLEY_BLOCK_COEFFICIENT * length_m * beam_m * draft_m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_sided_gz_is_odd() {
        let a = wall_sided_gz(0.8, 4.0, 0.3);
        let b = wall_sided_gz(0.8, 4.0, -0.3);
        assert!((a + b).abs() < 1e-12);
    }

    #[test]
    fn test_angle_of_loll_zeroes_gz() {
        let (gm, bm) = (-0.5, 4.0);
        let loll = wall_sided_angle_of_loll(gm, bm).unwrap();
        assert!(wall_sided_gz(gm, bm, loll).abs() < 1e-12);
        assert!(wall_sided_angle_of_loll(0.5, 4.0).is_none());
    }

    #[test]
    fn test_barge_formulas() {
        assert!((barge_volume(100.0, 20.0, 5.0) - 10_000.0).abs() < 1e-9);
        assert!((barge_kb(5.0) - 2.5).abs() < 1e-12);
        assert!((barge_bmt(20.0, 5.0) - 20.0 / 3.0).abs() < 1e-12);
        assert!((barge_bml(100.0, 5.0) - 10_000.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_buoyancy_shift_upright_is_zero() {
        assert_eq!(wall_sided_buoyancy_shift(6.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_wigley_block_coefficient() {
        assert!((WIGLEY_BLOCK_COEFFICIENT - 0.4444).abs() < 1e-4);
        assert!((wigley_volume(100.0, 10.0, 6.25) - 2777.78).abs() < 0.01);
    }
}
