//! # Numerical Integration
//!
//! Quadrature over sampled 1-D functions. The same engine integrates
//! half-breadths over height (sectional areas), sectional areas over length
//! (volume), and GZ over heel angle (dynamic stability areas).
//!
//! ## Rule Selection
//!
//! The samples are split into maximal runs of uniform spacing. Within each run
//! composite Simpson's rule covers the largest even number of intervals; a
//! leftover odd interval at the end of the run uses the trapezoidal rule.
//!
//! | Samples | Rule |
//! |---------|------|
//! | 0 or 1 point | 0 |
//! | 2 points | trapezoid |
//! | uniform, odd count | composite Simpson |
//! | uniform, even count | Simpson + one trapezoid interval |
//! | non-uniform | per uniform run, as above |
//!
//! Every branch integrates constant and linear functions exactly, so
//! constant-section hulls (a rectangular barge) come out exact whatever
//! the station/waterline spacing. Uniform odd-count runs are also exact for
//! cubics.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::integration::integrate;
//!
//! // ∫₀² x² dx = 8/3, exact under Simpson
//! let xs = [0.0, 0.5, 1.0, 1.5, 2.0];
//! let ys: Vec<f64> = xs.iter().map(|x| x * x).collect();
//! let area = integrate(&xs, &ys).unwrap();
//! assert!((area - 8.0 / 3.0).abs() < 1e-12);
//! ```

use crate::errors::{HydroError, HydroResult};

/// Relative spacing difference below which two intervals count as equal
pub const UNIFORM_SPACING_TOLERANCE: f64 = 1e-9;

/// Capability interface for 1-D quadrature over sampled data.
pub trait Integrator: Send + Sync {
    /// ∫ y dx over the full sampled domain.
    ///
    /// `xs` must be strictly increasing and the same length as `ys`.
    fn integrate(&self, xs: &[f64], ys: &[f64]) -> HydroResult<f64>;

    /// ∫ y dx from `lower` to `upper`, interpolating linearly at bounds
    /// that fall between samples.
    fn integrate_between(
        &self,
        xs: &[f64],
        ys: &[f64],
        lower: f64,
        upper: f64,
    ) -> HydroResult<f64> {
        let (cx, cy) = clip_samples(xs, ys, lower, upper)?;
        self.integrate(&cx, &cy)
    }
}

/// Production integrator: Simpson on uniform runs, trapezoid elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct CompositeSimpson {
    /// Relative tolerance used to decide whether spacing is uniform
    pub spacing_tolerance: f64,
}

impl Default for CompositeSimpson {
    fn default() -> Self {
        CompositeSimpson {
            spacing_tolerance: UNIFORM_SPACING_TOLERANCE,
        }
    }
}

impl Integrator for CompositeSimpson {
    fn integrate(&self, xs: &[f64], ys: &[f64]) -> HydroResult<f64> {
        validate_samples(xs, ys)?;

        let n = xs.len();
        if n < 2 {
            return Ok(0.0);
        }
        if n == 2 {
            return Ok(trapezoid(xs, ys));
        }

        let mut total = 0.0;
        let mut start = 0;
        while start < n - 1 {
            let end = self.uniform_run_end(xs, start);
            let intervals = end - start;
            let even = intervals - intervals % 2;
            if even >= 2 {
                total += simpson(&xs[start..=start + even], &ys[start..=start + even]);
            }
            if even < intervals {
                total += trapezoid(&xs[start + even..=end], &ys[start + even..=end]);
            }
            start = end;
        }
        Ok(total)
    }
}

impl CompositeSimpson {
    /// Last index of the uniformly spaced run beginning at `start`.
    fn uniform_run_end(&self, xs: &[f64], start: usize) -> usize {
        let h = xs[start + 1] - xs[start];
        let tol = self.spacing_tolerance * h.abs();
        let mut end = start + 1;
        while end + 1 < xs.len() && ((xs[end + 1] - xs[end]) - h).abs() <= tol {
            end += 1;
        }
        end
    }
}

/// Integrate with the default [`CompositeSimpson`] rule.
pub fn integrate(xs: &[f64], ys: &[f64]) -> HydroResult<f64> {
    CompositeSimpson::default().integrate(xs, ys)
}

/// Integrate between two bounds with the default rule.
pub fn integrate_between(xs: &[f64], ys: &[f64], lower: f64, upper: f64) -> HydroResult<f64> {
    CompositeSimpson::default().integrate_between(xs, ys, lower, upper)
}

/// Linear interpolation of the sampled function at `x`.
///
/// Returns `None` outside `[xs[0], xs[n-1]]` or for an empty sample set.
/// `xs` is assumed strictly increasing.
pub fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n == 0 || x < xs[0] || x > xs[n - 1] {
        return None;
    }
    // first index whose x is >= target
    let hi = xs[..n].partition_point(|&xi| xi < x);
    if hi == 0 {
        return Some(ys[0]);
    }
    let lo = hi - 1;
    if xs[hi] == x {
        return Some(ys[hi]);
    }
    let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
    Some(ys[lo] + t * (ys[hi] - ys[lo]))
}

/// Composite trapezoidal rule on arbitrary spacing
fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1]))
        .sum()
}

/// Composite Simpson's 1/3 rule; caller guarantees uniform spacing and odd length
fn simpson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    let h = (xs[n - 1] - xs[0]) / (n - 1) as f64;
    let inner: f64 = ys[1..n - 1]
        .iter()
        .enumerate()
        .map(|(i, y)| if i % 2 == 0 { 4.0 * y } else { 2.0 * y })
        .sum();
    h / 3.0 * (ys[0] + inner + ys[n - 1])
}

fn validate_samples(xs: &[f64], ys: &[f64]) -> HydroResult<()> {
    if xs.len() != ys.len() {
        return Err(HydroError::invalid_input(
            "samples",
            format!("{} x / {} y", xs.len(), ys.len()),
            "x and y sample counts differ",
        ));
    }
    if let Some(bad) = xs.iter().chain(ys).find(|v| !v.is_finite()) {
        return Err(HydroError::invalid_input("samples", bad.to_string(), "Samples must be finite"));
    }
    if let Some(i) = xs.windows(2).position(|w| w[1] <= w[0]) {
        return Err(HydroError::invalid_input(
            "samples",
            format!("x[{}]={}, x[{}]={}", i, xs[i], i + 1, xs[i + 1]),
            "x must be strictly increasing",
        ));
    }
    Ok(())
}

/// Restrict samples to `[lower, upper]`, adding interpolated end points.
fn clip_samples(
    xs: &[f64],
    ys: &[f64],
    lower: f64,
    upper: f64,
) -> HydroResult<(Vec<f64>, Vec<f64>)> {
    validate_samples(xs, ys)?;
    if lower.is_nan() || upper.is_nan() || lower > upper {
        return Err(HydroError::invalid_input(
            "bounds",
            format!("{lower}..{upper}"),
            "Lower bound must not exceed upper bound",
        ));
    }
    let lo_y = interpolate(xs, ys, lower);
    let hi_y = interpolate(xs, ys, upper);
    let (Some(lo_y), Some(hi_y)) = (lo_y, hi_y) else {
        return Err(HydroError::invalid_input(
            "bounds",
            format!("{lower}..{upper}"),
            "Bounds lie outside the sampled domain",
        ));
    };

    let mut cx = vec![lower];
    let mut cy = vec![lo_y];
    for (&x, &y) in xs.iter().zip(ys) {
        if x > lower && x < upper {
            cx.push(x);
            cy.push(y);
        }
    }
    if upper > lower {
        cx.push(upper);
        cy.push(hi_y);
    }
    Ok((cx, cy))
}
