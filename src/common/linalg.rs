//! Numeric helpers for angle arithmetic and quadratic forms.

use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;

/// Wrap an angle into the interval `(-π, π]`.
///
/// Heading and bearing residuals must be wrapped before entering any
/// covariance accumulation; a raw difference near the ±π discontinuity
/// would otherwise corrupt the outer products.
///
/// The mapping is idempotent: wrapping an already wrapped value returns
/// it unchanged.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    // (PI - angle).rem_euclid(2π) lies in [0, 2π), so the result lies in (-π, π].
    PI - (PI - angle).rem_euclid(2.0 * PI)
}

/// Compute the quadratic form `vᵀ × M × v`.
///
/// Used for the NIS statistic, where `M` is the inverse innovation
/// covariance and `v` the innovation.
#[inline]
pub fn quadratic_form(v: &DVector<f64>, m: &DMatrix<f64>) -> f64 {
    v.dot(&(m * v))
}

/// Maximum absolute asymmetry `max |M - Mᵀ|` of a square matrix.
///
/// A covariance matrix drifting away from symmetry indicates a numerical
/// fault in the update arithmetic, so tests assert this stays near zero.
pub fn max_asymmetry(m: &DMatrix<f64>) -> f64 {
    let mut worst: f64 = 0.0;
    for i in 0..m.nrows() {
        for j in (i + 1)..m.ncols() {
            worst = worst.max((m[(i, j)] - m[(j, i)]).abs());
        }
    }
    worst
}
