//! CTRV motion propagation and predicted mean/covariance recombination.
//!
//! The Constant-Turn-Rate-and-Velocity model assumes speed and yaw rate
//! stay constant between measurements, which traces a circular arc (or a
//! straight line in the zero-yaw-rate limit). Noise enters as
//! longitudinal and yaw acceleration applied after the noise-free
//! dynamics; this two-stage structure is what the augmented sigma point
//! formulation samples, so it must not be folded into a single step.

use nalgebra::{DMatrix, DVector};

use super::{N_SIG, N_X};
use crate::common::linalg::normalize_angle;

/// Yaw rates below this magnitude use the straight-line limit of the
/// CTRV equations instead of dividing by the yaw rate.
pub const YAW_RATE_EPS: f64 = 1e-3;

/// Propagate a single augmented sigma point through the CTRV model.
///
/// Stage 1 applies the deterministic dynamics over `dt`; stage 2 adds the
/// sampled acceleration noise terms (`nu_a`, `nu_yawdd`) with their
/// quadratic position / linear velocity contributions.
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn ctrv_transition(
    px: f64,
    py: f64,
    v: f64,
    yaw: f64,
    yawd: f64,
    nu_a: f64,
    nu_yawdd: f64,
    dt: f64,
) -> [f64; 5] {
    // Noise-free dynamics; guard the division by the yaw rate
    let (mut px_p, mut py_p) = if yawd.abs() > YAW_RATE_EPS {
        (
            px + v / yawd * ((yaw + yawd * dt).sin() - yaw.sin()),
            py + v / yawd * (yaw.cos() - (yaw + yawd * dt).cos()),
        )
    } else {
        (px + v * dt * yaw.cos(), py + v * dt * yaw.sin())
    };
    let mut v_p = v;
    let mut yaw_p = yaw + yawd * dt;
    let mut yawd_p = yawd;

    // Acceleration noise, applied along the current heading
    px_p += 0.5 * nu_a * dt * dt * yaw.cos();
    py_p += 0.5 * nu_a * dt * dt * yaw.sin();
    v_p += nu_a * dt;
    yaw_p += 0.5 * nu_yawdd * dt * dt;
    yawd_p += nu_yawdd * dt;

    [px_p, py_p, v_p, yaw_p, yawd_p]
}

/// Propagate all augmented sigma points forward by `dt` seconds.
///
/// Takes the 7×15 augmented sigma point matrix and returns the 5×15
/// matrix of predicted (state-dimension) sigma points.
pub fn predict_sigma_points(xsig_aug: &DMatrix<f64>, dt: f64) -> DMatrix<f64> {
    let mut xsig_pred = DMatrix::zeros(N_X, N_SIG);
    for i in 0..N_SIG {
        let predicted = ctrv_transition(
            xsig_aug[(0, i)],
            xsig_aug[(1, i)],
            xsig_aug[(2, i)],
            xsig_aug[(3, i)],
            xsig_aug[(4, i)],
            xsig_aug[(5, i)],
            xsig_aug[(6, i)],
            dt,
        );
        for (row, value) in predicted.iter().enumerate() {
            xsig_pred[(row, i)] = *value;
        }
    }
    xsig_pred
}

/// Recombine predicted sigma points into the predicted state mean and
/// covariance.
///
/// The yaw component of each deviation is wrapped to `(-π, π]` before the
/// outer product; sigma points straddling the ±π discontinuity would
/// otherwise blow up the covariance.
pub fn predicted_mean_and_covariance(
    xsig_pred: &DMatrix<f64>,
    weights: &DVector<f64>,
) -> (DVector<f64>, DMatrix<f64>) {
    let mut x = DVector::zeros(N_X);
    for i in 0..N_SIG {
        x += weights[i] * xsig_pred.column(i);
    }

    let mut p = DMatrix::zeros(N_X, N_X);
    for i in 0..N_SIG {
        let mut x_diff = xsig_pred.column(i) - &x;
        x_diff[3] = normalize_angle(x_diff[3]);
        p += weights[i] * &x_diff * x_diff.transpose();
    }

    (x, p)
}
