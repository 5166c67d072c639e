//! Measurement models and the shared unscented update.
//!
//! Both sensors run the same gain/covariance arithmetic; they differ only
//! in how a predicted sigma point maps into observation space and in
//! whether one residual component is an angle. That seam is the
//! [`MeasurementModel`] trait, with one implementation per sensor.

use nalgebra::{DMatrix, DVector, DVectorView};

use super::N_SIG;
use crate::common::linalg::{normalize_angle, quadratic_form};
use crate::filter::FilterError;

/// Observation model for one sensor type.
///
/// Implementations own their fixed measurement noise covariance, supplied
/// at construction.
pub trait MeasurementModel {
    /// Measurement space dimension
    fn z_dim(&self) -> usize;

    /// Fixed measurement noise covariance (`z_dim` × `z_dim`)
    fn noise(&self) -> &DMatrix<f64>;

    /// Index of the angular residual component, if the model has one.
    /// Residuals in that component are wrapped to `(-π, π]`.
    fn wrapped_component(&self) -> Option<usize>;

    /// Map one predicted sigma point (a state-space column) into
    /// measurement space.
    fn project(&self, state: DVectorView<f64>) -> DVector<f64>;
}

/// Cartesian position sensor (lidar): observes `(px, py)` directly.
#[derive(Debug, Clone)]
pub struct PositionModel {
    noise: DMatrix<f64>,
}

impl PositionModel {
    /// Create a position model from per-axis noise standard deviations.
    pub fn new(std_px: f64, std_py: f64) -> Self {
        let noise = DMatrix::from_diagonal(&DVector::from_vec(vec![
            std_px * std_px,
            std_py * std_py,
        ]));
        Self { noise }
    }
}

impl MeasurementModel for PositionModel {
    fn z_dim(&self) -> usize {
        2
    }

    fn noise(&self) -> &DMatrix<f64> {
        &self.noise
    }

    fn wrapped_component(&self) -> Option<usize> {
        None
    }

    fn project(&self, state: DVectorView<f64>) -> DVector<f64> {
        DVector::from_vec(vec![state[0], state[1]])
    }
}

/// Polar sensor (radar): observes `(range, bearing, range-rate)`.
#[derive(Debug, Clone)]
pub struct PolarModel {
    noise: DMatrix<f64>,
}

impl PolarModel {
    /// Create a polar model from range, bearing and range-rate noise
    /// standard deviations.
    pub fn new(std_r: f64, std_phi: f64, std_rd: f64) -> Self {
        let noise = DMatrix::from_diagonal(&DVector::from_vec(vec![
            std_r * std_r,
            std_phi * std_phi,
            std_rd * std_rd,
        ]));
        Self { noise }
    }
}

impl MeasurementModel for PolarModel {
    fn z_dim(&self) -> usize {
        3
    }

    fn noise(&self) -> &DMatrix<f64> {
        &self.noise
    }

    fn wrapped_component(&self) -> Option<usize> {
        Some(1)
    }

    fn project(&self, state: DVectorView<f64>) -> DVector<f64> {
        let mut px = state[0];
        let mut py = state[1];
        let v = state[2];
        let yaw = state[3];

        let range = (px * px + py * py).sqrt();

        // At the sensor origin both atan2 and the range-rate division are
        // undefined; nudge the position by machine epsilon.
        if px.abs() < f64::EPSILON && py.abs() < f64::EPSILON {
            px = f64::EPSILON;
            py = f64::EPSILON;
        }

        let bearing = py.atan2(px);
        let range_rate =
            (px * v * yaw.cos() + py * v * yaw.sin()) / (px * px + py * py).sqrt();

        DVector::from_vec(vec![range, bearing, range_rate])
    }
}

/// Result of one measurement update.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// Corrected state mean
    pub state: DVector<f64>,
    /// Corrected state covariance
    pub covariance: DMatrix<f64>,
    /// Normalized Innovation Squared for this update
    pub nis: f64,
}

/// Fuse one measurement with the predicted state distribution.
///
/// Shared by both sensors; the model parameter supplies the projection,
/// the noise covariance and the residual wrap policy.
///
/// # Arguments
/// * `state` - Predicted state mean (5)
/// * `covariance` - Predicted state covariance (5×5)
/// * `xsig_pred` - Predicted sigma points (5×15)
/// * `weights` - Sigma point weights (15)
/// * `model` - Measurement model for the sensor that produced `z`
/// * `z` - Actual measurement
///
/// # Errors
/// * [`FilterError::DimensionMismatch`] when `z` does not match the
///   model's measurement dimension
/// * [`FilterError::SingularMatrix`] when the innovation covariance is
///   not invertible; no internal fallback is attempted
pub fn update<M: MeasurementModel>(
    state: &DVector<f64>,
    covariance: &DMatrix<f64>,
    xsig_pred: &DMatrix<f64>,
    weights: &DVector<f64>,
    model: &M,
    z: &DVector<f64>,
) -> Result<UpdateOutcome, FilterError> {
    let n_z = model.z_dim();
    if z.len() != n_z {
        return Err(FilterError::DimensionMismatch {
            expected: n_z,
            actual: z.len(),
            context: "measurement vector".to_string(),
        });
    }

    // Project sigma points into measurement space
    let mut zsig = DMatrix::zeros(n_z, N_SIG);
    for i in 0..N_SIG {
        zsig.column_mut(i).copy_from(&model.project(xsig_pred.column(i)));
    }

    // Predicted measurement mean
    let mut z_pred = DVector::zeros(n_z);
    for i in 0..N_SIG {
        z_pred += weights[i] * zsig.column(i);
    }

    // Innovation covariance S and state/measurement cross covariance Tc
    let mut s = model.noise().clone();
    let mut tc = DMatrix::zeros(state.len(), n_z);
    for i in 0..N_SIG {
        let mut z_diff = zsig.column(i) - &z_pred;
        if let Some(c) = model.wrapped_component() {
            z_diff[c] = normalize_angle(z_diff[c]);
        }

        let mut x_diff = xsig_pred.column(i) - state;
        x_diff[3] = normalize_angle(x_diff[3]);

        s += weights[i] * &z_diff * z_diff.transpose();
        tc += weights[i] * &x_diff * z_diff.transpose();
    }

    // A non-invertible S means no valid gain exists; surface it
    let s_inv = s
        .clone()
        .cholesky()
        .ok_or_else(|| FilterError::SingularMatrix {
            context: "innovation covariance".to_string(),
        })?
        .inverse();

    // Kalman gain and wrapped innovation
    let gain = &tc * &s_inv;
    let mut innovation = z - &z_pred;
    if let Some(c) = model.wrapped_component() {
        innovation[c] = normalize_angle(innovation[c]);
    }

    let new_state = state + &gain * &innovation;
    let new_covariance = covariance - &gain * &s * gain.transpose();
    let nis = quadratic_form(&innovation, &s_inv);

    Ok(UpdateOutcome {
        state: new_state,
        covariance: new_covariance,
        nis,
    })
}
