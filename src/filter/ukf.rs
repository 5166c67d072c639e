//! The `CtrvUkf` estimator.
//!
//! Owns the state mean, covariance, sigma point weights and per-sensor
//! NIS values, and runs one predict/update cycle per delivered
//! measurement. Single-threaded and call-and-return: the caller is
//! responsible for delivering measurements in non-decreasing timestamp
//! order.

use nalgebra::{DMatrix, DVector};

use crate::components::prediction::{predict_sigma_points, predicted_mean_and_covariance};
use crate::components::sigma_points::{augmented_sigma_points, sigma_weights};
use crate::components::update::{update, PolarModel, PositionModel};
use crate::components::N_X;
use crate::filter::{FilterError, UkfConfig};
use crate::measurements::{Measurement, SensorType};

/// What a call to [`CtrvUkf::step`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// First enabled measurement bootstrapped the state; no prediction or
    /// update ran
    Initialized,
    /// The measurement's sensor type is disabled; nothing was touched
    Skipped,
    /// A full predict/update cycle ran
    Updated {
        /// Normalized Innovation Squared of this update
        nis: f64,
    },
}

/// Unscented Kalman filter over the CTRV motion model.
///
/// State vector: `[px, py, v, yaw, yawd]` - 2D position, speed, heading
/// and heading rate. One instance tracks one object; the instance owns
/// all mutable estimation state.
#[derive(Debug, Clone)]
pub struct CtrvUkf {
    config: UkfConfig,

    /// State mean, valid once initialized
    x: DVector<f64>,
    /// State covariance
    p: DMatrix<f64>,
    /// Sigma point weights, fixed per instance
    weights: DVector<f64>,

    lidar_model: PositionModel,
    radar_model: PolarModel,

    /// Timestamp of the last accepted measurement; `None` until the
    /// bootstrap measurement arrives
    time: Option<i64>,

    nis_lidar: Option<f64>,
    nis_radar: Option<f64>,
}

impl CtrvUkf {
    /// Create an uninitialized filter; the first enabled measurement
    /// bootstraps the state.
    pub fn new(config: UkfConfig) -> Self {
        let lidar_model = PositionModel::new(config.std_laspx, config.std_laspy);
        let radar_model = PolarModel::new(config.std_radr, config.std_radphi, config.std_radrd);
        Self {
            config,
            x: DVector::zeros(N_X),
            p: DMatrix::identity(N_X, N_X),
            weights: sigma_weights(),
            lidar_model,
            radar_model,
            time: None,
            nis_lidar: None,
            nis_radar: None,
        }
    }

    /// Process one measurement.
    ///
    /// The first measurement of an enabled sensor type initializes the
    /// state directly (polar measurements are converted to Cartesian) and
    /// performs no prediction or update. Later measurements run the full
    /// sigma-point predict/update cycle for their sensor type.
    /// Measurements of a disabled sensor type are skipped without
    /// touching any filter state.
    ///
    /// # Errors
    /// * [`FilterError::DimensionMismatch`] for a malformed measurement
    /// * [`FilterError::NonMonotonicTime`] when the timestamp moves
    ///   backwards
    /// * [`FilterError::NotPositiveDefinite`] /
    ///   [`FilterError::SingularMatrix`] on numerical faults; the state
    ///   is left as it was before the call
    pub fn step(&mut self, measurement: &Measurement) -> Result<StepOutcome, FilterError> {
        let expected = measurement.sensor_type.z_dim();
        if measurement.values.len() != expected {
            return Err(FilterError::DimensionMismatch {
                expected,
                actual: measurement.values.len(),
                context: "measurement vector".to_string(),
            });
        }

        if !self.sensor_enabled(measurement.sensor_type) {
            log::debug!(
                "Skipping {:?} measurement at t={} (sensor disabled)",
                measurement.sensor_type,
                measurement.timestamp
            );
            return Ok(StepOutcome::Skipped);
        }

        let previous = match self.time {
            Some(t) => t,
            None => {
                self.initialize(measurement);
                log::debug!(
                    "Initialized from {:?} measurement at t={}",
                    measurement.sensor_type,
                    measurement.timestamp
                );
                return Ok(StepOutcome::Initialized);
            }
        };

        let dt = (measurement.timestamp - previous) as f64 / self.config.ticks_per_second;
        if dt < 0.0 {
            return Err(FilterError::NonMonotonicTime { dt });
        }

        // Prediction: sample, propagate, recombine
        let xsig_aug =
            augmented_sigma_points(&self.x, &self.p, self.config.std_a, self.config.std_yawdd)?;
        let xsig_pred = predict_sigma_points(&xsig_aug, dt);
        let (x_pred, p_pred) = predicted_mean_and_covariance(&xsig_pred, &self.weights);

        // Update with the model matching the sensor type
        let outcome = match measurement.sensor_type {
            SensorType::Lidar => update(
                &x_pred,
                &p_pred,
                &xsig_pred,
                &self.weights,
                &self.lidar_model,
                &measurement.values,
            )?,
            SensorType::Radar => update(
                &x_pred,
                &p_pred,
                &xsig_pred,
                &self.weights,
                &self.radar_model,
                &measurement.values,
            )?,
        };

        self.x = outcome.state;
        self.p = outcome.covariance;
        match measurement.sensor_type {
            SensorType::Lidar => self.nis_lidar = Some(outcome.nis),
            SensorType::Radar => self.nis_radar = Some(outcome.nis),
        }
        self.time = Some(measurement.timestamp);

        log::trace!(
            "{:?} update at t={}: dt={:.6}s nis={:.3}",
            measurement.sensor_type,
            measurement.timestamp,
            dt,
            outcome.nis
        );

        Ok(StepOutcome::Updated { nis: outcome.nis })
    }

    fn sensor_enabled(&self, sensor: SensorType) -> bool {
        match sensor {
            SensorType::Lidar => self.config.use_lidar,
            SensorType::Radar => self.config.use_radar,
        }
    }

    fn initialize(&mut self, measurement: &Measurement) {
        match measurement.sensor_type {
            SensorType::Lidar => {
                self.x = DVector::from_vec(vec![
                    measurement.values[0],
                    measurement.values[1],
                    0.0,
                    0.0,
                    0.0,
                ]);
            }
            SensorType::Radar => {
                let rho = measurement.values[0];
                let phi = measurement.values[1];
                // Range-rate is the speed along the range direction only,
                // but it is still a better initial speed than zero.
                let rho_dot = measurement.values[2];
                self.x = DVector::from_vec(vec![
                    rho * phi.cos(),
                    rho * phi.sin(),
                    rho_dot,
                    0.0,
                    0.0,
                ]);
            }
        }
        self.p = DMatrix::identity(N_X, N_X);
        self.time = Some(measurement.timestamp);
    }

    /// Current state mean `[px, py, v, yaw, yawd]`.
    pub fn state(&self) -> &DVector<f64> {
        &self.x
    }

    /// Current state covariance (5×5).
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.p
    }

    /// NIS of the most recent update for a sensor type, if any update of
    /// that type has run.
    pub fn nis(&self, sensor: SensorType) -> Option<f64> {
        match sensor {
            SensorType::Lidar => self.nis_lidar,
            SensorType::Radar => self.nis_radar,
        }
    }

    /// Whether a bootstrap measurement has been accepted.
    pub fn is_initialized(&self) -> bool {
        self.time.is_some()
    }

    /// Filter configuration.
    pub fn config(&self) -> &UkfConfig {
        &self.config
    }

    /// Return the filter to the uninitialized state, keeping its
    /// configuration.
    pub fn reset(&mut self) {
        self.x = DVector::zeros(N_X);
        self.p = DMatrix::identity(N_X, N_X);
        self.time = None;
        self.nis_lidar = None;
        self.nis_radar = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::linalg::max_asymmetry;

    #[test]
    fn test_lidar_bootstrap() {
        let mut filter = CtrvUkf::new(UkfConfig::default());
        assert!(!filter.is_initialized());

        let outcome = filter.step(&Measurement::lidar(1.0, 0.5, 0)).unwrap();
        assert_eq!(outcome, StepOutcome::Initialized);
        assert!(filter.is_initialized());

        let x = filter.state();
        assert_eq!(x[0], 1.0);
        assert_eq!(x[1], 0.5);
        assert_eq!(x[2], 0.0);
        assert_eq!(x[3], 0.0);
        assert_eq!(x[4], 0.0);
        assert_eq!(filter.covariance(), &DMatrix::identity(N_X, N_X));
        assert!(filter.nis(SensorType::Lidar).is_none());
    }

    #[test]
    fn test_radar_bootstrap() {
        let mut filter = CtrvUkf::new(UkfConfig::default());
        let outcome = filter.step(&Measurement::radar(5.0, 0.0, 2.0, 0)).unwrap();
        assert_eq!(outcome, StepOutcome::Initialized);

        let x = filter.state();
        assert!((x[0] - 5.0).abs() < 1e-12);
        assert!(x[1].abs() < 1e-12);
        assert!((x[2] - 2.0).abs() < 1e-12);
        assert_eq!(x[3], 0.0);
        assert_eq!(x[4], 0.0);
    }

    #[test]
    fn test_second_measurement_updates() {
        let mut filter = CtrvUkf::new(UkfConfig::default());
        filter.step(&Measurement::lidar(1.0, 0.5, 0)).unwrap();

        let outcome = filter
            .step(&Measurement::lidar(1.1, 0.55, 100_000))
            .unwrap();
        assert!(matches!(outcome, StepOutcome::Updated { nis } if nis >= 0.0));
        assert!(filter.nis(SensorType::Lidar).is_some());
        assert!(filter.nis(SensorType::Radar).is_none());
        assert!(max_asymmetry(filter.covariance()) < 1e-9);
    }

    #[test]
    fn test_disabled_sensor_is_skipped_at_bootstrap() {
        let mut filter = CtrvUkf::new(UkfConfig::default().without_radar());

        let outcome = filter.step(&Measurement::radar(5.0, 0.0, 2.0, 0)).unwrap();
        assert_eq!(outcome, StepOutcome::Skipped);
        assert!(!filter.is_initialized());

        // Lidar still bootstraps
        let outcome = filter.step(&Measurement::lidar(1.0, 0.5, 1_000)).unwrap();
        assert_eq!(outcome, StepOutcome::Initialized);
    }

    #[test]
    fn test_disabled_sensor_leaves_state_untouched_when_ready() {
        let mut filter = CtrvUkf::new(UkfConfig::default().without_radar());
        filter.step(&Measurement::lidar(1.0, 0.5, 0)).unwrap();
        filter
            .step(&Measurement::lidar(1.1, 0.55, 100_000))
            .unwrap();

        let x_before = filter.state().clone();
        let p_before = filter.covariance().clone();

        let outcome = filter
            .step(&Measurement::radar(1.2, 0.4, 0.5, 200_000))
            .unwrap();
        assert_eq!(outcome, StepOutcome::Skipped);
        assert_eq!(filter.state(), &x_before);
        assert_eq!(filter.covariance(), &p_before);
        assert!(filter.nis(SensorType::Radar).is_none());
    }

    #[test]
    fn test_non_monotonic_timestamp_fails() {
        let mut filter = CtrvUkf::new(UkfConfig::default());
        filter.step(&Measurement::lidar(1.0, 0.5, 100_000)).unwrap();

        let result = filter.step(&Measurement::lidar(1.1, 0.55, 50_000));
        assert!(matches!(result, Err(FilterError::NonMonotonicTime { .. })));

        // The failed call must not have advanced the stored timestamp
        let outcome = filter
            .step(&Measurement::lidar(1.1, 0.55, 150_000))
            .unwrap();
        assert!(matches!(outcome, StepOutcome::Updated { .. }));
    }

    #[test]
    fn test_equal_timestamps_are_accepted() {
        // Non-decreasing delivery admits two sensors firing at the same
        // instant; dt = 0 is a valid (motionless) prediction.
        let mut filter = CtrvUkf::new(UkfConfig::default());
        filter.step(&Measurement::lidar(1.0, 0.5, 100_000)).unwrap();

        let outcome = filter
            .step(&Measurement::lidar(1.0, 0.5, 100_000))
            .unwrap();
        assert!(matches!(outcome, StepOutcome::Updated { .. }));
        assert!(filter.state().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_malformed_measurement_fails() {
        let mut filter = CtrvUkf::new(UkfConfig::default());
        let bad = Measurement {
            sensor_type: SensorType::Radar,
            values: DVector::from_vec(vec![5.0, 0.0]),
            timestamp: 0,
        };

        let result = filter.step(&bad);
        assert!(matches!(
            result,
            Err(FilterError::DimensionMismatch { expected: 3, .. })
        ));
    }

    #[test]
    fn test_nis_per_sensor_type() {
        let mut filter = CtrvUkf::new(UkfConfig::default());
        filter.step(&Measurement::lidar(1.0, 0.5, 0)).unwrap();
        filter
            .step(&Measurement::radar(1.2, 0.45, 0.3, 100_000))
            .unwrap();
        filter
            .step(&Measurement::lidar(1.05, 0.52, 200_000))
            .unwrap();

        let nis_l = filter.nis(SensorType::Lidar).unwrap();
        let nis_r = filter.nis(SensorType::Radar).unwrap();
        assert!(nis_l >= 0.0);
        assert!(nis_r >= 0.0);
    }

    #[test]
    fn test_reset() {
        let mut filter = CtrvUkf::new(UkfConfig::default());
        filter.step(&Measurement::lidar(1.0, 0.5, 0)).unwrap();
        filter
            .step(&Measurement::lidar(1.1, 0.55, 100_000))
            .unwrap();

        filter.reset();
        assert!(!filter.is_initialized());
        assert!(filter.nis(SensorType::Lidar).is_none());
        assert_eq!(filter.covariance(), &DMatrix::identity(N_X, N_X));
    }
}
