//! Ground truth and measurement generation.
//!
//! Simulates a single CTRV target and the interleaved lidar/radar
//! measurement stream a real log would contain. Used by integration
//! tests and benchmarks; production callers feed the filter from their
//! own measurement source.

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::components::prediction::ctrv_transition;
use crate::measurements::Measurement;

/// One ground-truth sample.
#[derive(Debug, Clone)]
pub struct TruthPoint {
    /// Timestamp in ticks, matching the measurement timestamps
    pub timestamp: i64,
    /// True state `[px, py, v, yaw, yawd]`
    pub state: DVector<f64>,
}

/// A simulated scenario: the true trajectory and the noisy measurements
/// observed along it.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// True states, one per measurement
    pub truth: Vec<TruthPoint>,
    /// Noisy measurements in timestamp order, alternating lidar/radar
    pub measurements: Vec<Measurement>,
}

/// Parameters for scenario generation.
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    /// Number of measurements to generate
    pub steps: usize,
    /// Time between consecutive measurements in seconds
    pub dt: f64,
    /// Timestamp ticks per second
    pub ticks_per_second: f64,
    /// Initial true state `[px, py, v, yaw, yawd]`
    pub initial_state: [f64; 5],
    /// True longitudinal acceleration noise standard deviation
    pub std_a: f64,
    /// True yaw acceleration noise standard deviation
    pub std_yawdd: f64,
    /// Lidar position noise standard deviation (both axes)
    pub std_laser: f64,
    /// Radar noise standard deviations (range, bearing, range-rate)
    pub std_radar: [f64; 3],
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            steps: 100,
            dt: 0.05,
            ticks_per_second: 1e6,
            initial_state: [5.0, 2.0, 3.0, 0.3, 0.1],
            std_a: 0.2,
            std_yawdd: 0.2,
            std_laser: 0.15,
            std_radar: [0.3, 0.03, 0.3],
        }
    }
}

/// Generate a seeded scenario.
///
/// The true target follows the CTRV dynamics with per-step sampled
/// acceleration noise. Measurements alternate between lidar and radar so
/// both update paths get exercised on the same trajectory.
pub fn generate_scenario(seed: u64, params: &ScenarioParams) -> Scenario {
    let mut rng = StdRng::seed_from_u64(seed);

    let accel = Normal::new(0.0, params.std_a).expect("std_a must be finite and non-negative");
    let yaw_accel =
        Normal::new(0.0, params.std_yawdd).expect("std_yawdd must be finite and non-negative");
    let laser = Normal::new(0.0, params.std_laser).expect("std_laser must be valid");
    let radar_r = Normal::new(0.0, params.std_radar[0]).expect("std_radar[0] must be valid");
    let radar_phi = Normal::new(0.0, params.std_radar[1]).expect("std_radar[1] must be valid");
    let radar_rd = Normal::new(0.0, params.std_radar[2]).expect("std_radar[2] must be valid");

    let mut state = params.initial_state;
    let mut truth = Vec::with_capacity(params.steps);
    let mut measurements = Vec::with_capacity(params.steps);

    for step in 0..params.steps {
        let timestamp = (step as f64 * params.dt * params.ticks_per_second) as i64;

        let [px, py, v, yaw, _yawd] = state;

        let measurement = if step % 2 == 0 {
            Measurement::lidar(
                px + laser.sample(&mut rng),
                py + laser.sample(&mut rng),
                timestamp,
            )
        } else {
            let range = (px * px + py * py).sqrt();
            let bearing = py.atan2(px);
            let range_rate = if range > f64::EPSILON {
                (px * v * yaw.cos() + py * v * yaw.sin()) / range
            } else {
                0.0
            };
            Measurement::radar(
                range + radar_r.sample(&mut rng),
                bearing + radar_phi.sample(&mut rng),
                range_rate + radar_rd.sample(&mut rng),
                timestamp,
            )
        };

        truth.push(TruthPoint {
            timestamp,
            state: DVector::from_row_slice(&state),
        });
        measurements.push(measurement);

        // Advance the truth with freshly sampled accelerations
        let nu_a = accel.sample(&mut rng);
        let nu_yawdd = yaw_accel.sample(&mut rng);
        state = ctrv_transition(
            state[0], state[1], state[2], state[3], state[4], nu_a, nu_yawdd, params.dt,
        );
    }

    Scenario {
        truth,
        measurements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurements::SensorType;

    #[test]
    fn test_scenario_is_deterministic_per_seed() {
        let params = ScenarioParams::default();
        let a = generate_scenario(7, &params);
        let b = generate_scenario(7, &params);

        assert_eq!(a.measurements.len(), b.measurements.len());
        for (ma, mb) in a.measurements.iter().zip(&b.measurements) {
            assert_eq!(ma, mb);
        }
    }

    #[test]
    fn test_scenario_alternates_sensors() {
        let scenario = generate_scenario(1, &ScenarioParams::default());
        for (i, m) in scenario.measurements.iter().enumerate() {
            let expected = if i % 2 == 0 {
                SensorType::Lidar
            } else {
                SensorType::Radar
            };
            assert_eq!(m.sensor_type, expected);
        }
    }

    #[test]
    fn test_timestamps_strictly_increase() {
        let scenario = generate_scenario(3, &ScenarioParams::default());
        for pair in scenario.measurements.windows(2) {
            assert!(pair[1].timestamp > pair[0].timestamp);
        }
    }

    #[test]
    fn test_truth_matches_measurement_count() {
        let scenario = generate_scenario(5, &ScenarioParams::default());
        assert_eq!(scenario.truth.len(), scenario.measurements.len());
        assert!(scenario
            .truth
            .iter()
            .all(|t| t.state.iter().all(|v| v.is_finite())));
    }
}
