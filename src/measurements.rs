//! Sensor and measurement types.
//!
//! A [`Measurement`] is one record of the input stream: which sensor
//! produced it, the raw values in that sensor's observation space, and a
//! caller-defined monotonic integer timestamp. Parsing measurement logs
//! and formatting results are the caller's concern; the filter only sees
//! these records.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// The two supported sensor types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorType {
    /// Cartesian position sensor: `(px, py)` in meters
    Lidar,
    /// Polar sensor: `(range, bearing, range-rate)` in meters, radians,
    /// meters/second
    Radar,
}

impl SensorType {
    /// Observation space dimension for this sensor type.
    #[inline]
    pub fn z_dim(&self) -> usize {
        match self {
            SensorType::Lidar => 2,
            SensorType::Radar => 3,
        }
    }
}

/// One raw measurement record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Sensor that produced the values
    pub sensor_type: SensorType,
    /// Raw values in the sensor's observation space (length matches
    /// [`SensorType::z_dim`])
    pub values: DVector<f64>,
    /// Monotonic integer timestamp in caller-defined ticks
    pub timestamp: i64,
}

impl Measurement {
    /// Create a lidar measurement from a Cartesian position.
    pub fn lidar(px: f64, py: f64, timestamp: i64) -> Self {
        Self {
            sensor_type: SensorType::Lidar,
            values: DVector::from_vec(vec![px, py]),
            timestamp,
        }
    }

    /// Create a radar measurement from range, bearing and range-rate.
    pub fn radar(rho: f64, phi: f64, rho_dot: f64, timestamp: i64) -> Self {
        Self {
            sensor_type: SensorType::Radar,
            values: DVector::from_vec(vec![rho, phi, rho_dot]),
            timestamp,
        }
    }
}
