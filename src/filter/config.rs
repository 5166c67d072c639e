//! Filter configuration.

use serde::Serialize;
use std::f64::consts::PI;

/// Configuration for a [`crate::filter::CtrvUkf`] instance.
///
/// Noise standard deviations are fixed for the lifetime of the filter;
/// the defaults are tuned for a bicycle-scale target observed by a lidar
/// and an automotive radar.
#[derive(Debug, Clone, Serialize)]
pub struct UkfConfig {
    /// Longitudinal acceleration process noise standard deviation (m/s²)
    pub std_a: f64,
    /// Yaw acceleration process noise standard deviation (rad/s²)
    pub std_yawdd: f64,

    /// Lidar x position noise standard deviation (m)
    pub std_laspx: f64,
    /// Lidar y position noise standard deviation (m)
    pub std_laspy: f64,

    /// Radar range noise standard deviation (m)
    pub std_radr: f64,
    /// Radar bearing noise standard deviation (rad)
    pub std_radphi: f64,
    /// Radar range-rate noise standard deviation (m/s)
    pub std_radrd: f64,

    /// Process lidar measurements (disabled lidar is skipped, including
    /// at bootstrap)
    pub use_lidar: bool,
    /// Process radar measurements (disabled radar is skipped, including
    /// at bootstrap)
    pub use_radar: bool,

    /// Measurement timestamp ticks per second. Timestamps are
    /// caller-defined monotonic integers; the default treats them as
    /// microseconds.
    pub ticks_per_second: f64,
}

impl Default for UkfConfig {
    fn default() -> Self {
        Self {
            std_a: 0.25,
            std_yawdd: 0.2 * PI,
            std_laspx: 0.15,
            std_laspy: 0.15,
            std_radr: 0.3,
            std_radphi: 0.03,
            std_radrd: 0.3,
            use_lidar: true,
            use_radar: true,
            ticks_per_second: 1e6,
        }
    }
}

impl UkfConfig {
    /// Disable lidar processing.
    pub fn without_lidar(mut self) -> Self {
        self.use_lidar = false;
        self
    }

    /// Disable radar processing.
    pub fn without_radar(mut self) -> Self {
        self.use_radar = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UkfConfig::default();
        assert!((config.std_a - 0.25).abs() < 1e-12);
        assert!((config.std_yawdd - 0.2 * PI).abs() < 1e-12);
        assert!(config.use_lidar);
        assert!(config.use_radar);
        assert!((config.ticks_per_second - 1e6).abs() < 1e-6);
    }

    #[test]
    fn test_toggles() {
        let config = UkfConfig::default().without_lidar();
        assert!(!config.use_lidar);
        assert!(config.use_radar);

        let config = UkfConfig::default().without_radar();
        assert!(config.use_lidar);
        assert!(!config.use_radar);
    }
}
