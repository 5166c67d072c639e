/*!
# ctrv_ukf_rs - Unscented Kalman filtering for 2D target tracking

Rust implementation of an Unscented Kalman Filter (UKF) over a
Constant-Turn-Rate-and-Velocity (CTRV) motion model, fusing measurements
from two heterogeneous sensors:

- a Cartesian position sensor (lidar) reporting `(px, py)`
- a polar sensor (radar) reporting `(range, bearing, range-rate)`

Process noise (longitudinal and yaw acceleration) is non-additive, so the
filter works on an augmented 7-dimensional state and propagates 15
deterministic sigma points through the nonlinear motion model each cycle.
Every update also produces a Normalized Innovation Squared (NIS) value per
sensor type for offline consistency checking.

## Modules

- [`filter`] - The `CtrvUkf` estimator, its configuration and errors
- [`components`] - Sigma point generation, CTRV prediction, measurement update
- [`measurements`] - Sensor and measurement types
- [`common`] - Low-level utilities (angle math, scenario simulation)

## Example

```rust,no_run
use ctrv_ukf_rs::{CtrvUkf, Measurement, UkfConfig};

let mut filter = CtrvUkf::new(UkfConfig::default());

// First measurement bootstraps the state, later ones predict + update.
filter.step(&Measurement::lidar(1.0, 0.5, 0)).unwrap();
let outcome = filter.step(&Measurement::radar(1.2, 0.4, 0.8, 100_000)).unwrap();

println!("state = {}", filter.state());
println!("outcome = {:?}", outcome);
```
*/

/// Shared estimation components (sigma points, prediction, update)
pub mod components;

/// Low-level utilities (angle normalization, scenario simulation)
pub mod common;

/// Filter orchestration, configuration and errors
pub mod filter;

/// Sensor and measurement types
pub mod measurements;

// Re-exports for convenience
pub use components::update::{MeasurementModel, PolarModel, PositionModel, UpdateOutcome};
pub use filter::{CtrvUkf, FilterError, StepOutcome, UkfConfig};
pub use measurements::{Measurement, SensorType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
