//! Filter orchestration: configuration, error types and the `CtrvUkf`
//! estimator that runs the predict/update cycle per measurement.

pub mod config;
pub mod errors;
pub mod ukf;

pub use config::UkfConfig;
pub use errors::FilterError;
pub use ukf::{CtrvUkf, StepOutcome};
