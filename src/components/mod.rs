//! Shared estimation components.
//!
//! The filter cycle is assembled from three pieces, applied in order by
//! [`crate::filter::CtrvUkf`] for every measurement after the first:
//!
//! 1. [`sigma_points`] - deterministic sampling of the augmented state
//! 2. [`prediction`] - CTRV propagation and recombination into mean/covariance
//! 3. [`update`] - sensor-specific measurement fusion and NIS

pub mod prediction;
pub mod sigma_points;
pub mod update;

/// State dimension: `[px, py, v, yaw, yawd]`
pub const N_X: usize = 5;

/// Augmented state dimension: state plus longitudinal and yaw
/// acceleration noise terms
pub const N_AUG: usize = 7;

/// Number of sigma points (`2 × N_AUG + 1`)
pub const N_SIG: usize = 2 * N_AUG + 1;

/// Sigma point spreading parameter `λ = 3 - N_AUG`
pub const LAMBDA: f64 = 3.0 - N_AUG as f64;
