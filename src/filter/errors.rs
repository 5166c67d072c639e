//! Error types for the filter and its components.
//!
//! Every fault is local to the call that raised it: the filter never
//! retries, and an `Err` from a cycle means that cycle produced no state
//! change.

use std::fmt;

/// Errors that can occur during a filter cycle
#[derive(Debug, Clone)]
pub enum FilterError {
    /// A covariance matrix required a Cholesky factorization but is not
    /// positive definite
    NotPositiveDefinite {
        /// Description of which matrix failed
        context: String,
    },

    /// Matrix inversion failed (singular matrix)
    SingularMatrix {
        /// Description of which matrix failed
        context: String,
    },

    /// A measurement arrived with a timestamp before the stored one
    NonMonotonicTime {
        /// The negative elapsed time in seconds
        dt: f64,
    },

    /// Dimension mismatch between expected and actual
    DimensionMismatch {
        /// What was expected
        expected: usize,
        /// What was received
        actual: usize,
        /// Context (e.g., "measurement vector")
        context: String,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::NotPositiveDefinite { context } => {
                write!(f, "Matrix is not positive definite: {}", context)
            }
            FilterError::SingularMatrix { context } => {
                write!(f, "Matrix inversion failed: {}", context)
            }
            FilterError::NonMonotonicTime { dt } => {
                write!(
                    f,
                    "Measurement timestamp moved backwards ({:.6} s elapsed)",
                    dt
                )
            }
            FilterError::DimensionMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Dimension mismatch for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for FilterError {}
