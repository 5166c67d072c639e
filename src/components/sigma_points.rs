//! Deterministic sigma point generation from the augmented state.
//!
//! Process noise in the CTRV model is non-additive, so the state is
//! augmented with the two zero-mean noise terms before sampling. The
//! 15 sigma points are the augmented mean plus/minus the scaled columns
//! of the lower Cholesky factor of the augmented covariance.

use nalgebra::{DMatrix, DVector};

use super::{LAMBDA, N_AUG, N_SIG, N_X};
use crate::filter::FilterError;

/// Sigma point weights, fixed for the lifetime of a filter instance.
///
/// `w₀ = λ/(λ+n_aug)`, all remaining weights `1/(2(λ+n_aug))`.
/// The weights sum to 1.
pub fn sigma_weights() -> DVector<f64> {
    let mut weights = DVector::from_element(N_SIG, 0.5 / (LAMBDA + N_AUG as f64));
    weights[0] = LAMBDA / (LAMBDA + N_AUG as f64);
    weights
}

/// Build the 7×15 augmented sigma point matrix.
///
/// Column 0 is the augmented mean itself; columns `1..=7` add and columns
/// `8..=14` subtract `√(λ+n_aug)` times the corresponding column of the
/// lower Cholesky factor of the augmented covariance.
///
/// # Arguments
/// * `state` - Current state mean (length [`N_X`])
/// * `covariance` - Current state covariance ([`N_X`]×[`N_X`])
/// * `std_a` - Longitudinal acceleration noise standard deviation
/// * `std_yawdd` - Yaw acceleration noise standard deviation
///
/// # Errors
/// Returns [`FilterError::NotPositiveDefinite`] when the augmented
/// covariance admits no Cholesky factorization. This surfaces the fault
/// instead of letting NaNs propagate into the sigma points.
pub fn augmented_sigma_points(
    state: &DVector<f64>,
    covariance: &DMatrix<f64>,
    std_a: f64,
    std_yawdd: f64,
) -> Result<DMatrix<f64>, FilterError> {
    // Augmented mean: noise terms are zero mean
    let mut x_aug = DVector::zeros(N_AUG);
    x_aug.rows_mut(0, N_X).copy_from(state);

    // Augmented covariance: state block plus the two noise variances
    let mut p_aug = DMatrix::zeros(N_AUG, N_AUG);
    p_aug.view_mut((0, 0), (N_X, N_X)).copy_from(covariance);
    p_aug[(5, 5)] = std_a * std_a;
    p_aug[(6, 6)] = std_yawdd * std_yawdd;

    let chol = p_aug
        .clone()
        .cholesky()
        .ok_or_else(|| FilterError::NotPositiveDefinite {
            context: "augmented state covariance".to_string(),
        })?;
    let l = chol.l();

    let scale = (LAMBDA + N_AUG as f64).sqrt();

    let mut xsig_aug = DMatrix::zeros(N_AUG, N_SIG);
    xsig_aug.column_mut(0).copy_from(&x_aug);
    for i in 0..N_AUG {
        let offset = scale * l.column(i);
        xsig_aug.column_mut(i + 1).copy_from(&(&x_aug + &offset));
        xsig_aug
            .column_mut(i + 1 + N_AUG)
            .copy_from(&(&x_aug - &offset));
    }

    Ok(xsig_aug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> (DVector<f64>, DMatrix<f64>) {
        (
            DVector::from_vec(vec![1.0, 2.0, 3.0, 0.5, 0.1]),
            DMatrix::identity(N_X, N_X),
        )
    }

    #[test]
    fn test_weights_sum_to_one() {
        let weights = sigma_weights();
        assert_eq!(weights.len(), N_SIG);
        assert!((weights.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weight_values() {
        let weights = sigma_weights();
        // λ = -4, λ + n_aug = 3
        assert!((weights[0] - (-4.0 / 3.0)).abs() < 1e-12);
        for i in 1..N_SIG {
            assert!((weights[i] - 1.0 / 6.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_first_column_is_mean() {
        let (x, p) = test_state();
        let xsig = augmented_sigma_points(&x, &p, 0.2, 0.2).unwrap();

        assert_eq!(xsig.nrows(), N_AUG);
        assert_eq!(xsig.ncols(), N_SIG);
        for i in 0..N_X {
            assert_eq!(xsig[(i, 0)], x[i]);
        }
        // Noise entries of the mean column are exactly zero
        assert_eq!(xsig[(5, 0)], 0.0);
        assert_eq!(xsig[(6, 0)], 0.0);
    }

    #[test]
    fn test_columns_symmetric_about_mean() {
        let (x, p) = test_state();
        let xsig = augmented_sigma_points(&x, &p, 0.2, 0.2).unwrap();

        let mean = xsig.column(0).clone_owned();
        for i in 0..N_AUG {
            let plus = xsig.column(i + 1);
            let minus = xsig.column(i + 1 + N_AUG);
            for r in 0..N_AUG {
                assert!((plus[r] + minus[r] - 2.0 * mean[r]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_sigma_points_recover_covariance() {
        // Weighted deviations of the sigma points reproduce the augmented
        // covariance (the defining property of the unscented transform).
        let (x, mut p) = test_state();
        p[(0, 1)] = 0.3;
        p[(1, 0)] = 0.3;
        let (std_a, std_yawdd) = (0.4, 0.25);
        let xsig = augmented_sigma_points(&x, &p, std_a, std_yawdd).unwrap();
        let weights = sigma_weights();

        let mean = xsig.column(0).clone_owned();
        let mut recovered = DMatrix::zeros(N_AUG, N_AUG);
        for i in 0..N_SIG {
            let d = xsig.column(i) - &mean;
            recovered += weights[i] * &d * d.transpose();
        }

        let mut p_aug = DMatrix::zeros(N_AUG, N_AUG);
        p_aug.view_mut((0, 0), (N_X, N_X)).copy_from(&p);
        p_aug[(5, 5)] = std_a * std_a;
        p_aug[(6, 6)] = std_yawdd * std_yawdd;

        for r in 0..N_AUG {
            for c in 0..N_AUG {
                assert!((recovered[(r, c)] - p_aug[(r, c)]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_non_positive_definite_covariance_fails() {
        let (x, mut p) = test_state();
        p[(0, 0)] = -1.0;

        let result = augmented_sigma_points(&x, &p, 0.2, 0.2);
        assert!(matches!(
            result,
            Err(FilterError::NotPositiveDefinite { .. })
        ));
    }
}
