//! Shifted inverse power iteration.
//!
//! This is the power method applied to `(A - μI)^{-1}`, whose dominant eigenvalue is
//! `1 / (λ - μ)` for the eigenvalue `λ` of `A` closest to the shift `μ`. The inverse is
//! never formed: `A_s = A - μI` is factorized once with a partially pivoted LU
//! decomposition and every step solves `A_s x_new = x_old` against that factorization.
//!
//! The blow-up check looks at one step at a time. The iterate entering a step has unit
//! norm (the all-ones start is the only exception), so a well-conditioned `A_s`
//! amplifies it by at most `1 / σ_min` and the solve leaves a residual at rounding
//! level. When `A_s` is singular or numerically singular the amplification of a single
//! step, or the residual itself, leaves that range and the solve is reported as
//! ill-conditioned instead of producing a meaningless eigenvalue. Slow convergence on
//! a well-conditioned matrix never accumulates into a failure.

use super::{
    EigenvalueResult, RESIDUAL_BLOWUP_THRESHOLD, rayleigh_quotient, relative_change,
    report_termination, to_f64,
};
use crate::{
    config::SolverConfig,
    error::{EigenError, EigenErrorKind},
    matrix::{Scalar, ensure_square, ones, shifted},
};
use faer::prelude::*;

/// Blow-up measure of a single solve: the larger of the residual `‖A_s x_new - x‖`
/// and the amplification `‖x_new‖ / ‖x‖`. Non-finite inputs yield infinity.
fn blowup_measure(residual: f64, growth: f64) -> f64 {
    if residual.is_finite() && growth.is_finite() {
        residual.max(growth)
    } else {
        f64::INFINITY
    }
}

/// Runs the shifted inverse power iteration on `matrix`.
///
/// The starting vector is the all-ones vector. Each step solves `A_s x_new = x_old`,
/// checks the residual of that solve, and updates the Rayleigh quotient
/// `λ = x_newᵀ A_s x_new / x_newᵀ x_new`. The loop stops once
/// `|λ - λ_old| / |λ| ≤ tolerance` or after `max_iterations` steps.
///
/// # Returns
/// A single-element [`EigenvalueResult`] holding `λ + μ`, the eigenvalue of `A`
/// closest to the shift.
///
/// # Errors
/// * [`EigenErrorKind::InvalidMatrixShape`] if `matrix` is not square.
/// * [`EigenErrorKind::IllConditionedMatrix`] if the residual of a linear solve, or the
///   amplification of the iterate in that solve, is non-finite or exceeds
///   [`RESIDUAL_BLOWUP_THRESHOLD`].
pub fn inverse_power_iteration<T: Scalar>(
    matrix: MatRef<'_, T>,
    config: &SolverConfig,
) -> Result<EigenvalueResult<T>, EigenError> {
    let n = ensure_square(matrix)?;
    let shift = T::from_f64_impl(config.shift());
    let tolerance = T::from_f64_impl(config.tolerance());
    log::debug!("inverse power method: n = {n}, shift = {shift}");

    let a_shifted = shifted(matrix, shift);
    let lu = a_shifted.partial_piv_lu();

    let mut x = ones::<T>(n);
    let mut x_norm = x.norm_l2();
    let mut lambda_old = rayleigh_quotient(&a_shifted, &x);
    let mut lambda = lambda_old;
    let mut error = T::infinity();
    let mut iterations = 0;

    while iterations < config.max_iterations() {
        iterations += 1;
        let x_new = lu.solve(&x);

        let ax_new = &a_shifted * &x_new;
        let residual = to_f64((&ax_new - &x).norm_l2());
        let norm = x_new.norm_l2();
        let measure = blowup_measure(residual, to_f64(norm / x_norm));
        if measure > RESIDUAL_BLOWUP_THRESHOLD {
            log::error!(
                "inverse power method: solve blew up ({measure:e}) at iteration {iterations}, matrix is too badly conditioned"
            );
            return Err(EigenErrorKind::IllConditionedMatrix {
                iteration: iterations,
                residual: measure,
            }
            .into());
        }

        lambda = rayleigh_quotient(&a_shifted, &x_new);
        error = relative_change(lambda, lambda_old);
        log::trace!(
            "inverse power method: iteration {iterations}, lambda = {lambda}, error = {error}, residual = {residual:e}"
        );

        if !(norm.is_finite() && norm > T::zero()) {
            return Err(EigenErrorKind::NumericalBreakdown {
                iteration: iterations,
            }
            .into());
        }
        x = &x_new * Scale(T::one() / norm);
        x_norm = T::one();

        if error <= tolerance {
            break;
        }
        lambda_old = lambda;
    }

    let converged = error <= tolerance;
    report_termination("inverse power method", iterations, converged);

    Ok(EigenvalueResult {
        eigenvalues: vec![lambda + shift],
        iterations,
        converged,
        error: to_f64(error),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{from_diagonal, hilbert, identity, random_symmetric_with_spectrum};
    use faer::Mat;

    fn config(tolerance: f64, max_iterations: usize, shift: f64) -> SolverConfig {
        SolverConfig::new(tolerance, max_iterations)
            .unwrap()
            .with_shift(shift)
            .unwrap()
    }

    #[test]
    fn test_identity() {
        let result =
            inverse_power_iteration(identity::<f64>(3).as_ref(), &config(1e-10, 100, 0.0))
                .unwrap();
        assert!((result.eigenvalues[0] - 1.0).abs() < 1e-12);
        assert!(result.converged);
    }

    #[test]
    fn test_smallest_eigenvalue_of_diagonal() {
        let a = from_diagonal(&[1.0f64, 2.0, 3.0, 4.0, 5.0]);
        let result = inverse_power_iteration(a.as_ref(), &config(1e-12, 1000, 0.0)).unwrap();
        assert!((result.eigenvalues[0] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_shift_selects_closest_eigenvalue() {
        let a = from_diagonal(&[1.0f64, 2.0, 3.0, 4.0, 5.0]);
        for (shift, expected) in [(3.2, 3.0), (4.9, 5.0), (1.6, 2.0)] {
            let result =
                inverse_power_iteration(a.as_ref(), &config(1e-12, 1000, shift)).unwrap();
            assert!(
                (result.eigenvalues[0] - expected).abs() < 1e-8,
                "shift {shift}: got {}",
                result.eigenvalues[0]
            );
        }
    }

    #[test]
    fn test_hilbert_smallest_eigenvalue() {
        let result =
            inverse_power_iteration(hilbert::<f64>(3).as_ref(), &config(1e-12, 1000, 0.0))
                .unwrap();
        assert!((result.eigenvalues[0] - 0.002_687_340_355_773_53).abs() < 1e-9);
    }

    #[test]
    fn test_singular_shift_is_ill_conditioned() {
        // The shift equals an eigenvalue, so A - μI is exactly singular.
        let a = from_diagonal(&[1.0f64, 2.0, 3.0]);
        let err = inverse_power_iteration(a.as_ref(), &config(1e-10, 100, 2.0)).unwrap_err();
        assert!(matches!(
            err.kind(),
            EigenErrorKind::IllConditionedMatrix { .. }
        ));
    }

    #[test]
    fn test_large_hilbert_is_ill_conditioned() {
        let err = inverse_power_iteration(hilbert::<f64>(20).as_ref(), &config(1e-12, 1000, 0.0))
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            EigenErrorKind::IllConditionedMatrix { .. }
        ));
    }

    #[test]
    fn test_slow_convergence_on_well_conditioned_matrix() {
        // Condition number 50, ratio 0.1 / 0.11 between the two smallest eigenvalues.
        let a: Mat<f64> = random_symmetric_with_spectrum(&[0.1, 0.11, 5.0], 3).unwrap();
        let result = inverse_power_iteration(a.as_ref(), &config(1e-10, 10_000, 0.0)).unwrap();
        assert!(result.converged);
        assert!((result.eigenvalues[0] - 0.1).abs() < 1e-6);

        // Shift close to the midpoint of 1 and 2: tens of thousands of steps, each one
        // amplifying the iterate by about 2.
        let b = from_diagonal(&[1.0f64, 2.0, 3.0]);
        let result =
            inverse_power_iteration(b.as_ref(), &config(1e-10, 100_000, 1.5001)).unwrap();
        assert!(result.iterations > 1000);
        assert!(result.converged);
        assert!((result.eigenvalues[0] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_far_shift_does_not_underflow() {
        // The iterates shrink by ~1/11 per step; a long run must still converge.
        let a = from_diagonal(&[1.0f64, 2.0, 3.0, 4.0, 5.0]);
        let result = inverse_power_iteration(a.as_ref(), &config(1e-12, 10_000, -10.0)).unwrap();
        assert!(result.converged);
        assert!((result.eigenvalues[0] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_blowup_measure() {
        assert_eq!(blowup_measure(1e-12, 3.0), 3.0);
        assert_eq!(blowup_measure(1e17, 2.0), 1e17);
        assert!(blowup_measure(f64::NAN, 1.0).is_infinite());
        assert!(blowup_measure(1e-3, f64::INFINITY).is_infinite());
    }

    #[test]
    fn test_iteration_cap_is_not_an_error() {
        let a: Mat<f64> = hilbert(3);
        let result = inverse_power_iteration(a.as_ref(), &config(1e-12, 1, 0.0)).unwrap();
        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
    }
}
