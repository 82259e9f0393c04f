//! Shifted power iteration.
//!
//! The method repeatedly applies `A_s = A - μI` to a unit vector. The iterate aligns
//! with the eigenvector of `A_s` whose eigenvalue has the largest magnitude, and the
//! Rayleigh quotient of the iterate converges to that eigenvalue. The shift is added
//! back before returning, so with `μ = 0` the result is the eigenvalue of `A` with the
//! largest absolute value, and with `μ ≠ 0` it is the eigenvalue of `A` farthest from `μ`.
//!
//! Convergence is linear with rate `|λ₂ - μ| / |λ₁ - μ|` (squared for symmetric
//! matrices), so well-separated dominant eigenvalues converge in a few iterations while
//! near-ties may need many.

use super::{
    EigenvalueResult, rayleigh_quotient, relative_change, report_termination, to_f64,
};
use crate::{
    config::SolverConfig,
    error::{EigenError, EigenErrorKind},
    matrix::{Scalar, ensure_square, ones, shifted},
};
use faer::{Mat, prelude::*};

/// Scales `x` to unit Euclidean norm.
///
/// Fails with [`EigenErrorKind::NumericalBreakdown`] when `x` is zero or non-finite,
/// which happens when the shifted matrix maps the iterate onto its null space.
fn normalized<T: Scalar>(x: &Mat<T>, iteration: usize) -> Result<Mat<T>, EigenError> {
    let norm = x.norm_l2();
    if !(norm.is_finite() && norm > T::zero()) {
        return Err(EigenErrorKind::NumericalBreakdown { iteration }.into());
    }
    Ok(x * Scale(T::one() / norm))
}

/// Runs the shifted power iteration on `matrix`.
///
/// The starting vector is the normalized all-ones vector. Each step computes
/// `x ← normalize(A_s x)` and `λ ← xᵀ A_s x`, and stops once
/// `|λ - λ_old| / |λ| ≤ tolerance` or after `max_iterations` steps.
///
/// # Returns
/// A single-element [`EigenvalueResult`] holding `λ + μ`.
///
/// # Errors
/// * [`EigenErrorKind::InvalidMatrixShape`] if `matrix` is not square.
/// * [`EigenErrorKind::NumericalBreakdown`] if the iterate collapses.
pub fn power_iteration<T: Scalar>(
    matrix: MatRef<'_, T>,
    config: &SolverConfig,
) -> Result<EigenvalueResult<T>, EigenError> {
    let n = ensure_square(matrix)?;
    let shift = T::from_f64_impl(config.shift());
    let tolerance = T::from_f64_impl(config.tolerance());
    log::debug!("power method: n = {n}, shift = {shift}");

    let a_shifted = shifted(matrix, shift);
    let mut x = normalized(&ones::<T>(n), 0)?;
    let mut lambda_old = rayleigh_quotient(&a_shifted, &x);
    let mut lambda = lambda_old;
    let mut error = T::infinity();
    let mut iterations = 0;

    while iterations < config.max_iterations() {
        iterations += 1;
        x = normalized(&(&a_shifted * &x), iterations)?;
        lambda = rayleigh_quotient(&a_shifted, &x);
        error = relative_change(lambda, lambda_old);
        log::trace!("power method: iteration {iterations}, lambda = {lambda}, error = {error}");

        if error <= tolerance {
            break;
        }
        lambda_old = lambda;
    }

    let converged = error <= tolerance;
    report_termination("power method", iterations, converged);

    Ok(EigenvalueResult {
        eigenvalues: vec![lambda + shift],
        iterations,
        converged,
        error: to_f64(error),
    })
}
