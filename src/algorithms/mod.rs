//! Iterative eigenvalue algorithms.
//!
//! ** NOTE: We recommend using the solver types in [`crate::solvers`] instead. This
//! module exposes the raw algorithms for callers that want to bypass the solver
//! abstraction.
//!
//! - [`power`]: shifted power iteration, converging to the dominant eigenvalue of `A - μI`.
//! - [`inverse_power`]: shifted inverse iteration, converging to the eigenvalue closest to `μ`.
//! - [`qr`]: Householder QR factorization and the unshifted QR algorithm.
//!
//! All three share the termination policy implemented here: the loop stops as soon as
//! the method's error metric drops to the tolerance, or when the iteration cap is hit.
//! Hitting the cap is not an error; the best current estimate is returned with
//! `converged == false` and a warning is logged.

pub mod inverse_power;
pub mod power;
pub mod qr;

use crate::matrix::Scalar;
use faer::Mat;
use serde::Serialize;

/// Residual norm or one-step amplification above which the inverse power method's
/// linear solve is considered to have blown up.
pub const RESIDUAL_BLOWUP_THRESHOLD: f64 = 1e16;

/// Outcome of an eigenvalue computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EigenvalueResult<T> {
    /// One element for the power-family methods, `n` for the QR method (diagonal order,
    /// unsorted).
    pub eigenvalues: Vec<T>,
    /// Number of iterations actually performed.
    pub iterations: usize,
    /// Whether the error metric reached the tolerance before the iteration cap.
    pub converged: bool,
    /// Last value of the method's error metric.
    pub error: f64,
}

impl<T: Scalar> EigenvalueResult<T> {
    /// Largest eigenvalue of the result.
    pub fn max(&self) -> Option<T> {
        self.eigenvalues.iter().copied().reduce(T::max)
    }

    /// Smallest eigenvalue of the result.
    pub fn min(&self) -> Option<T> {
        self.eigenvalues.iter().copied().reduce(T::min)
    }
}

/// Euclidean inner product of two column vectors.
pub(crate) fn dot<T: Scalar>(x: &Mat<T>, y: &Mat<T>) -> T {
    (0..x.nrows()).fold(T::zero(), |acc, i| acc + x[(i, 0)] * y[(i, 0)])
}

/// Rayleigh quotient `x^T A x / x^T x`.
pub(crate) fn rayleigh_quotient<T: Scalar>(a: &Mat<T>, x: &Mat<T>) -> T {
    let ax = a * x;
    dot(x, &ax) / dot(x, x)
}

/// Relative change between two successive eigenvalue estimates.
///
/// Falls back to the absolute change when the new estimate is exactly zero.
pub(crate) fn relative_change<T: Scalar>(new: T, old: T) -> T {
    let change = (new - old).abs();
    if new == T::zero() {
        change
    } else {
        change / new.abs()
    }
}

pub(crate) fn to_f64<T: Scalar>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Logs the end of an iteration loop and warns when the cap was hit.
pub(crate) fn report_termination(method: &str, iterations: usize, converged: bool) {
    if !converged {
        log::warn!(
            "{method}: maximum number of iterations ({iterations}) reached without convergence. Consider raising the iteration cap."
        );
    }
    log::info!("{method}: total number of iterations: {iterations}");
}
