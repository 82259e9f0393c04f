//! Householder QR factorization and the unshifted QR algorithm.
//!
//! The factorization reduces the matrix column by column with reflectors
//! `H_k = I - 2 v_k v_kᵀ`, so that `H_{n-1} ⋯ H_0 A = R` and `Q = H_0 ⋯ H_{n-1}`.
//! The reflectors are applied in place and never formed explicitly.
//!
//! The QR algorithm then iterates `A_{k+1} = R_k Q_k`, a similarity transform of
//! `A_k`. For matrices with real eigenvalues of distinct magnitude the iterates tend
//! to upper-triangular (Schur) form, and the diagonal converges to the spectrum.
//! Complex-conjugate pairs leave a 2x2 block on the diagonal that never decays; such
//! runs end at the iteration cap with `converged == false`.

use super::{EigenvalueResult, report_termination, to_f64};
use crate::{
    config::SolverConfig,
    error::{EigenError, EigenErrorKind},
    matrix::{Scalar, diagonal, ensure_square, identity, lower_off_diagonal_sum},
};
use faer::{ColRef, Mat, MatMut, MatRef};

/// Computes the Householder QR factorization `A = Q R` of a square matrix.
///
/// For each column `k`, the sub-column `x = R[k.., k]` is reflected onto a multiple of
/// `e_1` using `v = x + sign(x_0) ‖x‖ e_1` (with `sign(0) = +1` so the addition never
/// cancels). Columns whose sub-column is already zero are skipped. Entries below the
/// diagonal are set to exactly zero after each step.
///
/// The input is not modified and the result only depends on the input values.
///
/// # Returns
/// `(Q, R)` with `Q` orthogonal and `R` upper-triangular.
///
/// # Errors
/// [`EigenErrorKind::InvalidMatrixShape`] if `matrix` is not square.
pub fn qr_decomposition<T: Scalar>(
    matrix: MatRef<'_, T>,
) -> Result<(Mat<T>, Mat<T>), EigenError> {
    let n = ensure_square(matrix)?;
    let two = T::one() + T::one();

    let mut r = matrix.to_owned();
    let mut q = identity::<T>(n);

    for k in 0..n {
        let x_norm = r.as_ref().submatrix(k, k, n - k, 1).norm_l2();
        if x_norm == T::zero() {
            continue;
        }

        let alpha = if r[(k, k)] >= T::zero() {
            x_norm
        } else {
            -x_norm
        };
        let mut v: Vec<T> = (k..n).map(|i| r[(i, k)]).collect();
        v[0] = v[0] + alpha;
        let v_norm = ColRef::from_slice(&v).norm_l2();
        for vi in v.iter_mut() {
            *vi = *vi / v_norm;
        }

        // R[k.., k..] <- (I - 2 v vᵀ) R[k.., k..]
        for j in k..n {
            let proj = two * v
                .iter()
                .enumerate()
                .fold(T::zero(), |acc, (l, &vl)| acc + vl * r[(k + l, j)]);
            for (l, &vl) in v.iter().enumerate() {
                let value = r[(k + l, j)] - proj * vl;
                r.as_mut()[(k + l, j)] = value;
            }
        }

        // Q[.., k..] <- Q[.., k..] (I - 2 v vᵀ)
        for i in 0..n {
            let proj = two * v
                .iter()
                .enumerate()
                .fold(T::zero(), |acc, (l, &vl)| acc + q[(i, k + l)] * vl);
            for (l, &vl) in v.iter().enumerate() {
                let value = q[(i, k + l)] - proj * vl;
                q.as_mut()[(i, k + l)] = value;
            }
        }

        for i in (k + 1)..n {
            r.as_mut()[(i, k)] = T::zero();
        }
    }

    Ok((q, r))
}

/// Computes the Householder QR factorization of `matrix` into caller-supplied buffers.
///
/// Both `q` and `r` must be `n x n`, where `n` is the dimension of `matrix`. Their
/// previous contents are overwritten.
///
/// # Errors
/// * [`EigenErrorKind::InvalidMatrixShape`] if `matrix` is not square.
/// * [`EigenErrorKind::DimensionMismatch`] if either buffer has the wrong shape. The
///   buffers are left untouched in that case.
pub fn qr_decomposition_into<T: Scalar>(
    matrix: MatRef<'_, T>,
    mut q: MatMut<'_, T>,
    mut r: MatMut<'_, T>,
) -> Result<(), EigenError> {
    let n = ensure_square(matrix)?;
    for (rows, cols) in [(q.nrows(), q.ncols()), (r.nrows(), r.ncols())] {
        if rows != n || cols != n {
            return Err(EigenErrorKind::DimensionMismatch {
                expected: n,
                rows,
                cols,
            }
            .into());
        }
    }

    let (q_new, r_new) = qr_decomposition(matrix)?;
    q.copy_from(q_new.as_ref());
    r.copy_from(r_new.as_ref());
    Ok(())
}

/// Runs the unshifted QR algorithm on `matrix`.
///
/// At least one step `A ← R Q` is always performed. After each step the error is the
/// sum of the absolute values of the strictly-lower-triangular entries of `A`, and the
/// loop stops once it is `≤ tolerance` or after `max_iterations` steps. The shift in
/// `config` is not used by this method.
///
/// # Returns
/// An [`EigenvalueResult`] holding the `n` diagonal entries of the final iterate, in
/// diagonal order. They are not sorted.
///
/// # Errors
/// * [`EigenErrorKind::InvalidMatrixShape`] if `matrix` is not square.
/// * [`EigenErrorKind::NumericalBreakdown`] if the iterate stops being finite.
pub fn qr_iteration<T: Scalar>(
    matrix: MatRef<'_, T>,
    config: &SolverConfig,
) -> Result<EigenvalueResult<T>, EigenError> {
    let n = ensure_square(matrix)?;
    let tolerance = T::from_f64_impl(config.tolerance());
    log::debug!("QR method: n = {n}");

    let mut a_iter = matrix.to_owned();
    let mut error = T::infinity();
    let mut iterations = 0;

    while iterations < config.max_iterations() {
        iterations += 1;
        let (q, r) = qr_decomposition(a_iter.as_ref())?;
        a_iter = &r * &q;

        error = lower_off_diagonal_sum(a_iter.as_ref());
        log::trace!("QR method: iteration {iterations}, error = {error}");
        if !error.is_finite() {
            return Err(EigenErrorKind::NumericalBreakdown {
                iteration: iterations,
            }
            .into());
        }
        if error <= tolerance {
            break;
        }
    }

    let converged = error <= tolerance;
    report_termination("QR method", iterations, converged);

    Ok(EigenvalueResult {
        eigenvalues: diagonal(a_iter.as_ref()),
        iterations,
        converged,
        error: to_f64(error),
    })
}
