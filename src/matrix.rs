//! Scalar abstraction, shared numeric helpers and matrix generators.
//!
//! All solvers work on dense [`faer::Mat`] matrices whose entries are either `f32` or
//! `f64`. The [`Scalar`] trait bundles what the algorithms need from the entry type:
//! [`faer`]'s `RealField` so matrices can be multiplied, factorized and normed, and
//! [`num_traits::Float`] for plain scalar arithmetic in the iteration loops.
//!
//! Column vectors are represented as `n x 1` matrices throughout the crate.

use crate::{
    algorithms::qr::qr_decomposition,
    error::{EigenError, EigenErrorKind},
};
use clap::ValueEnum;
use faer::{Mat, MatRef, traits::RealField};
use num_traits::Float;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Real scalar types the solvers can operate on (`f32` and `f64`).
pub trait Scalar:
    RealField + Float + Display + FromStr + Serialize + Send + Sync + 'static
{
}

impl<T> Scalar for T where
    T: RealField + Float + Display + FromStr + Serialize + Send + Sync + 'static
{
}

/// Checks that `matrix` is square and non-empty and returns its dimension.
pub fn ensure_square<T>(matrix: MatRef<'_, T>) -> Result<usize, EigenError> {
    let (rows, cols) = (matrix.nrows(), matrix.ncols());
    if rows != cols || rows == 0 {
        return Err(EigenErrorKind::InvalidMatrixShape { rows, cols }.into());
    }
    Ok(rows)
}

/// Returns the `n x n` identity matrix.
pub fn identity<T: Scalar>(n: usize) -> Mat<T> {
    Mat::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
}

/// Returns the `n x 1` all-ones vector.
pub fn ones<T: Scalar>(n: usize) -> Mat<T> {
    Mat::from_fn(n, 1, |_, _| T::one())
}

/// Returns the `n x n` Hilbert matrix, `H[i, j] = 1 / (i + j + 1)` with 0-based indices.
pub fn hilbert<T: Scalar>(n: usize) -> Mat<T> {
    Mat::from_fn(n, n, |i, j| T::one() / T::from_f64_impl((i + j + 1) as f64))
}

/// Returns a diagonal matrix with the given entries.
pub fn from_diagonal<T: Scalar>(entries: &[T]) -> Mat<T> {
    let n = entries.len();
    Mat::from_fn(n, n, |i, j| if i == j { entries[i] } else { T::zero() })
}

/// Returns `A - shift * I` as a new matrix. The input is left untouched.
pub fn shifted<T: Scalar>(matrix: MatRef<'_, T>, shift: T) -> Mat<T> {
    Mat::from_fn(matrix.nrows(), matrix.ncols(), |i, j| {
        if i == j {
            matrix[(i, j)] - shift
        } else {
            matrix[(i, j)]
        }
    })
}

/// Returns the main diagonal of a square matrix.
pub fn diagonal<T: Scalar>(matrix: MatRef<'_, T>) -> Vec<T> {
    (0..matrix.nrows().min(matrix.ncols()))
        .map(|i| matrix[(i, i)])
        .collect()
}

/// Sum of the absolute values of the strictly-below-diagonal entries.
pub fn lower_off_diagonal_sum<T: Scalar>(matrix: MatRef<'_, T>) -> T {
    let mut sum = T::zero();
    for j in 0..matrix.ncols() {
        for i in (j + 1)..matrix.nrows() {
            sum = sum + matrix[(i, j)].abs();
        }
    }
    sum
}

/// Named entry-wise matrix generators.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixFunction {
    /// `1` on the diagonal, `0` elsewhere.
    Identity,
    /// `1 / (i + j + 1)`.
    Hilbert,
}

impl MatrixFunction {
    /// Evaluates the generator at a 0-based `(row, col)` position.
    pub fn entry<T: Scalar>(self, row: usize, col: usize) -> T {
        match self {
            MatrixFunction::Identity => {
                if row == col {
                    T::one()
                } else {
                    T::zero()
                }
            }
            MatrixFunction::Hilbert => T::one() / T::from_f64_impl((row + col + 1) as f64),
        }
    }

    /// Builds a `rows x cols` matrix from the generator.
    ///
    /// Non-square shapes are allowed here; they are rejected once the matrix is handed
    /// to a solver.
    pub fn generate<T: Scalar>(self, rows: usize, cols: usize) -> Mat<T> {
        Mat::from_fn(rows, cols, |i, j| self.entry(i, j))
    }
}

/// Builds a dense symmetric matrix `Q * diag(spectrum) * Q^T` with a random orthogonal
/// `Q`, so its eigenvalues are known exactly.
///
/// `Q` is the orthogonal factor of a matrix with entries drawn uniformly from `[-1, 1)`
/// by a generator seeded with `seed`, which makes the result reproducible.
pub fn random_symmetric_with_spectrum<T: Scalar>(
    spectrum: &[f64],
    seed: u64,
) -> Result<Mat<T>, EigenError> {
    let n = spectrum.len();
    let mut rng = StdRng::seed_from_u64(seed);
    let gaussian_like: Mat<T> =
        Mat::from_fn(n, n, |_, _| T::from_f64_impl(rng.random_range(-1.0..1.0)));
    let (q, _) = qr_decomposition(gaussian_like.as_ref())?;

    let d = Mat::from_fn(n, n, |i, j| {
        if i == j {
            T::from_f64_impl(spectrum[i])
        } else {
            T::zero()
        }
    });
    let a = &q * &d * q.transpose();

    // Remove the rounding asymmetry of the two products.
    Ok(Mat::from_fn(n, n, |i, j| {
        (a[(i, j)] + a[(j, i)]) / (T::one() + T::one())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    #[test]
    fn test_ensure_square() {
        let square: Mat<f64> = mat![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(ensure_square(square.as_ref()).unwrap(), 2);

        let wide: Mat<f64> = Mat::zeros(2, 3);
        let err = ensure_square(wide.as_ref()).unwrap_err();
        assert_eq!(
            err.kind(),
            &EigenErrorKind::InvalidMatrixShape { rows: 2, cols: 3 }
        );

        let empty: Mat<f64> = Mat::zeros(0, 0);
        assert!(ensure_square(empty.as_ref()).is_err());
    }

    #[test]
    fn test_shifted_leaves_input_untouched() {
        let a: Mat<f64> = mat![[2.0, 1.0], [1.0, 3.0]];
        let s = shifted(a.as_ref(), 0.5);

        assert_eq!(s, mat![[1.5, 1.0], [1.0, 2.5]]);
        assert_eq!(a, mat![[2.0, 1.0], [1.0, 3.0]]);
    }

    #[test]
    fn test_hilbert_generator() {
        let h: Mat<f64> = MatrixFunction::Hilbert.generate(3, 3);
        assert_eq!(h[(0, 0)], 1.0);
        assert_eq!(h[(0, 1)], 0.5);
        assert_eq!(h[(2, 2)], 1.0 / 5.0);
        assert_eq!(h, hilbert::<f64>(3));
    }

    #[test]
    fn test_identity_generator() {
        let i: Mat<f32> = MatrixFunction::Identity.generate(3, 3);
        assert_eq!(i, identity::<f32>(3));
        assert_eq!(diagonal(i.as_ref()), vec![1.0f32; 3]);
    }

    #[test]
    fn test_lower_off_diagonal_sum() {
        let a: Mat<f64> = mat![[1.0, 9.0, 9.0], [-2.0, 1.0, 9.0], [3.0, -4.0, 1.0]];
        assert_eq!(lower_off_diagonal_sum(a.as_ref()), 9.0);
    }

    #[test]
    fn test_random_symmetric_is_symmetric_with_requested_trace() {
        let spectrum = [1.0, 2.0, 3.0, 4.0];
        let a: Mat<f64> = random_symmetric_with_spectrum(&spectrum, 7).unwrap();

        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(a[(i, j)], a[(j, i)]);
            }
        }
        let trace: f64 = diagonal(a.as_ref()).iter().sum();
        assert!((trace - 10.0).abs() < 1e-12);
    }
}
