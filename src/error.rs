//! This module defines the custom error types for the library.
//!
//! Every condition that makes an eigenvalue computation fail is collected in a single
//! enum, [`EigenErrorKind`], wrapped by the public [`EigenError`] type. Configuration
//! problems (a non-square matrix, a missing matrix, invalid solver parameters) and
//! numerical-stability problems (a blown-up linear solve, a collapsed iterate) are
//! distinct kinds so callers can match on them through [`EigenError::kind`].
//!
//! Running out of iterations is deliberately *not* represented here: it is reported
//! through [`crate::algorithms::EigenvalueResult::converged`] and a log warning.
use thiserror::Error;

/// Represents all possible errors that can occur while computing eigenvalues.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct EigenError(#[from] EigenErrorKind);

impl EigenError {
    /// Returns the kind of the error, for callers that need to branch on it.
    pub fn kind(&self) -> &EigenErrorKind {
        &self.0
    }
}

/// The distinct kinds of errors raised by the solvers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EigenErrorKind {
    /// The matrix handed to a solver is empty or not square.
    #[error("Invalid matrix shape: expected a non-empty square matrix but got {rows}x{cols}.")]
    InvalidMatrixShape { rows: usize, cols: usize },

    /// A solve was requested before any matrix was attached.
    #[error("No matrix attached: call `attach_matrix` before computing eigenvalues.")]
    UninitializedMatrix,

    /// An output buffer does not have the dimensions the operation requires.
    #[error("Dimension mismatch: expected a {expected}x{expected} buffer but got {rows}x{cols}.")]
    DimensionMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    /// A solver parameter is out of its valid range.
    #[error("Invalid solver parameter: {0}")]
    InvalidParameter(String),

    /// A linear solve of the inverse power method left a residual, or amplified the
    /// iterate, beyond the blow-up threshold (or produced a non-finite value).
    #[error(
        "Ill-conditioned matrix at iteration {iteration}: linear solve residual or amplification {residual:e} exceeds the blow-up threshold. The inverse power method is unsuitable for this matrix and shift."
    )]
    IllConditionedMatrix { iteration: usize, residual: f64 },

    /// The iterate collapsed to the zero vector or became non-finite.
    #[error(
        "Numerical breakdown at iteration {iteration}: the iterate collapsed to a zero or non-finite vector."
    )]
    NumericalBreakdown { iteration: usize },
}

impl PartialEq for EigenError {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_shape_error_message() {
        let error = EigenError(EigenErrorKind::InvalidMatrixShape { rows: 3, cols: 4 });
        assert_eq!(
            error.to_string(),
            "Invalid matrix shape: expected a non-empty square matrix but got 3x4."
        );
    }

    #[test]
    fn test_uninitialized_matrix_error_message() {
        let error = EigenError::from(EigenErrorKind::UninitializedMatrix);
        assert_eq!(
            error.to_string(),
            "No matrix attached: call `attach_matrix` before computing eigenvalues."
        );
    }

    #[test]
    fn test_invalid_parameter_error_message() {
        let error = EigenError::from(EigenErrorKind::InvalidParameter(
            "tolerance must be positive and finite, got 0".to_string(),
        ));
        assert_eq!(
            error.to_string(),
            "Invalid solver parameter: tolerance must be positive and finite, got 0"
        );
    }

    #[test]
    fn test_ill_conditioned_error_message() {
        let error = EigenError::from(EigenErrorKind::IllConditionedMatrix {
            iteration: 2,
            residual: 1e20,
        });
        assert_eq!(
            error.to_string(),
            "Ill-conditioned matrix at iteration 2: linear solve residual or amplification 1e20 exceeds the blow-up threshold. The inverse power method is unsuitable for this matrix and shift."
        );
    }

    #[test]
    fn test_kind_accessor_and_equality() {
        let a = EigenError::from(EigenErrorKind::NumericalBreakdown { iteration: 7 });
        let b = EigenError::from(EigenErrorKind::NumericalBreakdown { iteration: 7 });
        assert_eq!(a, b);
        assert!(matches!(
            a.kind(),
            EigenErrorKind::NumericalBreakdown { iteration: 7 }
        ));
    }
}
