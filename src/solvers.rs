//! This module provides the high-level API for computing eigenvalues of a dense,
//! square, real matrix.
//!
//! Every method implements [`EigenSolver`]: a solver owns its [`SolverConfig`] and
//! borrows the matrix only for the duration of a call, so one solver value can be
//! reused across matrices and shared between threads. [`SolverKind`] selects a method
//! at runtime and [`AttachedSolver`] keeps a matrix bound to a solver between calls.

use crate::{
    algorithms::{
        EigenvalueResult, inverse_power::inverse_power_iteration, power::power_iteration,
        qr::{qr_decomposition, qr_decomposition_into, qr_iteration},
    },
    config::SolverConfig,
    error::{EigenError, EigenErrorKind},
    matrix::Scalar,
};
use clap::ValueEnum;
use faer::{Mat, MatMut, MatRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Common interface of the eigenvalue solvers.
pub trait EigenSolver<T: Scalar>: Send + Sync {
    /// Numeric controls used by [`EigenSolver::find_eigenvalues`].
    fn config(&self) -> &SolverConfig;

    /// Computes the eigenvalue(s) of `matrix` this method targets.
    ///
    /// # Errors
    /// Fails with [`EigenErrorKind::InvalidMatrixShape`] if `matrix` is not square and
    /// non-empty, plus the method-specific numerical failures.
    fn find_eigenvalues(&self, matrix: MatRef<'_, T>) -> Result<EigenvalueResult<T>, EigenError>;
}

/// Shifted power method: the eigenvalue of `A` farthest from the shift (the dominant
/// eigenvalue when the shift is zero).
#[derive(Debug, Clone, Default)]
pub struct PowerMethodSolver {
    config: SolverConfig,
}

impl PowerMethodSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl<T: Scalar> EigenSolver<T> for PowerMethodSolver {
    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn find_eigenvalues(&self, matrix: MatRef<'_, T>) -> Result<EigenvalueResult<T>, EigenError> {
        power_iteration(matrix, &self.config)
    }
}

/// Shifted inverse power method: the eigenvalue of `A` closest to the shift.
#[derive(Debug, Clone, Default)]
pub struct InversePowerMethodSolver {
    config: SolverConfig,
}

impl InversePowerMethodSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl<T: Scalar> EigenSolver<T> for InversePowerMethodSolver {
    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn find_eigenvalues(&self, matrix: MatRef<'_, T>) -> Result<EigenvalueResult<T>, EigenError> {
        inverse_power_iteration(matrix, &self.config)
    }
}

/// Unshifted QR algorithm: the whole spectrum, in diagonal order.
#[derive(Debug, Clone, Default)]
pub struct QrMethodSolver {
    config: SolverConfig,
}

impl QrMethodSolver {
    /// Creates the solver. The shift of `config` is ignored by this method.
    pub fn new(config: SolverConfig) -> Self {
        if config.shift() != 0.0 {
            log::info!(
                "QR method does not use a shift, ignoring shift = {}",
                config.shift()
            );
        }
        Self { config }
    }

    /// Householder QR factorization of `matrix`, see [`qr_decomposition`].
    pub fn qr_decomposition<T: Scalar>(
        &self,
        matrix: MatRef<'_, T>,
    ) -> Result<(Mat<T>, Mat<T>), EigenError> {
        qr_decomposition(matrix)
    }

    /// Householder QR factorization into caller-supplied buffers, see
    /// [`qr_decomposition_into`].
    pub fn qr_decomposition_into<T: Scalar>(
        &self,
        matrix: MatRef<'_, T>,
        q: MatMut<'_, T>,
        r: MatMut<'_, T>,
    ) -> Result<(), EigenError> {
        qr_decomposition_into(matrix, q, r)
    }
}

impl<T: Scalar> EigenSolver<T> for QrMethodSolver {
    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn find_eigenvalues(&self, matrix: MatRef<'_, T>) -> Result<EigenvalueResult<T>, EigenError> {
        qr_iteration(matrix, &self.config)
    }
}

/// The closed set of available methods.
///
/// The canonical names are `power`, `inverse-power` and `qr`; the method names used by
/// older configuration files are accepted as aliases.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverKind {
    /// Shifted power method.
    #[value(name = "power", alias = "power_method", alias = "power_method_with_shift")]
    #[serde(rename = "power", alias = "power_method", alias = "power_method_with_shift")]
    PowerMethod,
    /// Shifted inverse power method.
    #[value(
        name = "inverse-power",
        alias = "inverse_power_method",
        alias = "inverse_power_method_with_shift",
        alias = "inverse_method_method"
    )]
    #[serde(
        alias = "inverse_power_method",
        alias = "inverse_power_method_with_shift",
        alias = "inverse_method_method"
    )]
    InversePower,
    /// Unshifted QR algorithm.
    #[value(name = "qr", alias = "QR_method")]
    #[serde(alias = "QR_method")]
    Qr,
}

impl SolverKind {
    /// Builds the solver for this method.
    pub fn build<T: Scalar>(self, config: SolverConfig) -> Box<dyn EigenSolver<T>> {
        match self {
            SolverKind::PowerMethod => Box::new(PowerMethodSolver::new(config)),
            SolverKind::InversePower => Box::new(InversePowerMethodSolver::new(config)),
            SolverKind::Qr => Box::new(QrMethodSolver::new(config)),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverKind::PowerMethod => "power method",
            SolverKind::InversePower => "inverse power method",
            SolverKind::Qr => "QR method",
        };
        f.write_str(name)
    }
}

/// Computes eigenvalues of `matrix` with the method selected by `kind`.
///
/// # Example
/// ```
/// use eigen_project::{SolverConfig, SolverKind, find_eigenvalues};
/// use faer::mat;
///
/// let a = mat![[2.0f64, 0.0], [0.0, 5.0]];
/// let result = find_eigenvalues(SolverKind::PowerMethod, a.as_ref(), SolverConfig::default())?;
/// assert!((result.eigenvalues[0] - 5.0).abs() < 1e-4);
/// # Ok::<(), eigen_project::EigenError>(())
/// ```
pub fn find_eigenvalues<T: Scalar>(
    kind: SolverKind,
    matrix: MatRef<'_, T>,
    config: SolverConfig,
) -> Result<EigenvalueResult<T>, EigenError> {
    log::debug!(
        "{kind}: tolerance = {}, max_iterations = {}, shift = {}",
        config.tolerance(),
        config.max_iterations(),
        config.shift()
    );
    kind.build::<T>(config).find_eigenvalues(matrix)
}

/// A solver with a matrix bound to it.
///
/// The matrix is borrowed, never copied or modified, and can be replaced with
/// [`AttachedSolver::attach_matrix`]. Computing before a matrix is attached fails with
/// [`EigenErrorKind::UninitializedMatrix`].
pub struct AttachedSolver<'a, T: Scalar> {
    solver: Box<dyn EigenSolver<T>>,
    matrix: Option<MatRef<'a, T>>,
}

impl<'a, T: Scalar> AttachedSolver<'a, T> {
    /// Creates a solver of the given kind with no matrix attached.
    pub fn new(kind: SolverKind, config: SolverConfig) -> Self {
        Self::from_solver(kind.build(config))
    }

    /// Wraps an already built solver.
    pub fn from_solver(solver: Box<dyn EigenSolver<T>>) -> Self {
        Self {
            solver,
            matrix: None,
        }
    }

    /// Binds `matrix` to the solver, replacing any previously attached matrix.
    ///
    /// # Errors
    /// [`EigenErrorKind::InvalidMatrixShape`] if `matrix` is not square and non-empty.
    /// The previous matrix stays attached in that case.
    pub fn attach_matrix(&mut self, matrix: MatRef<'a, T>) -> Result<(), EigenError> {
        crate::matrix::ensure_square(matrix)?;
        self.matrix = Some(matrix);
        Ok(())
    }

    /// The attached matrix.
    ///
    /// # Errors
    /// [`EigenErrorKind::UninitializedMatrix`] if no matrix has been attached.
    pub fn matrix(&self) -> Result<MatRef<'a, T>, EigenError> {
        self.matrix
            .ok_or_else(|| EigenErrorKind::UninitializedMatrix.into())
    }

    pub fn tolerance(&self) -> f64 {
        self.solver.config().tolerance()
    }

    pub fn max_iterations(&self) -> usize {
        self.solver.config().max_iterations()
    }

    pub fn shift(&self) -> f64 {
        self.solver.config().shift()
    }

    /// Runs the solver on the attached matrix.
    pub fn find_eigenvalues(&self) -> Result<EigenvalueResult<T>, EigenError> {
        self.solver.find_eigenvalues(self.matrix()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{from_diagonal, hilbert};
    use faer::mat;

    #[test]
    fn test_factory_builds_each_method() {
        let a = from_diagonal(&[1.0f64, 2.0, 3.0, 4.0]);
        let config = SolverConfig::new(1e-12, 10_000).unwrap();

        let power = SolverKind::PowerMethod.build::<f64>(config);
        assert!((power.find_eigenvalues(a.as_ref()).unwrap().eigenvalues[0] - 4.0).abs() < 1e-6);

        let inverse = SolverKind::InversePower.build::<f64>(config);
        assert!((inverse.find_eigenvalues(a.as_ref()).unwrap().eigenvalues[0] - 1.0).abs() < 1e-8);

        let qr = SolverKind::Qr.build::<f64>(config);
        assert_eq!(qr.find_eigenvalues(a.as_ref()).unwrap().eigenvalues.len(), 4);
    }

    #[test]
    fn test_solver_is_reusable_across_matrices() {
        let solver = PowerMethodSolver::new(SolverConfig::new(1e-12, 10_000).unwrap());
        let first = EigenSolver::<f64>::find_eigenvalues(&solver, from_diagonal(&[1.0f64, 3.0]).as_ref())
            .unwrap();
        let second = EigenSolver::<f64>::find_eigenvalues(&solver, hilbert(3).as_ref()).unwrap();
        assert!((first.eigenvalues[0] - 3.0).abs() < 1e-6);
        assert!((second.eigenvalues[0] - 1.408_318_927_123_654).abs() < 1e-8);
    }

    #[test]
    fn test_attached_solver_requires_matrix() {
        let solver = AttachedSolver::<f64>::new(SolverKind::Qr, SolverConfig::default());
        assert_eq!(
            solver.find_eigenvalues().unwrap_err().kind(),
            &EigenErrorKind::UninitializedMatrix
        );
        assert!(solver.matrix().is_err());
    }

    #[test]
    fn test_attached_solver_accessors_and_reattach() {
        let config = SolverConfig::new(1e-9, 500).unwrap().with_shift(2.2).unwrap();
        let a = from_diagonal(&[1.0f64, 2.0, 3.0]);
        let b = from_diagonal(&[10.0f64, 20.0, 2.4]);
        let mut solver = AttachedSolver::<f64>::new(SolverKind::InversePower, config);
        assert_eq!(solver.tolerance(), 1e-9);
        assert_eq!(solver.max_iterations(), 500);
        assert_eq!(solver.shift(), 2.2);

        solver.attach_matrix(a.as_ref()).unwrap();
        let eigenvalue = solver.find_eigenvalues().unwrap().eigenvalues[0];
        assert!((eigenvalue - 2.0).abs() < 1e-6);

        solver.attach_matrix(b.as_ref()).unwrap();
        assert_eq!(solver.matrix().unwrap(), b.as_ref());
        assert!((solver.find_eigenvalues().unwrap().eigenvalues[0] - 2.4).abs() < 1e-6);
    }

    #[test]
    fn test_attach_rejects_non_square_and_keeps_previous() {
        let a = hilbert::<f64>(2);
        let wide: Mat<f64> = mat![[1.0, 2.0, 3.0]];
        let mut solver = AttachedSolver::<f64>::new(SolverKind::PowerMethod, SolverConfig::default());
        solver.attach_matrix(a.as_ref()).unwrap();
        let err = solver.attach_matrix(wide.as_ref()).unwrap_err();
        assert_eq!(
            err.kind(),
            &EigenErrorKind::InvalidMatrixShape { rows: 1, cols: 3 }
        );
        assert_eq!(solver.matrix().unwrap(), a.as_ref());
    }

    #[test]
    fn test_solver_kind_names() {
        assert_eq!(SolverKind::from_str("power", false).unwrap(), SolverKind::PowerMethod);
        assert_eq!(
            SolverKind::from_str("inverse_power_method", false).unwrap(),
            SolverKind::InversePower
        );
        assert_eq!(SolverKind::from_str("QR_method", false).unwrap(), SolverKind::Qr);
        assert_eq!(SolverKind::Qr.to_string(), "QR method");
        assert_eq!(
            serde_json::to_string(&SolverKind::InversePower).unwrap(),
            "\"inverse-power\""
        );
    }
}
