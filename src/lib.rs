//! Iterative eigenvalue solvers for dense, square, real matrices.
//!
//! This crate implements three classical methods on top of the [`faer`] linear algebra
//! framework, generic over `f32` and `f64`:
//!
//! **Power method** ([`PowerMethodSolver`]): repeatedly applies `A - μI` to a unit
//! vector and returns the eigenvalue of `A` farthest from the shift `μ`, which is the
//! dominant eigenvalue when `μ = 0`.
//!
//! **Inverse power method** ([`InversePowerMethodSolver`]): solves `(A - μI) x_new = x`
//! against a single LU factorization and returns the eigenvalue of `A` closest to `μ`.
//! Solves whose residual blows up are reported as ill-conditioned.
//!
//! **QR method** ([`QrMethodSolver`]): iterates `A ← RQ` on an explicit Householder QR
//! factorization and returns the whole spectrum as the diagonal of the limit. The
//! factorization itself is available as [`qr_decomposition`].
//!
//! All methods stop when their error metric reaches the tolerance or when the iteration
//! cap is hit. Hitting the cap is not an error: the current estimate is returned with
//! [`EigenvalueResult::converged`] set to `false`.
//!
//! ## Example Usage
//!
//! ```rust
//! use eigen_project::{EigenSolver, QrMethodSolver, SolverConfig, matrix::hilbert};
//!
//! let h = hilbert::<f64>(3);
//! let solver = QrMethodSolver::new(SolverConfig::new(1e-12, 1000)?);
//! let result = solver.find_eigenvalues(h.as_ref())?;
//!
//! assert!(result.converged);
//! assert!((result.max().unwrap() - 1.408318927123654).abs() < 1e-8);
//! assert!((result.min().unwrap() - 0.002687340355773529).abs() < 1e-8);
//! # Ok::<(), eigen_project::EigenError>(())
//! ```
//!
//! Matrices can also be read from `.csv`, `.txt` and `.mtx` files with
//! [`utils::data_loader::load_matrix`], and results written with [`utils::output`].

pub mod algorithms;
pub mod config;
pub mod error;
pub mod matrix;
pub mod solvers;
pub mod utils;

pub use algorithms::{
    EigenvalueResult,
    qr::{qr_decomposition, qr_decomposition_into},
};
pub use config::SolverConfig;
pub use error::{EigenError, EigenErrorKind};
pub use solvers::{
    AttachedSolver, EigenSolver, InversePowerMethodSolver, PowerMethodSolver, QrMethodSolver,
    SolverKind, find_eigenvalues,
};
