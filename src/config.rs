//! Solver parameters and run configuration.
//!
//! [`SolverConfig`] holds the numeric controls shared by every solver: the
//! convergence tolerance, the iteration cap and the shift used by the power-family
//! methods. It can only be built through validating constructors, so a zero or
//! negative tolerance or iteration cap never reaches a loop guard. Deserialization
//! goes through the same validation.
//!
//! [`RunConfig`] describes a complete run of the `eigen` binary (where the matrix comes
//! from, the scalar precision, the method and where the result goes) and can be read
//! from a JSON file.

use crate::{
    error::{EigenError, EigenErrorKind},
    matrix::MatrixFunction,
    solvers::SolverKind,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path, path::PathBuf};
use thiserror::Error;

/// Default convergence tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;
/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;
/// Default shift.
pub const DEFAULT_SHIFT: f64 = 0.0;

/// Numeric controls shared by all iterative solvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SolverParams")]
pub struct SolverConfig {
    tolerance: f64,
    max_iterations: usize,
    shift: f64,
}

impl SolverConfig {
    /// Creates a configuration with a zero shift.
    ///
    /// # Errors
    /// Returns [`EigenErrorKind::InvalidParameter`] if `tolerance` is not strictly
    /// positive and finite, or if `max_iterations` is zero.
    pub fn new(tolerance: f64, max_iterations: usize) -> Result<Self, EigenError> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(EigenErrorKind::InvalidParameter(format!(
                "tolerance must be positive and finite, got {tolerance}"
            ))
            .into());
        }
        if max_iterations == 0 {
            return Err(EigenErrorKind::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            )
            .into());
        }
        Ok(Self {
            tolerance,
            max_iterations,
            shift: DEFAULT_SHIFT,
        })
    }

    /// Returns a copy of the configuration with the given shift.
    ///
    /// # Errors
    /// Returns [`EigenErrorKind::InvalidParameter`] if `shift` is not finite.
    pub fn with_shift(self, shift: f64) -> Result<Self, EigenError> {
        if !shift.is_finite() {
            return Err(EigenErrorKind::InvalidParameter(format!(
                "shift must be finite, got {shift}"
            ))
            .into());
        }
        Ok(Self { shift, ..self })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn shift(&self) -> f64 {
        self.shift
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            shift: DEFAULT_SHIFT,
        }
    }
}

/// Unvalidated mirror of [`SolverConfig`] used on the deserialization path.
#[derive(Deserialize)]
struct SolverParams {
    #[serde(default = "default_tolerance")]
    tolerance: f64,
    #[serde(default = "default_max_iterations")]
    max_iterations: usize,
    #[serde(default)]
    shift: f64,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

impl TryFrom<SolverParams> for SolverConfig {
    type Error = EigenError;

    fn try_from(params: SolverParams) -> Result<Self, Self::Error> {
        SolverConfig::new(params.tolerance, params.max_iterations)?.with_shift(params.shift)
    }
}

/// Scalar type used for the whole run.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Integer input, computed in single precision.
    Int,
    /// Single precision (`f32`).
    Float,
    /// Double precision (`f64`).
    #[default]
    Double,
}

/// Where the matrix of a run comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputConfig {
    /// A `.csv`, `.txt` or `.mtx` file.
    File { path: PathBuf },
    /// A matrix generated entry by entry from a named function.
    Function {
        name: MatrixFunction,
        rows: usize,
        cols: usize,
    },
}

/// Solver selection together with its numeric controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodConfig {
    pub name: SolverKind,
    #[serde(flatten)]
    pub params: SolverConfig,
}

/// What to do with the computed eigenvalues.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputConfig {
    /// Print to standard output.
    #[default]
    Print,
    /// Save to a `.txt` or `.csv` file.
    Save { path: PathBuf },
}

/// A complete run description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub precision: Precision,
    pub method: MethodConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Errors raised while reading a [`RunConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error while reading the configuration: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl RunConfig {
    /// Parses a run configuration from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads and parses a run configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
