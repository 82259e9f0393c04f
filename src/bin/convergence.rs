//! Experiment Runner for the Convergence Analysis.
//!
//! This executable runs the three eigenvalue methods on a family of test matrices of
//! growing size and records how each one behaves: the number of iterations, whether it
//! converged before the cap, its distance to a ground-truth spectrum and its wall-clock
//! time. The ground truth comes from `faer`'s symmetric eigendecomposition, so every
//! scenario uses symmetric matrices.
//!
//! Failures (for example the inverse power method on a large Hilbert matrix) are
//! recorded in the output instead of stopping the run.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use eigen_project::{
    EigenvalueResult, SolverConfig, SolverKind, find_eigenvalues,
    matrix::{hilbert, random_symmetric_with_spectrum},
};
use faer::{Mat, Side};
use serde::Serialize;
use std::{path::PathBuf, time::Instant};

/// The family of test matrices.
#[derive(ValueEnum, Clone, Debug, Copy)]
enum ProblemScenario {
    /// Hilbert matrices: a rapidly decaying spectrum, increasingly ill-conditioned with n.
    Hilbert,
    /// Random symmetric matrices with the well-separated spectrum 1, 2, ..., n.
    Separated,
    /// Random symmetric matrices with the clustered spectrum 1, 1.01, ..., 1 + 0.01 (n - 1).
    Clustered,
}

/// Command-line arguments for the convergence experiment.
#[derive(Parser, Debug)]
#[clap(
    name = "convergence-runner",
    about = "Runs a convergence analysis of the power, inverse power and QR methods."
)]
struct ConvergenceArgs {
    /// The family of test matrices.
    #[clap(long, value_enum)]
    scenario: ProblemScenario,

    /// Smallest matrix dimension to test.
    #[clap(long, default_value_t = 2)]
    n_min: usize,

    /// Largest matrix dimension to test.
    #[clap(long, default_value_t = 20)]
    n_max: usize,

    /// Step size for iterating n.
    #[clap(long, default_value_t = 1)]
    n_step: usize,

    /// Convergence tolerance handed to every method.
    #[clap(long, default_value_t = 1e-10)]
    tolerance: f64,

    /// Iteration cap handed to every method.
    #[clap(long, default_value_t = 10_000)]
    max_iterations: usize,

    /// Seed for the random scenarios.
    #[clap(long, default_value_t = 42)]
    seed: u64,

    /// Path to the output CSV file where results will be written.
    #[clap(long, value_name = "PATH")]
    output: PathBuf,
}

/// Represents a single row of data for the convergence analysis CSV.
#[derive(Debug, Serialize)]
struct ConvergenceResult {
    /// Matrix dimension.
    n: usize,
    /// Method name.
    method: SolverKind,
    /// Iterations performed, 0 if the method failed.
    iterations: usize,
    /// Whether the method's error metric reached the tolerance.
    converged: bool,
    /// Largest absolute deviation from the ground-truth eigenvalue(s), NaN on failure.
    abs_error: f64,
    /// Wall-clock time of the solve in seconds.
    time_s: f64,
    /// Error message if the method failed, empty otherwise.
    failure: String,
}

/// Builds the test matrix for size `n`.
fn create_problem(scenario: ProblemScenario, n: usize, seed: u64) -> Result<Mat<f64>> {
    let spectrum: Vec<f64> = match scenario {
        ProblemScenario::Hilbert => return Ok(hilbert(n)),
        ProblemScenario::Separated => (1..=n).map(|i| i as f64).collect(),
        ProblemScenario::Clustered => (0..n).map(|i| 1.0 + 0.01 * i as f64).collect(),
    };
    Ok(random_symmetric_with_spectrum(&spectrum, seed)?)
}

/// Computes the sorted ground-truth spectrum with `faer`'s symmetric eigensolver.
fn reference_spectrum(a: &Mat<f64>) -> Result<Vec<f64>> {
    let evd = a
        .as_ref()
        .self_adjoint_eigen(Side::Lower)
        .map_err(|e| anyhow!("EVD failed: {:?}", e))?;
    let d_lambda = evd.S();
    let mut spectrum: Vec<f64> = (0..a.nrows()).map(|i| d_lambda[i]).collect();
    spectrum.sort_by(|a, b| a.total_cmp(b));
    Ok(spectrum)
}

/// Largest deviation of a result from the ground truth for the given method.
fn deviation(kind: SolverKind, result: &EigenvalueResult<f64>, truth: &[f64]) -> f64 {
    let by_magnitude = |a: &&f64, b: &&f64| a.abs().total_cmp(&b.abs());
    match kind {
        SolverKind::PowerMethod => truth
            .iter()
            .max_by(by_magnitude)
            .map_or(f64::NAN, |&target| (result.eigenvalues[0] - target).abs()),
        SolverKind::InversePower => truth
            .iter()
            .min_by(by_magnitude)
            .map_or(f64::NAN, |&target| (result.eigenvalues[0] - target).abs()),
        SolverKind::Qr => {
            let mut computed = result.eigenvalues.clone();
            computed.sort_by(|a, b| a.total_cmp(b));
            computed
                .iter()
                .zip(truth)
                .map(|(c, t)| (c - t).abs())
                .fold(0.0, f64::max)
        }
    }
}

/// The main entry point for the convergence experiment.
fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init()?;
    let args = ConvergenceArgs::parse();
    log::info!(
        "Starting convergence analysis for scenario: {:?}, n in {}..={}",
        args.scenario,
        args.n_min,
        args.n_max
    );

    let config = SolverConfig::new(args.tolerance, args.max_iterations)?;
    let mut results = Vec::new();

    for n in (args.n_min.max(1)..=args.n_max).step_by(args.n_step.max(1)) {
        log::info!("Running for n = {}...", n);
        let a = create_problem(args.scenario, n, args.seed)?;
        let truth = reference_spectrum(&a)?;

        for method in [SolverKind::PowerMethod, SolverKind::InversePower, SolverKind::Qr] {
            let start = Instant::now();
            let outcome = find_eigenvalues(method, a.as_ref(), config);
            let time_s = start.elapsed().as_secs_f64();

            let row = match outcome {
                Ok(result) => ConvergenceResult {
                    n,
                    method,
                    iterations: result.iterations,
                    converged: result.converged,
                    abs_error: deviation(method, &result, &truth),
                    time_s,
                    failure: String::new(),
                },
                Err(e) => {
                    log::warn!("{method} failed at n={n}: {e}");
                    ConvergenceResult {
                        n,
                        method,
                        iterations: 0,
                        converged: false,
                        abs_error: f64::NAN,
                        time_s,
                        failure: e.to_string(),
                    }
                }
            };
            results.push(row);
        }
    }

    log::info!("Writing results to {:?}...", &args.output);
    let mut writer = csv::Writer::from_path(&args.output)?;
    for record in results {
        writer.serialize(record)?;
    }
    writer.flush()?;

    log::info!("Convergence analysis complete.");
    Ok(())
}
