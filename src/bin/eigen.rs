//! Command-line front end for the eigenvalue solvers.
//!
//! The matrix is either read from a `.csv`, `.txt` or `.mtx` file or generated from a
//! named function, the method and its parameters are taken from the command line, and
//! the eigenvalues are printed or saved to a file. A complete run can also be described
//! in a JSON file passed with `--config`:
//!
//! ```json
//! {
//!     "input": { "type": "function", "name": "hilbert", "rows": 10, "cols": 10 },
//!     "precision": "double",
//!     "method": { "name": "qr", "tolerance": 1e-10, "max_iterations": 5000 },
//!     "output": { "type": "save", "path": "eigenvalues.csv" }
//! }
//! ```

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use eigen_project::{
    SolverConfig, SolverKind,
    config::{
        DEFAULT_MAX_ITERATIONS, DEFAULT_SHIFT, DEFAULT_TOLERANCE, InputConfig, MethodConfig,
        OutputConfig, Precision, RunConfig,
    },
    find_eigenvalues,
    matrix::{MatrixFunction, Scalar},
    utils::{
        data_loader::load_matrix,
        output::{print_eigenvalues, save_eigenvalues},
    },
};
use faer::Mat;
use std::{io, path::PathBuf, time::Instant};

/// Command-line arguments of the solver front end.
#[derive(Parser, Debug)]
#[clap(
    name = "eigen",
    about = "Computes eigenvalues of a dense real matrix with the power, inverse power or QR method."
)]
struct EigenArgs {
    /// JSON file describing the whole run. Replaces the matrix, method and output options.
    #[clap(long, value_name = "PATH", conflicts_with_all = ["file", "function"])]
    config: Option<PathBuf>,

    /// Matrix file to read (`.csv`, `.txt` or `.mtx`).
    #[clap(long, value_name = "PATH", conflicts_with = "function")]
    file: Option<PathBuf>,

    /// Generate the matrix from a named function instead of reading a file.
    #[clap(long, value_enum)]
    function: Option<MatrixFunction>,

    /// Number of rows of the generated matrix.
    #[clap(long, default_value_t = 3)]
    rows: usize,

    /// Number of columns of the generated matrix.
    #[clap(long, default_value_t = 3)]
    cols: usize,

    /// Scalar precision of the computation.
    #[clap(long, value_enum, default_value_t = Precision::Double)]
    precision: Precision,

    /// Eigenvalue method.
    #[clap(long, value_enum, default_value_t = SolverKind::PowerMethod)]
    method: SolverKind,

    /// Convergence tolerance.
    #[clap(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Maximum number of iterations.
    #[clap(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Shift for the power and inverse power methods.
    #[clap(long, default_value_t = DEFAULT_SHIFT, allow_hyphen_values = true)]
    shift: f64,

    /// Save the eigenvalues to a `.txt` or `.csv` file instead of printing them.
    #[clap(long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Log per-solve details.
    #[clap(long, short)]
    verbose: bool,
}

impl EigenArgs {
    /// Turns the arguments into a run description, reading `--config` if given.
    fn into_run_config(self) -> Result<RunConfig> {
        if let Some(path) = &self.config {
            return RunConfig::from_json_file(path)
                .with_context(|| format!("Failed to read the configuration {}", path.display()));
        }

        let input = match (self.file, self.function) {
            (Some(path), _) => InputConfig::File { path },
            (None, Some(name)) => InputConfig::Function {
                name,
                rows: self.rows,
                cols: self.cols,
            },
            (None, None) => bail!("No matrix given: use --file, --function or --config."),
        };
        let params = SolverConfig::new(self.tolerance, self.max_iterations)?.with_shift(self.shift)?;
        let output = match self.save {
            Some(path) => OutputConfig::Save { path },
            None => OutputConfig::Print,
        };

        Ok(RunConfig {
            input,
            precision: self.precision,
            method: MethodConfig {
                name: self.method,
                params,
            },
            output,
        })
    }
}

fn print_parameters(run: &RunConfig) {
    println!("--- Run parameters ---");
    match &run.input {
        InputConfig::File { path } => println!("Matrix file:    {}", path.display()),
        InputConfig::Function { name, rows, cols } => {
            println!("Matrix:         {name:?} function, {rows}x{cols}")
        }
    }
    println!("Precision:      {:?}", run.precision);
    println!("Method:         {}", run.method.name);
    println!("Tolerance:      {:e}", run.method.params.tolerance());
    println!("Max iterations: {}", run.method.params.max_iterations());
    if run.method.name != SolverKind::Qr {
        println!("Shift:          {}", run.method.params.shift());
    }
    match &run.output {
        OutputConfig::Print => println!("Output:         print"),
        OutputConfig::Save { path } => println!("Output:         {}", path.display()),
    }
    println!("----------------------");
}

fn load_input<T: Scalar>(input: &InputConfig) -> Result<Mat<T>> {
    match input {
        InputConfig::File { path } => load_matrix(path)
            .with_context(|| format!("Failed to load the matrix from {}", path.display())),
        InputConfig::Function { name, rows, cols } => Ok(name.generate(*rows, *cols)),
    }
}

fn run_with<T: Scalar>(run: &RunConfig) -> Result<()> {
    let matrix = load_input::<T>(&run.input)?;

    let start = Instant::now();
    let result = find_eigenvalues(run.method.name, matrix.as_ref(), run.method.params)
        .with_context(|| format!("The {} failed", run.method.name))?;
    log::info!(
        "{} finished in {:.3?} ({} iterations, converged: {})",
        run.method.name,
        start.elapsed(),
        result.iterations,
        result.converged
    );

    match &run.output {
        OutputConfig::Print => print_eigenvalues(&mut io::stdout().lock(), &result.eigenvalues)?,
        OutputConfig::Save { path } => save_eigenvalues(path, &result.eigenvalues)
            .with_context(|| format!("Failed to save the eigenvalues to {}", path.display()))?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = EigenArgs::parse();
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    let run = args.into_run_config()?;
    print_parameters(&run);

    match run.precision {
        Precision::Int => {
            log::warn!("Integer precision is not supported by the solvers; computing in single precision.");
            run_with::<f32>(&run)
        }
        Precision::Float => run_with::<f32>(&run),
        Precision::Double => run_with::<f64>(&run),
    }
}
