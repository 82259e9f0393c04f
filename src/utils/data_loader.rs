//! This module provides utilities for loading dense matrices from files.
//!
//! Three plain-text formats are supported, selected by file extension:
//!
//! - **`.csv`**: one matrix row per line, entries separated by commas.
//! - **`.txt`**: one matrix row per line, entries separated by whitespace.
//! - **`.mtx`**: Matrix Market coordinate format. Lines starting with `%` are headers
//!   or comments, the first other line is `rows cols [entries]`, and every following
//!   line is a 1-based `row col value` triplet. Entries that are never set are zero.
//!   A `symmetric` banner mirrors every off-diagonal entry.
//!
//! Every reader is generic over the scalar type, so the same file can be loaded in
//! single or double precision.

use crate::matrix::Scalar;
use faer::Mat;
use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::Path,
};
use thiserror::Error;

/// Represents all possible errors that can occur during matrix loading and parsing.
#[derive(Error, Debug)]
pub enum DataLoaderError {
    /// Wraps a standard I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Wraps an error from the CSV tokenizer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Occurs when a string cannot be parsed into an index.
    #[error("Parse error: Failed to parse integer from '{0}'")]
    ParseInt(String),
    /// Occurs when a string cannot be parsed into a matrix entry.
    #[error("Parse error: Failed to parse float from '{0}'")]
    ParseFloat(String),
    /// Occurs when the file holds no entries at all, or declares a zero dimension.
    #[error("Format error: The file does not contain a matrix.")]
    Empty,
    /// Occurs when a row of a CSV or TXT file has a different length than the first row.
    #[error("Format error: row {row} has {found} entries, but the first row has {expected}.")]
    InconsistentColumns {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Occurs if the Matrix Market size line is missing or malformed.
    #[error("Format error: The 'rows cols [entries]' size line was not found or was malformed.")]
    SizeLineMissing,
    /// Occurs when a Matrix Market entry line does not hold `row col value`.
    #[error("Format error: Expected 'row col value' but found '{0}'.")]
    MalformedEntry(String),
    /// Occurs when a Matrix Market entry lies outside the declared dimensions.
    #[error("Format error: Entry ({row}, {col}) lies outside the declared {rows}x{cols} matrix.")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    /// Occurs when a Matrix Market file declares a symmetric matrix that is not square.
    #[error("Format error: A symmetric matrix must be square, but {rows}x{cols} was declared.")]
    NonSquareSymmetric { rows: usize, cols: usize },
    /// Occurs when the file extension is not one of `csv`, `txt` or `mtx`.
    #[error("Unsupported matrix file extension: '{0}'. Expected 'csv', 'txt' or 'mtx'.")]
    UnsupportedExtension(String),
}

/// The supported matrix file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    Csv,
    Txt,
    Mtx,
}

impl MatrixFormat {
    /// Determines the format from the (case-insensitive) extension of `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataLoaderError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Ok(MatrixFormat::Csv),
            "txt" => Ok(MatrixFormat::Txt),
            "mtx" => Ok(MatrixFormat::Mtx),
            _ => Err(DataLoaderError::UnsupportedExtension(extension)),
        }
    }
}

impl fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatrixFormat::Csv => "CSV",
            MatrixFormat::Txt => "TXT",
            MatrixFormat::Mtx => "MTX",
        };
        f.write_str(name)
    }
}

fn parse_value<T: Scalar>(token: &str) -> Result<T, DataLoaderError> {
    token
        .trim()
        .parse::<T>()
        .map_err(|_| DataLoaderError::ParseFloat(token.to_string()))
}

fn parse_index(token: &str) -> Result<usize, DataLoaderError> {
    token
        .parse::<usize>()
        .map_err(|_| DataLoaderError::ParseInt(token.to_string()))
}

/// Assembles parsed rows into a matrix, checking that every row has the same length.
fn assemble_rows<T: Scalar>(rows: Vec<Vec<T>>) -> Result<Mat<T>, DataLoaderError> {
    let expected = match rows.first() {
        Some(first) if !first.is_empty() => first.len(),
        _ => return Err(DataLoaderError::Empty),
    };
    if let Some((row, found)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != expected)
        .map(|(i, row)| (i + 1, row.len()))
    {
        return Err(DataLoaderError::InconsistentColumns {
            row,
            expected,
            found,
        });
    }
    Ok(Mat::from_fn(rows.len(), expected, |i, j| rows[i][j]))
}

/// Parses comma-separated rows. Blank lines are skipped and entries are trimmed.
pub fn parse_csv<T: Scalar>(reader: impl Read) -> Result<Mat<T>, DataLoaderError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(parse_value)
            .collect::<Result<Vec<T>, _>>()?;
        rows.push(row);
    }
    assemble_rows(rows)
}

/// Parses whitespace-separated rows. Blank lines are skipped.
pub fn parse_txt<T: Scalar>(reader: impl BufRead) -> Result<Mat<T>, DataLoaderError> {
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let row = line
            .split_whitespace()
            .map(parse_value)
            .collect::<Result<Vec<T>, _>>()?;
        if !row.is_empty() {
            rows.push(row);
        }
    }
    assemble_rows(rows)
}

/// Parses a Matrix Market coordinate file.
pub fn parse_mtx<T: Scalar>(reader: impl BufRead) -> Result<Mat<T>, DataLoaderError> {
    let mut lines = reader.lines();
    let mut symmetric = false;

    // Skip the banner and comments, then read the size line.
    let (rows, cols) = loop {
        let line = lines.next().ok_or(DataLoaderError::SizeLineMissing)??;
        let line = line.trim();
        if let Some(header) = line.strip_prefix('%') {
            if header.starts_with("%MatrixMarket") {
                symmetric = header.to_ascii_lowercase().contains("symmetric");
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(DataLoaderError::SizeLineMissing);
        }
        break (parse_index(parts[0])?, parse_index(parts[1])?);
    };

    if rows == 0 || cols == 0 {
        return Err(DataLoaderError::Empty);
    }
    if symmetric && rows != cols {
        return Err(DataLoaderError::NonSquareSymmetric { rows, cols });
    }

    let mut matrix = Mat::<T>::zeros(rows, cols);
    for line in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(DataLoaderError::MalformedEntry(line.to_string()));
        }
        let row = parse_index(parts[0])?;
        let col = parse_index(parts[1])?;
        if row == 0 || row > rows || col == 0 || col > cols {
            return Err(DataLoaderError::IndexOutOfRange {
                row,
                col,
                rows,
                cols,
            });
        }
        let value: T = parse_value(parts[2])?;

        // Matrix Market indices are 1-based.
        matrix.as_mut()[(row - 1, col - 1)] = value;
        if symmetric {
            matrix.as_mut()[(col - 1, row - 1)] = value;
        }
    }

    Ok(matrix)
}

/// Reads a CSV matrix file.
pub fn read_csv<T: Scalar>(path: impl AsRef<Path>) -> Result<Mat<T>, DataLoaderError> {
    parse_csv(File::open(path)?)
}

/// Reads a whitespace-separated matrix file.
pub fn read_txt<T: Scalar>(path: impl AsRef<Path>) -> Result<Mat<T>, DataLoaderError> {
    parse_txt(BufReader::new(File::open(path)?))
}

/// Reads a Matrix Market coordinate file.
pub fn read_mtx<T: Scalar>(path: impl AsRef<Path>) -> Result<Mat<T>, DataLoaderError> {
    parse_mtx(BufReader::new(File::open(path)?))
}

/// Loads a matrix from `path`, choosing the reader from the file extension.
///
/// This is the main entry point of the module. The matrix is not required to be
/// square here; shape validation happens when it is handed to a solver.
pub fn load_matrix<T: Scalar>(path: impl AsRef<Path>) -> Result<Mat<T>, DataLoaderError> {
    let path = path.as_ref();
    let format = MatrixFormat::from_path(path)?;
    log::info!("Reading {format} file {}", path.display());

    let matrix = match format {
        MatrixFormat::Csv => read_csv(path)?,
        MatrixFormat::Txt => read_txt(path)?,
        MatrixFormat::Mtx => read_mtx(path)?,
    };
    log::debug!("Loaded a {}x{} matrix", matrix.nrows(), matrix.ncols());
    Ok(matrix)
}
