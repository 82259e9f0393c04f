//! Printing and saving computed eigenvalues.
//!
//! Results go either to a writer (standard output in the `eigen` binary) or to a file
//! whose extension picks the layout: `.txt` holds one eigenvalue per line, `.csv`
//! holds an `index,eigenvalue` table.

use crate::matrix::Scalar;
use serde::Serialize;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Represents all possible errors that can occur while writing results.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Output file name has no extension: {0:?}")]
    MissingExtension(PathBuf),
    #[error("Unsupported output file extension: '{0}'. Expected 'txt' or 'csv'.")]
    UnsupportedExtension(String),
}

/// A single row of the CSV output.
#[derive(Debug, Serialize)]
struct EigenvalueRecord<T> {
    /// 1-based position in the result vector.
    index: usize,
    eigenvalue: T,
}

/// Writes the eigenvalues to `writer`, one per line, under a heading.
pub fn print_eigenvalues<T: Scalar>(
    writer: &mut impl Write,
    eigenvalues: &[T],
) -> io::Result<()> {
    match eigenvalues {
        [value] => writeln!(writer, "Eigenvalue: {value}"),
        _ => {
            writeln!(writer, "Eigenvalues:")?;
            for (i, value) in eigenvalues.iter().enumerate() {
                writeln!(writer, "  {:>3}: {value}", i + 1)?;
            }
            Ok(())
        }
    }
}

/// Saves the eigenvalues to `path`. The format is chosen from the extension.
pub fn save_eigenvalues<T: Scalar>(
    path: impl AsRef<Path>,
    eigenvalues: &[T],
) -> Result<(), OutputError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| OutputError::MissingExtension(path.to_path_buf()))?
        .to_ascii_lowercase();

    match extension.as_str() {
        "txt" => {
            log::info!("Saving eigenvalues to {}", path.display());
            let mut writer = BufWriter::new(File::create(path)?);
            for value in eigenvalues {
                writeln!(writer, "{value}")?;
            }
            writer.flush()?;
        }
        "csv" => {
            log::info!("Saving eigenvalues to {}", path.display());
            let mut writer = csv::Writer::from_path(path)?;
            for (i, &eigenvalue) in eigenvalues.iter().enumerate() {
                writer.serialize(EigenvalueRecord {
                    index: i + 1,
                    eigenvalue,
                })?;
            }
            writer.flush()?;
        }
        _ => return Err(OutputError::UnsupportedExtension(extension)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_single_eigenvalue() {
        let mut buffer = Vec::new();
        print_eigenvalues(&mut buffer, &[2.5f64]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "Eigenvalue: 2.5\n");
    }

    #[test]
    fn test_print_spectrum() {
        let mut buffer = Vec::new();
        print_eigenvalues(&mut buffer, &[3.0f32, -1.5]).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Eigenvalues:\n    1: 3\n    2: -1.5\n"
        );
    }

    #[test]
    fn test_save_txt_and_csv() {
        let dir = tempfile::tempdir().unwrap();

        let txt = dir.path().join("out.txt");
        save_eigenvalues(&txt, &[1.0f64, 0.25]).unwrap();
        assert_eq!(std::fs::read_to_string(&txt).unwrap(), "1\n0.25\n");

        let csv = dir.path().join("out.csv");
        save_eigenvalues(&csv, &[1.0f64, 0.25]).unwrap();
        let content = std::fs::read_to_string(&csv).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("index,eigenvalue"));
        let rows: Vec<(usize, f64)> = lines
            .map(|line| {
                let (index, value) = line.split_once(',').unwrap();
                (index.parse().unwrap(), value.parse().unwrap())
            })
            .collect();
        assert_eq!(rows, vec![(1, 1.0), (2, 0.25)]);
    }

    #[test]
    fn test_save_rejects_unknown_extensions() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            save_eigenvalues(dir.path().join("out.json"), &[1.0f64]),
            Err(OutputError::UnsupportedExtension(ext)) if ext == "json"
        ));
        assert!(matches!(
            save_eigenvalues(dir.path().join("out"), &[1.0f64]),
            Err(OutputError::MissingExtension(_))
        ));
    }
}
