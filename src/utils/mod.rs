//! File input and output around the solvers.
//!
//! This module provides the helpers used by the `eigen` binary and the tests.
//! It is organized into two submodules:
//!
//! - **`data_loader`**: Parses dense matrices from `.csv`, `.txt` and Matrix Market
//!   `.mtx` files, generic over the scalar type.
//!
//! - **`output`**: Prints eigenvalues to a writer or saves them to a `.txt` or `.csv`
//!   file.
//!

pub mod data_loader;
pub mod output;
