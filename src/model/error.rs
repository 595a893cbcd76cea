//! Error types for sift.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`StartupError`] - Everything that can abort the process before the interactive loop
//!   - [`InputError`] - Source file missing or unreadable
//!   - [`QueryError`] - A filter or view expression given on the command line failed to compile
//!   - [`ConfigError`](crate::config::ConfigError) - Config file present but malformed
//!   - [`LoggingError`](crate::logging::LoggingError) - Log file could not be set up
//! - [`StoreError`] - Line numbering invariant violated on append
//!
//! # Recovery Strategy
//!
//! Only startup errors are fatal. Once the interactive loop runs, every failure is
//! absorbed where it happens and turned into ordinary state:
//!
//! | Failure | Resulting state |
//! |---|---|
//! | line is not JSON | invalid line (not an error at all) |
//! | load or tail read fails | store marked fully loaded, polling stops |
//! | expression fails to compile | filter set / transform unchanged |
//! | expression fails on a line | line excluded / raw text shown |

use crate::model::LineNumber;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort startup with a non-zero exit code.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The source file is missing or unreadable.
    #[error(transparent)]
    Input(#[from] InputError),

    /// A `--filter` expression did not compile.
    #[error("Invalid filter '{expression}': {source}")]
    InvalidFilter {
        /// The expression text as given.
        expression: String,
        #[source]
        source: QueryError,
    },

    /// The `--view` expression did not compile.
    #[error("Invalid view expression '{expression}': {source}")]
    InvalidView {
        /// The expression text as given.
        expression: String,
        #[source]
        source: QueryError,
    },

    /// The config file exists but could not be read or parsed.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The tracing subscriber could not be installed.
    #[error(transparent)]
    Logging(#[from] crate::logging::LoggingError),

    /// The terminal could not be set up or driven.
    #[error(transparent)]
    Terminal(#[from] crate::view::TuiError),
}

/// Errors encountered when reading the source file.
///
/// At startup these are fatal. Mid-session (load-more, read-to-end, tail polling)
/// they are logged and the store is marked fully loaded instead.
#[derive(Debug, Error)]
pub enum InputError {
    /// The source file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use sift::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File '{}' does not exist", path.display())]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The source file exists but could not be opened or inspected.
    #[error("Cannot read '{}': {source}", path.display())]
    Unreadable {
        /// The path that failed to open.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O error while reading an already opened file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the query language adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The expression text is not syntactically valid.
    #[error("parse error: {reason}")]
    Parse {
        /// Parser diagnostics.
        reason: String,
    },

    /// The expression parsed but references unknown filters or variables.
    #[error("compile error: {reason}")]
    Compile {
        /// Compiler diagnostics.
        reason: String,
    },

    /// The expression failed while running against a particular value.
    ///
    /// Never shown to the user: filters treat it as a failed match and the
    /// view transform falls back to raw text.
    #[error("evaluation error: {0}")]
    Eval(String),
}

/// Errors from appending to the line store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An appended batch does not continue the existing numbering.
    #[error("non-contiguous append: expected line {expected}, found line {found}")]
    NonContiguous {
        /// The line number the store needed next.
        expected: LineNumber,
        /// The line number the batch actually carried.
        found: LineNumber,
    },
}
