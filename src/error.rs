//! Error types for biclust.

use thiserror::Error;

/// Biclust error types.
#[derive(Error, Debug)]
pub enum BiclustError {
    /// I/O failure while reading an input file
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Matrix value shape does not match the declared row/column names
    #[error("Shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// Duplicate row or column name in a matrix
    #[error("Duplicate {axis} name: '{name}'")]
    DuplicateName { axis: &'static str, name: String },

    /// A field that should hold a number could not be parsed
    #[error("Unparsable numeric field '{field}' (line {line})")]
    NumericField { field: String, line: usize },

    /// Delimited input that needs a header line was read without one
    #[error("Missing header line in delimited input")]
    MissingHeader,

    /// Cluster count below the minimum of 1
    #[error("Invalid cluster count: {0} (must be at least 1)")]
    InvalidClusterCount(usize),

    /// Cluster id 0 is reserved for "unassigned" and never a valid membership
    #[error("Invalid cluster id: 0 (cluster ids are positive)")]
    InvalidClusterId,

    /// A seeding strategy could not produce an assignment
    #[error("Seeding failed: {0}")]
    Seeding(String),

    /// A column-seeding strategy returned an assignment of the wrong arity
    #[error("Column seeding returned {got} assignments, expected {expected}")]
    SeedingArity { expected: usize, got: usize },
}

/// Result type alias for biclust operations.
pub type Result<T> = std::result::Result<T, BiclustError>;
