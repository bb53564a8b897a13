//! Error types for the data-loader crate.
//!
//! Every failure while reading the MovieLens CSV files is reported through
//! [`DataLoadError`]; callers get the file, line and field that was wrong.

use thiserror::Error;

/// Errors that can occur during data loading and parsing
///
/// Rust concept: The `#[derive(Error)]` macro from thiserror implements
/// `std::error::Error` and `Display` from our `#[error(...)]` attributes
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found in the data directory
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// A CSV row couldn't be read or deserialized
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Referenced entity doesn't exist (e.g., rating for non-existent movie)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: u32 },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
