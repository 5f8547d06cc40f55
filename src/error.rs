// =============================================================================
// Error taxonomy for normalisation and indicator computation
// =============================================================================
//
// Normalisation errors are fatal for the whole table.  `InvalidParameter` is
// fatal only for the indicator that received it.  Insufficient history and
// zero denominators are never errors; they resolve to no-value markers or to
// defined numeric results inside the indicator functions.

use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("missing required column: {column}")]
    MissingColumn { column: String },

    #[error("malformed date {value:?} at row {row}")]
    MalformedDate { row: usize, value: String },

    #[error("malformed number {value:?} in column {column} at row {row}")]
    MalformedNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("invalid parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand used by the indicator functions for window validation.
    pub fn invalid(name: &'static str, value: impl ToString) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
