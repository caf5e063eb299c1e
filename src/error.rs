//! Error types for the ephemeral tic-tac-toe crate

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("coordinate ({row}, {col}) is outside the {grid_size}x{grid_size} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        grid_size: usize,
    },

    #[error("action index {index} is out of range for {n_actions} actions")]
    ActionIndexOutOfRange { index: usize, n_actions: usize },

    #[error("no legal actions available for selection")]
    NoLegalActions,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
