//! Application error type.
//!
//! Every action reports failures through [`AppError`]. The front ends catch it at
//! the action boundary: the TUI shows it in the status line, the CLI prints it and
//! exits with [`AppError::exit_code`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// The CSV header does not contain the revenue column.
    #[error("Invalid CSV format! '{0}' column not found.")]
    MissingColumn(String),

    /// The file could not be read or a record could not be parsed.
    #[error("Failed to load CSV: {0}")]
    Format(String),

    /// An action needs a loaded, non-empty dataset.
    #[error("No CSV file loaded or dataset is empty!")]
    EmptyDataset,

    /// The dataset cannot support the requested computation.
    #[error("{0}")]
    Data(String),

    /// Invalid command-line input or configuration.
    #[error("{0}")]
    Usage(String),

    /// A forecast CSV or chart JSON could not be written or read back.
    #[error("{0}")]
    Export(String),

    /// Terminal setup, drawing or input failed in the TUI.
    #[error("{0}")]
    Terminal(String),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::MissingColumn(_) | AppError::Format(_) | AppError::Usage(_) => 2,
            AppError::EmptyDataset => 3,
            AppError::Data(_) => 4,
            AppError::Export(_) => 5,
            AppError::Terminal(_) => 6,
        }
    }

    /// True for the loader's format failures (missing column or unparsable file).
    pub fn is_format_error(&self) -> bool {
        matches!(self, AppError::MissingColumn(_) | AppError::Format(_))
    }
}
