//! Error handling for point-export conversion.
//!
//! Row-level problems (short rows, missing object references) are not errors;
//! they are counted in the extraction statistics. The variants here cover
//! file-level and run-level failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Input directory not found: {path}")]
    InputDirectoryNotFound { path: PathBuf },

    #[error("No .{extension} files found in {path}")]
    NoInputFiles { path: PathBuf, extension: String },

    #[error("Failed to read input file {path}: {reason}")]
    InputReadFailed { path: PathBuf, reason: String },

    #[error("None of the {file_count} input files could be read")]
    AllInputsFailed { file_count: usize },

    #[error("Could not write {path} (also tried: {}): {source}", format_attempts(.attempts))]
    OutputWriteFailed {
        path: PathBuf,
        attempts: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("No answer available for prompt '{label}'")]
    PromptUnavailable { label: String },
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn input_read_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InputReadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn prompt_unavailable(label: impl Into<String>) -> Self {
        Self::PromptUnavailable {
            label: label.into(),
        }
    }

    /// Whether this error ends the whole run rather than a single file or group
    pub fn is_run_level(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. }
                | Error::InputDirectoryNotFound { .. }
                | Error::NoInputFiles { .. }
                | Error::AllInputsFailed { .. }
                | Error::PromptUnavailable { .. }
        )
    }
}

fn format_attempts(attempts: &[PathBuf]) -> String {
    if attempts.is_empty() {
        return "nothing else".to_string();
    }
    attempts
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
