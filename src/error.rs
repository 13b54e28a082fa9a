use thiserror::Error;

use crate::config::MAX_FILE_SIZE_MB;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// Bad input caught on the client or rejected by the backend.
    #[error("{0}")]
    Validation(String),

    /// Login or registration rejected.
    #[error("{0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl AppError {
    /// Text suitable for an inline banner or alert.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Auth(msg) | AppError::NotFound(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// The server-provided message, if the error carries one.
    ///
    /// Network, storage and config failures never carry server text, so the
    /// caller should fall back to its own wording for those.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Validation(msg) | AppError::Auth(msg) | AppError::NotFound(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.user_message()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Network(format!("Malformed response: {}", err))
        } else {
            AppError::Network(err.to_string())
        }
    }
}

/// Reasons a selected file is refused before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FileRejection {
    #[error("Please select a file")]
    Missing,

    #[error("File must be a CSV (.csv extension)")]
    NotCsv,

    #[error("File size must be less than {}MB", MAX_FILE_SIZE_MB)]
    TooLarge { size: u64 },

    #[error("Please select a CSV file")]
    NothingSelected,

    #[error("An upload is already in progress")]
    UploadInFlight,

    #[error("The selected file is still loading")]
    StillReading,
}

impl From<FileRejection> for AppError {
    fn from(err: FileRejection) -> Self {
        AppError::Validation(err.to_string())
    }
}
