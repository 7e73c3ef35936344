use thiserror::Error;

/// Error types for headline, factor and report data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Feed parse error: {message}")]
    Parse { message: String },

    #[error("Feed error: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Timeout error: operation took longer than {timeout_seconds}s")]
    Timeout { timeout_seconds: u64 },

    #[error("Data validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for data operations
pub type DataResult<T> = Result<T, DataError>;

impl DataError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            DataError::Network(_) => true,
            DataError::Timeout { .. } => true,
            DataError::Api { status_code, .. } => {
                // Server errors (5xx) and rate limiting (429)
                *status_code >= 500 || *status_code == 429
            }
            _ => false,
        }
    }

    /// Create a parse error with context
    pub fn parse_error<S: Into<String>>(message: S) -> Self {
        DataError::Parse {
            message: message.into(),
        }
    }

    /// Create a validation error with field context
    pub fn validation_error<S: Into<String>>(field: S, message: S) -> Self {
        DataError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an API error with status code
    pub fn api_error<S: Into<String>>(status_code: u16, message: S) -> Self {
        DataError::Api {
            status_code,
            message: message.into(),
        }
    }
}
