//! Error types for selector evaluation.

use gleaner_model::LoaderError;
use thiserror::Error;

/// Errors that can occur while evaluating selector queries.
#[derive(Debug, Error)]
pub enum SelectError {
    /// The query could not be parsed.
    #[error("invalid query '{query}': {message}")]
    InvalidQuery { query: String, message: String },

    /// A regular expression could not be compiled.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl From<SelectError> for LoaderError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::InvalidPattern { pattern, message } => {
                LoaderError::InvalidPattern { pattern, message }
            }
            other @ SelectError::InvalidQuery { .. } => LoaderError::Select(other.to_string()),
        }
    }
}

/// Result type for selector operations.
pub type Result<T> = std::result::Result<T, SelectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_into_loader_error() {
        let err = SelectError::InvalidQuery {
            query: "p[".to_string(),
            message: "unexpected end".to_string(),
        };
        let loader_err: LoaderError = err.into();
        assert!(matches!(loader_err, LoaderError::Select(msg) if msg.contains("p[")));
    }
}
