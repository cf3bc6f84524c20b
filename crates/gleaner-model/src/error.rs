//! Error types shared by loaders, pipelines and processors.

use thiserror::Error;

/// Errors raised while building or running a loader.
///
/// Falsy values are never an error: they are dropped silently by the loader.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoaderError {
    // === Construction Errors ===
    /// A selector-driven loader was built without a selector or a response.
    #[error("selector source requires a selector or a response")]
    MissingSelector,

    /// A regular expression could not be compiled.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A processor was configured with incompatible options.
    #[error("invalid {processor} configuration: {reason}")]
    InvalidProcessor {
        processor: &'static str,
        reason: String,
    },

    /// A URL could not be parsed or joined.
    #[error("invalid url '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// A declarative loader configuration could not be parsed.
    #[error("invalid loader configuration: {0}")]
    InvalidConfig(String),

    // === Processing Errors ===
    /// Index outside the bounds of the batch.
    #[error("index {index} out of range for batch of {len} values")]
    IndexOutOfRange { index: isize, len: usize },

    /// A processor received a value of the wrong kind.
    #[error("{processor} expected {expected}, found {found}")]
    TypeMismatch {
        processor: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A multi-field add produced something other than a mapping.
    #[error("multi-field add expects a mapping value, found {found}")]
    ExpectedMapping { found: &'static str },

    /// The record does not declare this field.
    #[error("record has no field '{0}'")]
    UnknownField(String),

    /// Selector evaluation failed.
    #[error("selector error: {0}")]
    Select(String),

    /// Error raised by a user-supplied function.
    #[error("{0}")]
    Custom(String),
}

impl LoaderError {
    /// Build a [`LoaderError::Custom`] error.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoaderError::IndexOutOfRange { index: 5, len: 2 };
        assert_eq!(err.to_string(), "index 5 out of range for batch of 2 values");

        let err = LoaderError::InvalidPattern {
            pattern: "(".to_string(),
            message: "unclosed group".to_string(),
        };
        assert_eq!(err.to_string(), "invalid pattern '(': unclosed group");
    }
}
