//! Error types for the LLM subsystem.

use thiserror::Error;

/// Errors that can occur talking to the Ollama server.
///
/// None of these are retried automatically; callers surface the message
/// and let the user decide.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Server replied with a non-success status
    #[error("Ollama API error: status {status}, {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Body text returned by the server
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("failed to parse Ollama response: {0}")]
    Parse(String),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LlmError::Api {
            status: 404,
            message: "model 'mistral' not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Ollama API error: status 404, model 'mistral' not found"
        );

        let err = LlmError::Parse("missing field `response`".to_string());
        assert!(err.to_string().contains("parse"));
    }
}
