//! Error types for GraphQL operations.
//!
//! Provides structured error classification with stable type tags that
//! callers can show next to the raw message.

use thiserror::Error;

/// Errors that can occur while executing a GraphQL operation.
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Failed to reach the backend
    #[error("Connection failed to '{endpoint}': {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the configured timeout
    #[error("Request timeout after {duration}s")]
    Timeout { duration: u64 },

    /// Backend answered with a non-success HTTP status
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// GraphQL `errors` array was present and `data` was unusable
    #[error("GraphQL error: {}", messages.join("; "))]
    Response { messages: Vec<String> },

    /// `data` was null or lacked the expected root field
    #[error("Response is missing '{field}'")]
    MissingData { field: String },
}

impl GraphqlError {
    /// Get error type string for display and logging
    pub fn error_type(&self) -> &'static str {
        match self {
            GraphqlError::Build(_) => "build_error",
            GraphqlError::Connection { .. } => "connection_error",
            GraphqlError::Timeout { .. } => "request_timeout",
            GraphqlError::Status { .. } => "status_error",
            GraphqlError::Decode(_) => "decode_error",
            GraphqlError::Response { .. } => "graphql_error",
            GraphqlError::MissingData { .. } => "missing_data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_error_joins_messages() {
        let err = GraphqlError::Response {
            messages: vec!["Unauthorized".to_string(), "Bad input".to_string()],
        };
        assert_eq!(err.to_string(), "GraphQL error: Unauthorized; Bad input");
        assert_eq!(err.error_type(), "graphql_error");
    }

    #[test]
    fn test_timeout_error_type() {
        let err = GraphqlError::Timeout { duration: 30 };
        assert_eq!(err.error_type(), "request_timeout");
        assert_eq!(err.to_string(), "Request timeout after 30s");
    }
}
