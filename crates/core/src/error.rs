//! Error types for the ContentScout domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all ContentScout operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Storage errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Cache errors ---
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    // --- Agent errors ---
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Validation failures surfaced as errors ---
    #[error("Validation failed: {0}")]
    Validation(String),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database not connected. Call connect() first.")]
    NotConnected,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Duplicate document id in {collection}: {id}")]
    Duplicate { collection: String, id: String },

    #[error("Unsupported aggregation stage: {0}")]
    UnsupportedStage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache not connected. Call connect() first.")]
    NotConnected,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Value at {key} is not a {expected}")]
    WrongType { key: String, expected: &'static str },
}

#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("Agent run failed: {agent}: {reason}")]
    RunFailed { agent: String, reason: String },

    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Agent produced no output for key: {0}")]
    MissingOutput(String),

    #[error("Agent timed out: {agent} after {timeout_secs}s")]
    Timeout { agent: String, timeout_secs: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Runtime not configured: {0}")]
    NotConfigured(String),
}

impl AgentError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AgentError::Network(_) | AgentError::Timeout { .. } => true,
            AgentError::ApiError { status_code, .. } => {
                *status_code == 429 || *status_code >= 500
            }
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_connected_message() {
        let err = StoreError::NotConnected;
        assert_eq!(err.to_string(), "Database not connected. Call connect() first.");
    }

    #[test]
    fn retryable_classification() {
        assert!(AgentError::Network("reset".into()).is_retryable());
        assert!(
            AgentError::ApiError {
                status_code: 503,
                message: "unavailable".into()
            }
            .is_retryable()
        );
        assert!(
            !AgentError::ApiError {
                status_code: 400,
                message: "bad request".into()
            }
            .is_retryable()
        );
        assert!(!AgentError::MissingOutput("keyword_analysis".into()).is_retryable());
    }

    #[test]
    fn bounded_errors_convert_into_top_level() {
        let err: Error = StoreError::NotConnected.into();
        assert!(matches!(err, Error::Store(_)));
        let err: Error = CacheError::NotConnected.into();
        assert!(matches!(err, Error::Cache(_)));
    }
}
