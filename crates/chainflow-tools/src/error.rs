//! Capability error types.

use thiserror::Error;

/// Errors raised at a capability boundary.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Missing or malformed configuration for a capability.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP request completed with a status other than 200.
    #[error("HTTP request failed for {url} with status: {status}")]
    HttpStatus { url: String, status: u16 },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// ABI or hex decode failure.
    #[error("Decode error: {0}")]
    Decode(String),

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Report write finished with a non-success status.
    #[error("Failed to write report: {0}")]
    Write(String),

    /// Report write reported success without a transaction hash.
    #[error("Failed to write report: no transaction hash returned")]
    MissingTxHash,

    /// Notification endpoint rejected the message.
    #[error("Notification error: {0}")]
    Notification(String),
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::Json(e.to_string())
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(e: reqwest::Error) -> Self {
        ToolError::Http(e.to_string())
    }
}

impl From<alloy_sol_types::Error> for ToolError {
    fn from(e: alloy_sol_types::Error) -> Self {
        ToolError::Decode(e.to_string())
    }
}
