//! Write result types.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Terminal status of a submitted report transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    /// Transaction mined and succeeded.
    Success,
    /// Transaction mined but reverted.
    Reverted,
    /// Transaction could not be submitted.
    Fatal,
}

impl TxStatus {
    /// Returns true if the status indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, TxStatus::Success)
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxStatus::Success => write!(f, "SUCCESS"),
            TxStatus::Reverted => write!(f, "REVERTED"),
            TxStatus::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Result of a report write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    /// Terminal transaction status.
    #[serde(rename = "txStatus")]
    pub status: TxStatus,

    /// Transaction hash, when one was produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<B256>,

    /// Upstream error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl WriteResult {
    /// Create a successful result.
    pub fn success(tx_hash: B256) -> Self {
        Self {
            status: TxStatus::Success,
            tx_hash: Some(tx_hash),
            error_message: None,
        }
    }

    /// Create a failed result with an upstream message.
    pub fn failure(status: TxStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            tx_hash: None,
            error_message: Some(message.into()),
        }
    }

    /// Accept only `SUCCESS` with a hash; anything else becomes an error
    /// carrying the upstream message, or the status when there is none.
    pub fn into_tx_hash(self) -> Result<B256, ToolError> {
        if !self.status.is_success() {
            let message = self
                .error_message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| self.status.to_string());
            return Err(ToolError::Write(message));
        }

        self.tx_hash.ok_or(ToolError::MissingTxHash)
    }
}
