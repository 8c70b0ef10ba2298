//! Report and write capability.
//!
//! A write is a single capability call: the raw payload goes in, an attested
//! report is produced and submitted upstream, and the terminal
//! `{status, hash, error}` comes back as a [`WriteResult`].

use alloy_primitives::Address;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ToolError;
use crate::http::{HttpClient, HttpRequest};
use crate::result::WriteResult;

/// Request to attest a payload and write it to a receiver contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// Chain selector of the target chain.
    pub chain_selector: u64,

    /// Receiver contract.
    pub receiver: Address,

    /// Raw payload bytes, base64-encoded on the wire.
    #[serde(with = "base64_bytes")]
    pub encoded_payload: Vec<u8>,

    pub encoder_name: String,
    pub signing_algo: String,
    pub hashing_algo: String,

    /// Gas limit as a string-encoded integer.
    pub gas_limit: String,
}

impl ReportRequest {
    /// EVM report with ECDSA signing over a keccak256 hash.
    pub fn evm(
        chain_selector: u64,
        receiver: Address,
        encoded_payload: Vec<u8>,
        gas_limit: impl Into<String>,
    ) -> Self {
        Self {
            chain_selector,
            receiver,
            encoded_payload,
            encoder_name: "evm".to_string(),
            signing_algo: "ecdsa".to_string(),
            hashing_algo: "keccak256".to_string(),
            gas_limit: gas_limit.into(),
        }
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(serde::de::Error::custom)
    }
}

/// Capability producing and submitting attested reports.
#[async_trait]
pub trait ReportWriter: Send + Sync {
    /// Block until the write reaches a terminal status.
    async fn write_report(&self, request: &ReportRequest) -> Result<WriteResult, ToolError>;
}

/// Report writer that hands requests to an HTTP report gateway.
pub struct GatewayReportWriter {
    http: Arc<dyn HttpClient>,
    gateway_url: String,
}

impl GatewayReportWriter {
    /// Create a writer for the given gateway endpoint.
    pub fn new(http: Arc<dyn HttpClient>, gateway_url: &str) -> Self {
        Self {
            http,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ReportWriter for GatewayReportWriter {
    async fn write_report(&self, request: &ReportRequest) -> Result<WriteResult, ToolError> {
        let url = format!("{}/reports", self.gateway_url);
        let body = serde_json::to_value(request)?;

        tracing::debug!(
            receiver = %request.receiver,
            chain_selector = request.chain_selector,
            payload_len = request.encoded_payload.len(),
            payload_b64 = %base64::engine::general_purpose::STANDARD.encode(&request.encoded_payload),
            "Submitting report"
        );

        let response = self
            .http
            .send(&HttpRequest::post_json(&url, body).with_header("Accept", "application/json"))
            .await?;
        response.require_ok(&url)?;

        let result: WriteResult = response.json()?;
        tracing::debug!(status = %result.status, tx_hash = ?result.tx_hash, "Report write finished");
        Ok(result)
    }
}
