//! Ethereum JSON-RPC client.

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{BlockTag, CallMsg, EvmClient, Network};
use crate::error::ToolError;
use crate::http::{HttpClient, HttpRequest};

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// EVM capability speaking JSON-RPC over the HTTP capability.
pub struct JsonRpcEvmClient {
    http: Arc<dyn HttpClient>,
    rpc_url: String,
    network: Network,
    next_id: AtomicU64,
}

impl JsonRpcEvmClient {
    /// Create a client for one network.
    pub fn new(http: Arc<dyn HttpClient>, rpc_url: impl Into<String>, network: Network) -> Self {
        Self {
            http,
            rpc_url: rpc_url.into(),
            network,
            next_id: AtomicU64::new(1),
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, ToolError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(
            chain = self.network.name,
            method,
            id,
            "Sending JSON-RPC request"
        );

        let request = HttpRequest::post_json(&self.rpc_url, body)
            .with_header("Accept", "application/json");
        let response = self.http.send(&request).await?;
        response.require_ok(&self.rpc_url)?;

        let rpc: RpcResponse<T> = response.json()?;
        if let Some(err) = rpc.error {
            return Err(ToolError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        rpc.result
            .ok_or_else(|| ToolError::Decode(format!("{} returned no result", method)))
    }
}

#[async_trait]
impl EvmClient for JsonRpcEvmClient {
    async fn call_contract(&self, msg: &CallMsg, block: BlockTag) -> Result<Bytes, ToolError> {
        self.request("eth_call", serde_json::json!([msg, block.as_param()]))
            .await
    }

    async fn get_balance(&self, account: Address, block: BlockTag) -> Result<U256, ToolError> {
        self.request("eth_getBalance", serde_json::json!([account, block.as_param()]))
            .await
    }
}
