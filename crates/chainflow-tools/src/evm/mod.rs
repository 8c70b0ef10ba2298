//! EVM chain capability.

mod network;
mod rpc;

pub use network::{lookup_network, Network};
pub use rpc::JsonRpcEvmClient;

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Block to evaluate a read against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTag {
    #[default]
    Latest,
    /// Last finalized block.
    Finalized,
    Number(u64),
}

impl BlockTag {
    /// JSON-RPC block parameter.
    pub fn as_param(&self) -> serde_json::Value {
        match self {
            BlockTag::Latest => serde_json::json!("latest"),
            BlockTag::Finalized => serde_json::json!("finalized"),
            BlockTag::Number(n) => serde_json::json!(format!("0x{:x}", n)),
        }
    }
}

/// Read-only contract call message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMsg {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
}

impl CallMsg {
    /// Call from the zero address.
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            from: Address::ZERO,
            to,
            data: data.into(),
        }
    }
}

/// Capability for reading chain state.
#[async_trait]
pub trait EvmClient: Send + Sync {
    /// Execute a view call and return the raw return data.
    async fn call_contract(&self, msg: &CallMsg, block: BlockTag) -> Result<Bytes, ToolError>;

    /// Native balance of an account in wei.
    async fn get_balance(&self, account: Address, block: BlockTag) -> Result<U256, ToolError>;
}
