//! Chainflow Capability Library
//!
//! Clients for the external capabilities a workflow run calls into.
//!
//! This crate provides:
//! - HTTP client capability with a strict-status JSON fetch helper
//! - EVM JSON-RPC reads and the contract ABIs used by the workflows
//! - Report gateway writes returning a single `{status, hash, error}` result
//! - Telegram notifier
//! - Run context shared by log spans

pub mod abi;
pub mod context;
pub mod error;
pub mod evm;
pub mod http;
pub mod notify;
pub mod report;
pub mod result;

pub use context::RunContext;
pub use error::ToolError;
pub use evm::{BlockTag, CallMsg, EvmClient, JsonRpcEvmClient, Network};
pub use http::{fetch_json, HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use notify::{Notifier, TelegramNotifier};
pub use report::{GatewayReportWriter, ReportRequest, ReportWriter};
pub use result::{TxStatus, WriteResult};
