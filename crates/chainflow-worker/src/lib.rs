//! Chainflow Worker
//!
//! Runs cron and chain-log triggered workflows against EVM chains.
//!
//! This crate provides:
//! - Workflow config loading and validation
//! - Trigger payloads and the run pipeline (validate, read, decide, write, notify)
//! - The `price`, `poorps` and `onchain-data` workflows
//! - Cron serve loop and read-only balance and Aqua inspectors

pub mod chain;
pub mod config;
pub mod error;
pub mod inspect;
pub mod pipeline;
pub mod registry;
pub mod runtime;
pub mod scheduler;
pub mod trigger;
pub mod workflows;

pub use config::{RunnerSettings, WorkflowConfig};
pub use error::WorkflowError;
pub use pipeline::Pipeline;
pub use registry::{create_default_registry, Workflow, WorkflowRegistry};
pub use runtime::Runtime;
pub use trigger::{CronPayload, EvmLog, Trigger, TriggerKind};
