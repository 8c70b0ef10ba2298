//! Workflow error types.

use chainflow_tools::ToolError;
use thiserror::Error;

/// Errors that end a workflow run.
///
/// None of these are retried here; the scheduler re-invokes on the next tick.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Missing or invalid configuration, or a trigger missing a required field.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Trigger payload does not have the shape the handler needs.
    #[error("{0}")]
    InvalidTrigger(String),

    /// Workflow has no handler for this trigger kind.
    #[error("Workflow {workflow} does not handle {trigger} triggers")]
    UnsupportedTrigger { workflow: String, trigger: String },

    /// No workflow registered under this name.
    #[error("Unknown workflow: {0}")]
    UnknownWorkflow(String),

    /// Upstream data is unusable (e.g. proof-of-reserve ripcord pulled).
    #[error("{0}")]
    Data(String),

    /// Capability call failed.
    #[error(transparent)]
    Tool(#[from] ToolError),
}

impl WorkflowError {
    /// Returns true for configuration errors.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            WorkflowError::Config(_) | WorkflowError::Tool(ToolError::Configuration(_))
        )
    }
}
