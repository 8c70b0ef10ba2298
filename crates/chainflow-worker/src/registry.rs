//! Workflow registry and dispatch.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::WorkflowError;
use crate::runtime::Runtime;
use crate::trigger::{CronPayload, EvmLog, TriggerKind};
use crate::workflows::{OnchainDataWorkflow, PoorpsWorkflow, PriceWorkflow};

/// Trigger handlers for one named workflow.
#[async_trait]
pub trait Workflow: Send + Sync {
    /// Returns the workflow's unique name.
    fn name(&self) -> &'static str;

    /// Trigger kinds this workflow handles.
    fn triggers(&self) -> &'static [TriggerKind];

    /// Handle a scheduled tick.
    async fn on_cron(&self, _runtime: &Runtime, _payload: &CronPayload) -> Result<String, WorkflowError> {
        Err(WorkflowError::UnsupportedTrigger {
            workflow: self.name().to_string(),
            trigger: TriggerKind::Cron.to_string(),
        })
    }

    /// Handle a chain log event.
    async fn on_log(&self, _runtime: &Runtime, _log: &EvmLog) -> Result<String, WorkflowError> {
        Err(WorkflowError::UnsupportedTrigger {
            workflow: self.name().to_string(),
            trigger: TriggerKind::Log.to_string(),
        })
    }

    fn supports(&self, kind: TriggerKind) -> bool {
        self.triggers().contains(&kind)
    }
}

/// Registry of available workflows.
pub struct WorkflowRegistry {
    workflows: HashMap<String, Arc<dyn Workflow>>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self {
            workflows: HashMap::new(),
        }
    }

    /// Register a workflow under its own name.
    pub fn register<W: Workflow + 'static>(&mut self, workflow: W) {
        let name = workflow.name().to_string();
        self.workflows.insert(name, Arc::new(workflow));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Workflow>> {
        self.workflows.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.workflows.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.workflows.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WorkflowRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowRegistry")
            .field("workflows", &self.list())
            .finish()
    }
}

/// Registry with every built-in workflow.
pub fn create_default_registry() -> WorkflowRegistry {
    let mut registry = WorkflowRegistry::new();
    registry.register(PriceWorkflow);
    registry.register(PoorpsWorkflow);
    registry.register(OnchainDataWorkflow);
    registry
}
