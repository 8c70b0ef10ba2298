//! Run one workflow for one trigger.

use std::sync::Arc;

use chainflow_tools::RunContext;
use tracing::Instrument;

use crate::error::WorkflowError;
use crate::registry::WorkflowRegistry;
use crate::runtime::Runtime;
use crate::trigger::Trigger;

/// Dispatches triggers to registered workflows.
#[derive(Debug)]
pub struct Pipeline {
    registry: WorkflowRegistry,
    runtime: Arc<Runtime>,
}

impl Pipeline {
    pub fn new(registry: WorkflowRegistry, runtime: Arc<Runtime>) -> Self {
        Self { registry, runtime }
    }

    /// Validate `trigger`, run the workflow's handler and return its output.
    ///
    /// The trigger is checked before any capability is touched.
    pub async fn run(&self, workflow: &str, trigger: Trigger) -> Result<String, WorkflowError> {
        let handler = self
            .registry
            .get(workflow)
            .ok_or_else(|| WorkflowError::UnknownWorkflow(workflow.to_string()))?;

        let kind = trigger.kind();
        let ctx = RunContext::new(workflow, kind.to_string());
        let span = tracing::info_span!(
            "workflow_run",
            run_id = %ctx.run_id,
            workflow = %ctx.workflow,
            trigger = %ctx.trigger,
        );

        let runtime = self.runtime.as_ref();
        let result = async {
            trigger.validate()?;

            if !handler.supports(kind) {
                return Err(WorkflowError::UnsupportedTrigger {
                    workflow: workflow.to_string(),
                    trigger: kind.to_string(),
                });
            }

            tracing::info!("Workflow run started");
            match &trigger {
                Trigger::Cron(payload) => handler.on_cron(runtime, payload).await,
                Trigger::Log(log) => handler.on_log(runtime, log).await,
            }
        }
        .instrument(span.clone())
        .await;

        let _enter = span.enter();
        match &result {
            Ok(output) => tracing::info!(
                elapsed_ms = ctx.elapsed_ms(),
                output = %output,
                "Workflow run completed"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = ctx.elapsed_ms(),
                error = %e,
                "Workflow run failed"
            ),
        }

        result
    }
}
