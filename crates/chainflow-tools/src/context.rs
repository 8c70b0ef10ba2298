//! Run context for a single workflow invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata identifying one workflow run.
///
/// A fresh context is created per trigger and dropped when the run ends;
/// nothing in it is carried into the next invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
    /// Unique run ID.
    pub run_id: Uuid,

    /// Workflow name.
    pub workflow: String,

    /// Trigger kind ("cron" or "log").
    pub trigger: String,

    /// When the run started.
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    /// Create a new run context.
    pub fn new(workflow: impl Into<String>, trigger: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            workflow: workflow.into(),
            trigger: trigger.into(),
            started_at: Utc::now(),
        }
    }

    /// Milliseconds elapsed since the run started.
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_new() {
        let ctx = RunContext::new("poorps", "cron");
        assert_eq!(ctx.workflow, "poorps");
        assert_eq!(ctx.trigger, "cron");
        assert!(ctx.elapsed_ms() >= 0);
    }

    #[test]
    fn test_run_ids_are_unique() {
        let a = RunContext::new("price", "cron");
        let b = RunContext::new("price", "cron");
        assert_ne!(a.run_id, b.run_id);
    }
}
