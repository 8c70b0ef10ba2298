//! Cron schedule parsing and the serve loop.
//!
//! The loop fires one run per tick and computes the next tick only after the
//! run returns, so two runs of the same workflow never overlap. A tick that
//! passes while a run is still in flight is skipped, not queued.

use chrono::{DateTime, Utc};

use crate::error::WorkflowError;
use crate::pipeline::Pipeline;
use crate::trigger::{CronPayload, Trigger};

/// Normalize a 5-field cron expression to the 6-field form with seconds.
pub fn normalize_schedule(input: &str) -> Result<String, WorkflowError> {
    let trimmed = input.trim();
    match trimmed.split_whitespace().count() {
        5 => Ok(format!("0 {trimmed}")),
        6 => Ok(trimmed.to_string()),
        _ => Err(WorkflowError::Config(format!(
            "invalid schedule '{trimmed}': expected 5 or 6 cron fields"
        ))),
    }
}

/// Parse a schedule into a cron matcher.
pub fn parse_schedule(input: &str) -> Result<croner::Cron, WorkflowError> {
    let expr = normalize_schedule(input)?;
    expr.parse::<croner::Cron>()
        .map_err(|e| WorkflowError::Config(format!("invalid schedule '{}': {}", input.trim(), e)))
}

/// First tick strictly after `after`.
pub fn next_tick(cron: &croner::Cron, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    cron.iter_after(after).next()
}

/// Run `workflow` on every tick of `schedule` until the task is dropped.
///
/// Read and write failures are logged and the loop waits for the next tick;
/// configuration errors end the loop.
pub async fn serve(pipeline: &Pipeline, workflow: &str, schedule: &str) -> Result<(), WorkflowError> {
    let cron = parse_schedule(schedule)?;
    tracing::info!(workflow, schedule, "Cron trigger registered");

    loop {
        let now = Utc::now();
        let next = next_tick(&cron, now).ok_or_else(|| {
            WorkflowError::Config(format!("schedule '{}' has no future occurrences", schedule))
        })?;

        let wait = (next - now).to_std().unwrap_or_default();
        tracing::debug!(workflow, next = %next, wait_ms = wait.as_millis() as u64, "Waiting for next tick");
        tokio::time::sleep(wait).await;

        match pipeline.run(workflow, Trigger::Cron(CronPayload::at(next))).await {
            Ok(output) => {
                tracing::info!(workflow, scheduled = %next, output = %output, "Scheduled run finished");
            }
            Err(e) if e.is_config() => {
                tracing::error!(workflow, error = %e, "Scheduled run hit a configuration error, stopping");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(workflow, scheduled = %next, error = %e, "Scheduled run failed, waiting for next tick");
            }
        }
    }
}
