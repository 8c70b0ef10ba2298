//! Trigger payloads.

use alloy_primitives::{Address, Bytes, B256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// Kind of trigger a workflow handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    Cron,
    Log,
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerKind::Cron => write!(f, "cron"),
            TriggerKind::Log => write!(f, "log"),
        }
    }
}

/// Scheduled tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronPayload {
    #[serde(default)]
    pub scheduled_execution_time: Option<DateTime<Utc>>,
}

impl CronPayload {
    /// Tick scheduled for `time`.
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            scheduled_execution_time: Some(time),
        }
    }

    /// Scheduled time, required for every cron run.
    pub fn scheduled_time(&self) -> Result<DateTime<Utc>, WorkflowError> {
        self.scheduled_execution_time
            .ok_or_else(|| WorkflowError::Config("Scheduled execution time is required".to_string()))
    }
}

/// Chain log event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmLog {
    /// Emitting contract.
    pub address: Address,

    pub topics: Vec<B256>,

    #[serde(default)]
    pub data: Bytes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<B256>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl EvmLog {
    /// Address packed into the last 20 bytes of a topic.
    pub fn topic_address(&self, index: usize) -> Option<Address> {
        self.topics
            .get(index)
            .map(|topic| Address::from_slice(&topic[12..]))
    }
}

/// One event that starts one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Cron(CronPayload),
    Log(EvmLog),
}

impl Trigger {
    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::Cron(_) => TriggerKind::Cron,
            Trigger::Log(_) => TriggerKind::Log,
        }
    }

    /// Reject payloads missing fields every handler depends on.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        match self {
            Trigger::Cron(payload) => payload.scheduled_time().map(|_| ()),
            Trigger::Log(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cron_requires_scheduled_time() {
        let err = Trigger::Cron(CronPayload::default()).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Scheduled execution time is required"
        );
        assert!(Trigger::Cron(CronPayload::at(Utc::now())).validate().is_ok());
    }

    #[test]
    fn test_topic_address_takes_last_20_bytes() {
        let emitter = Address::repeat_byte(0xcd);
        let mut topic = [0u8; 32];
        topic[12..].copy_from_slice(emitter.as_slice());

        let log = EvmLog {
            address: Address::ZERO,
            topics: vec![B256::ZERO, B256::from(topic)],
            data: Bytes::new(),
            tx_hash: None,
            block_number: None,
        };
        assert_eq!(log.topic_address(1), Some(emitter));
        assert_eq!(log.topic_address(2), None);
    }

    #[test]
    fn test_trigger_kind_display() {
        assert_eq!(TriggerKind::Cron.to_string(), "cron");
        assert_eq!(Trigger::Cron(CronPayload::default()).kind(), TriggerKind::Cron);
    }

    #[test]
    fn test_cron_payload_deserialization() {
        let payload: CronPayload = serde_json::from_value(serde_json::json!({
            "scheduledExecutionTime": "2025-03-01T10:00:00Z"
        }))
        .unwrap();
        assert!(payload.scheduled_time().is_ok());

        let empty: CronPayload = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.scheduled_time().is_err());
    }
}
