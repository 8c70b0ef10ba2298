//! Worker configuration.
//!
//! Two layers: process settings read from the environment (`RunnerSettings`)
//! and the validated workflow file (`WorkflowConfig`), loaded once at startup
//! and never mutated afterwards.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::WorkflowError;
use crate::scheduler::parse_schedule;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Process-level settings from environment variables.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    /// Workflow config file path.
    pub config_path: Option<PathBuf>,

    /// Log output format.
    pub log_format: LogFormat,

    /// Timeout applied to every outgoing HTTP request.
    pub http_timeout: Duration,

    /// Telegram bot token override.
    pub telegram_bot_token: Option<String>,

    /// Telegram chat ID override.
    pub telegram_chat_id: Option<String>,
}

impl RunnerSettings {
    /// Load settings from environment variables.
    pub fn from_env() -> Self {
        let config_path = std::env::var("CHAINFLOW_CONFIG").ok().map(PathBuf::from);

        let log_format = match std::env::var("CHAINFLOW_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let http_timeout_secs: u64 = std::env::var("CHAINFLOW_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Self {
            config_path,
            log_format,
            http_timeout: Duration::from_secs(http_timeout_secs),
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN").ok().filter(|s| !s.is_empty()),
            telegram_chat_id: std::env::var("TELEGRAM_CHAT_ID").ok().filter(|s| !s.is_empty()),
        }
    }
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            config_path: None,
            log_format: LogFormat::Pretty,
            http_timeout: Duration::from_secs(30),
            telegram_bot_token: None,
            telegram_chat_id: None,
        }
    }
}

/// Pyth price feed to quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFeed {
    pub symbol: String,
    pub id: String,
}

fn default_price_feeds() -> Vec<PriceFeed> {
    [
        ("SHIB", "0xf0d57deca57b3da2fe63a493f4c25925fdfd8edf834b20f93e1f84dbd1504d4a"),
        ("PEPE", "0xd69731a2e74ac1ce884fc3890f7ee324b6deb66147055249568869ed700882e4"),
        ("DEGEN", "0x9c93e4a22c56885af427ac4277437e756e7ec403fbc892f975d497383bb33560"),
    ]
    .into_iter()
    .map(|(symbol, id)| PriceFeed {
        symbol: symbol.to_string(),
        id: id.to_string(),
    })
    .collect()
}

/// Action the on-chain data workflow takes on a cron tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CronAction {
    #[default]
    IncrementCounter,
    ProofOfReserve,
}

/// Telegram credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// Per-chain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmConfig {
    /// CCIP chain selector name (e.g. `ethereum-testnet-sepolia`).
    pub chain_selector_name: String,

    /// JSON-RPC endpoint for reads.
    pub rpc_url: String,

    /// Gas limit for report writes, string-encoded integer.
    pub gas_limit: String,

    /// Account the workflow acts for.
    pub sender_address: Address,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidator_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_position_proxy_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidate_collateral_proxy_address: Option<Address>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub por_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_reader_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_emitter_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_address: Option<Address>,
}

impl EvmConfig {
    /// Unwrap an optional address field or fail with a configuration error.
    pub fn require(field: Option<Address>, name: &str) -> Result<Address, WorkflowError> {
        field.ok_or_else(|| WorkflowError::Config(format!("{} is not defined in config", name)))
    }
}

/// Validated workflow configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    /// Cron expression (5 or 6 fields).
    pub schedule: String,

    /// Data URL (price feed or proof-of-reserve endpoint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Pyth Hermes base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_url: Option<String>,

    #[serde(default = "default_price_feeds")]
    pub price_feeds: Vec<PriceFeed>,

    #[serde(default)]
    pub cron_action: CronAction,

    /// Report gateway endpoint used for writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_gateway_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<TelegramConfig>,

    pub evms: Vec<EvmConfig>,
}

impl WorkflowConfig {
    /// Load and validate a config file (JSON, or YAML by extension).
    pub fn load(path: &Path) -> Result<Self, WorkflowError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            WorkflowError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        let config: Self = if is_yaml {
            serde_yaml::from_str(&raw)
                .map_err(|e| WorkflowError::Config(format!("Invalid config {}: {}", path.display(), e)))?
        } else {
            serde_json::from_str(&raw)
                .map_err(|e| WorkflowError::Config(format!("Invalid config {}: {}", path.display(), e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        parse_schedule(&self.schedule)?;

        if self.evms.is_empty() {
            return Err(WorkflowError::Config("evms must contain at least one chain".to_string()));
        }

        for evm in &self.evms {
            evm.gas_limit.parse::<u64>().map_err(|_| {
                WorkflowError::Config(format!(
                    "gasLimit for {} must be an integer string, got {:?}",
                    evm.chain_selector_name, evm.gas_limit
                ))
            })?;

            if evm.rpc_url.trim().is_empty() {
                return Err(WorkflowError::Config(format!(
                    "rpcUrl for {} is empty",
                    evm.chain_selector_name
                )));
            }
        }

        Ok(())
    }

    /// Replace Telegram credentials with values from the environment, when set.
    pub fn apply_overrides(&mut self, settings: &RunnerSettings) {
        if let (Some(token), Some(chat_id)) = (&settings.telegram_bot_token, &settings.telegram_chat_id) {
            self.telegram = Some(TelegramConfig {
                bot_token: token.clone(),
                chat_id: chat_id.clone(),
            });
            return;
        }

        if let Some(tg) = self.telegram.as_mut() {
            if let Some(token) = &settings.telegram_bot_token {
                tg.bot_token = token.clone();
            }
            if let Some(chat_id) = &settings.telegram_chat_id {
                tg.chat_id = chat_id.clone();
            }
        }
    }
}
