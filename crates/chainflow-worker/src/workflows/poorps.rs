//! Liquidation bot.
//!
//! Each tick reports meme-coin prices, checks whether the configured user is
//! liquidatable and either opens a position or liquidates its collateral.

use alloy_primitives::{hex, Address, U256};
use async_trait::async_trait;

use chainflow_tools::abi::{self, ILiquidator, DEFAULT_COLLATERAL};
use chainflow_tools::BlockTag;

use crate::config::{EvmConfig, PriceFeed};
use crate::error::WorkflowError;
use crate::registry::Workflow;
use crate::runtime::Runtime;
use crate::trigger::{CronPayload, TriggerKind};

use super::pyth::{fetch_price, format_scaled_price, latest_price_url};

/// Write chosen from one `isLiquidatable` read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionAction {
    SetPosition,
    LiquidateCollateral,
}

impl PositionAction {
    pub fn decide(liquidatable: bool) -> Self {
        if liquidatable {
            PositionAction::LiquidateCollateral
        } else {
            PositionAction::SetPosition
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PositionAction::SetPosition => "Creating Position (Set Position)",
            PositionAction::LiquidateCollateral => "Liquidating Collateral",
        }
    }

    /// Receiver proxy and report payload for `user`.
    pub fn plan(&self, evm: &EvmConfig, user: Address) -> Result<(Address, Vec<u8>), WorkflowError> {
        match self {
            PositionAction::SetPosition => Ok((
                EvmConfig::require(evm.set_position_proxy_address, "setPositionProxyAddress")?,
                abi::set_position_payload(user, U256::from(DEFAULT_COLLATERAL)),
            )),
            PositionAction::LiquidateCollateral => Ok((
                EvmConfig::require(
                    evm.liquidate_collateral_proxy_address,
                    "liquidateCollateralProxyAddress",
                )?,
                abi::liquidate_payload(user),
            )),
        }
    }
}

pub struct PoorpsWorkflow;

#[async_trait]
impl Workflow for PoorpsWorkflow {
    fn name(&self) -> &'static str {
        "poorps"
    }

    fn triggers(&self) -> &'static [TriggerKind] {
        &[TriggerKind::Cron]
    }

    async fn on_cron(&self, runtime: &Runtime, _payload: &CronPayload) -> Result<String, WorkflowError> {
        let prices = price_summary(runtime).await?;

        let chain = runtime.primary_chain()?;
        let evm = chain.config();
        let user = evm.sender_address;
        let liquidator = EvmConfig::require(evm.liquidator_address, "liquidatorAddress")?;

        let liquidatable = chain
            .call_view(liquidator, &ILiquidator::isLiquidatableCall { user }, BlockTag::Latest)
            .await?
            ._0;
        tracing::info!(user = %user, liquidatable, "Liquidation status read");

        let action = PositionAction::decide(liquidatable);
        let (receiver, payload) = action.plan(evm, user)?;
        tracing::info!(action = action.description(), receiver = %receiver, "Submitting position write");

        let tx_hash = hex::encode_prefixed(chain.submit_write(receiver, payload).await?);

        runtime
            .notify(&notification_text(&prices, user, action, &tx_hash))
            .await;

        Ok(tx_hash)
    }
}

/// One line per configured feed; any failed fetch aborts the run.
async fn price_summary(runtime: &Runtime) -> Result<String, WorkflowError> {
    let config = runtime.config();
    let base_url = config
        .price_url
        .as_deref()
        .ok_or_else(|| WorkflowError::Config("priceUrl is not defined in config".to_string()))?;

    let mut lines = Vec::with_capacity(config.price_feeds.len());
    for PriceFeed { symbol, id } in &config.price_feeds {
        let url = latest_price_url(base_url, id);
        let response = fetch_price(runtime.http(), &url).await?;

        let line = match response.first_price() {
            Some(p) => format!("{}: ${}", symbol, format_scaled_price(&p.price, p.expo)?),
            None => format!("{}: Price Unavailable", symbol),
        };
        tracing::debug!(symbol = %symbol, line = %line, "Feed price");
        lines.push(line);
    }

    if lines.is_empty() {
        return Ok("Price Unavailable".to_string());
    }
    Ok(lines.join("\n"))
}

/// Markdown summary sent after the write.
pub fn notification_text(prices: &str, user: Address, action: PositionAction, tx_hash: &str) -> String {
    format!(
        "🚀 *Poorps Update* 🚀\n\n📊 *Prices:*\n{}\n\n👤 *User:* `{}`\n\n🛠 *Action:* {}\n\n🔗 *Tx Hash:* {}",
        prices,
        user,
        action.description(),
        tx_hash
    )
}
