//! On-chain data workflow: counter increment or proof-of-reserve on cron,
//! last-message lookup on log events.

use alloy_primitives::{hex, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use chainflow_tools::abi::{IBalanceReader, ICounter, IERC20, IMessageEmitter, IReserveManager};
use chainflow_tools::{fetch_json, BlockTag};

use crate::config::{CronAction, EvmConfig};
use crate::error::WorkflowError;
use crate::registry::Workflow;
use crate::runtime::Runtime;
use crate::trigger::{CronPayload, EvmLog, TriggerKind};

/// Topics a message log must carry: signature, emitter, message hash.
const MIN_LOG_TOPICS: usize = 3;

/// Proof-of-reserve attestation served at `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PorResponse {
    pub account_name: String,
    pub total_trust: f64,
    pub total_token: f64,
    pub ripcord: bool,
    /// Passed through to the logs as served; not every source includes a zone.
    pub updated_at: String,
}

impl PorResponse {
    /// `totalToken` in 18-decimal base units.
    pub fn scaled_reserve(&self) -> Result<U256, WorkflowError> {
        let scaled = self.total_token * 1e18;
        if !scaled.is_finite() || scaled < 0.0 {
            return Err(WorkflowError::Data(format!(
                "invalid totalToken in reserve response: {}",
                self.total_token
            )));
        }
        U256::try_from(scaled.trunc()).map_err(|e| {
            WorkflowError::Data(format!(
                "totalToken {} does not fit in uint256: {}",
                self.total_token, e
            ))
        })
    }
}

pub struct OnchainDataWorkflow;

#[async_trait]
impl Workflow for OnchainDataWorkflow {
    fn name(&self) -> &'static str {
        "onchain-data"
    }

    fn triggers(&self) -> &'static [TriggerKind] {
        &[TriggerKind::Cron, TriggerKind::Log]
    }

    async fn on_cron(&self, runtime: &Runtime, _payload: &CronPayload) -> Result<String, WorkflowError> {
        let action = runtime.config().cron_action;
        tracing::info!(action = ?action, "Running cron action");

        match action {
            CronAction::IncrementCounter => increment_counter(runtime).await,
            CronAction::ProofOfReserve => proof_of_reserve(runtime).await,
        }
    }

    async fn on_log(&self, runtime: &Runtime, log: &EvmLog) -> Result<String, WorkflowError> {
        let chain = runtime.primary_chain()?;
        let contract = EvmConfig::require(chain.config().message_emitter_address, "messageEmitterAddress")?;

        if log.address != contract {
            tracing::warn!(address = %log.address, expected = %contract, "Log from unexpected contract");
            return Err(WorkflowError::InvalidTrigger(format!(
                "log from {} does not match messageEmitterAddress {}",
                log.address, contract
            )));
        }

        if log.topics.len() < MIN_LOG_TOPICS {
            tracing::warn!(topics = log.topics.len(), "Log payload does not contain enough topics");
            return Err(WorkflowError::InvalidTrigger(format!(
                "log payload does not contain enough topics {}",
                log.topics.len()
            )));
        }

        let emitter = log.topic_address(1).ok_or_else(|| {
            WorkflowError::InvalidTrigger("log payload is missing the emitter topic".to_string())
        })?;
        tracing::info!(emitter = %emitter, "Emitter decoded from log");

        let message = chain
            .call_view(contract, &IMessageEmitter::getLastMessageCall { emitter }, BlockTag::Finalized)
            .await?
            ._0;
        tracing::info!(message = %message, "Message retrieved from the contract");

        Ok(message)
    }
}

async fn increment_counter(runtime: &Runtime) -> Result<String, WorkflowError> {
    let chain = runtime.primary_chain()?;
    let counter = EvmConfig::require(chain.config().counter_address, "counterAddress")?;

    let current = chain
        .call_view(counter, &ICounter::numberCall {}, BlockTag::Latest)
        .await?
        ._0;
    tracing::info!(counter = %counter, value = %current, "Current counter value");

    let tx_hash = chain
        .submit_write(counter, ICounter::incrementCall {}.abi_encode())
        .await?;

    Ok(hex::encode_prefixed(tx_hash))
}

async fn proof_of_reserve(runtime: &Runtime) -> Result<String, WorkflowError> {
    let url = runtime
        .config()
        .url
        .as_deref()
        .ok_or_else(|| WorkflowError::Config("url is not defined in config".to_string()))?;

    tracing::info!(url, "Fetching proof-of-reserve");
    let reserve: PorResponse = fetch_json(runtime.http(), url).await?;
    if reserve.ripcord {
        return Err(WorkflowError::Data("ripcord is true".to_string()));
    }
    tracing::info!(
        account = %reserve.account_name,
        total_token = reserve.total_token,
        updated_at = %reserve.updated_at,
        "Reserve info fetched"
    );

    let total_supply = total_supply(runtime).await?;
    tracing::info!(total_supply = %total_supply, "Total supply across chains");

    let total_reserve = reserve.scaled_reserve()?;
    tracing::info!(total_reserve = %total_reserve, "Total reserve scaled");

    let chain = runtime.primary_chain()?;
    let evm = chain.config();

    let token = EvmConfig::require(evm.token_address, "tokenAddress")?;
    let reader = EvmConfig::require(evm.balance_reader_address, "balanceReaderAddress")?;
    let balances = chain
        .call_view(
            reader,
            &IBalanceReader::getNativeBalancesCall { addresses: vec![token] },
            BlockTag::Finalized,
        )
        .await?
        ._0;
    let native = balances
        .first()
        .copied()
        .ok_or_else(|| WorkflowError::Data("No balances returned from contract".to_string()))?;
    tracing::info!(native_balance = %native, "Native token balance");

    let proxy = EvmConfig::require(evm.proxy_address, "proxyAddress")?;
    let calldata = IReserveManager::updateReservesCall {
        data: IReserveManager::UpdateReserves {
            totalMinted: total_supply,
            totalReserve: total_reserve,
        },
    }
    .abi_encode();

    tracing::info!(total_minted = %total_supply, total_reserve = %total_reserve, "Updating reserves");
    chain.submit_write(proxy, calldata).await?;

    Ok(reserve.total_token.to_string())
}

/// Sum of `totalSupply()` at the finalized block over every configured chain.
async fn total_supply(runtime: &Runtime) -> Result<U256, WorkflowError> {
    let mut total = U256::ZERO;

    for index in 0..runtime.config().evms.len() {
        let chain = runtime.chain(index)?;
        let token = EvmConfig::require(chain.config().token_address, "tokenAddress")?;
        let supply = chain
            .call_view(token, &IERC20::totalSupplyCall {}, BlockTag::Finalized)
            .await?
            ._0;

        tracing::debug!(chain = chain.network().name, supply = %supply, "Chain total supply");
        total = total.saturating_add(supply);
    }

    Ok(total)
}
