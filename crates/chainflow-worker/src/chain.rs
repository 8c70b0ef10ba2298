//! Shared read/write helpers for one configured chain.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolCall;

use chainflow_tools::{BlockTag, CallMsg, EvmClient, Network, ReportRequest, ReportWriter};

use crate::config::EvmConfig;
use crate::error::WorkflowError;

/// Chain settings plus the capabilities bound to that chain.
pub struct ChainHandle<'a> {
    config: &'a EvmConfig,
    network: Network,
    client: &'a dyn EvmClient,
    reports: Option<&'a dyn ReportWriter>,
}

impl<'a> ChainHandle<'a> {
    pub fn new(
        config: &'a EvmConfig,
        network: Network,
        client: &'a dyn EvmClient,
        reports: Option<&'a dyn ReportWriter>,
    ) -> Self {
        Self {
            config,
            network,
            client,
            reports,
        }
    }

    pub fn config(&self) -> &'a EvmConfig {
        self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Encode `call`, run it as a view call against `to`, decode the return.
    pub async fn call_view<C: SolCall>(
        &self,
        to: Address,
        call: &C,
        block: BlockTag,
    ) -> Result<C::Return, WorkflowError> {
        let msg = CallMsg::new(to, call.abi_encode());
        let data = self.client.call_contract(&msg, block).await?;

        tracing::debug!(
            chain = self.network.name,
            contract = %to,
            function = C::SIGNATURE,
            bytes = data.len(),
            "Contract read returned"
        );

        C::abi_decode_returns(&data, true).map_err(|e| {
            chainflow_tools::ToolError::Decode(format!("{}: {}", C::SIGNATURE, e)).into()
        })
    }

    /// Native balance of `account`.
    pub async fn native_balance(&self, account: Address, block: BlockTag) -> Result<U256, WorkflowError> {
        Ok(self.client.get_balance(account, block).await?)
    }

    /// Attest `payload`, write it to `receiver`, and wait for a terminal status.
    ///
    /// Returns the transaction hash only for a `SUCCESS` status.
    pub async fn submit_write(&self, receiver: Address, payload: Vec<u8>) -> Result<B256, WorkflowError> {
        let reports = self.reports.ok_or_else(|| {
            WorkflowError::Config("reportGatewayUrl is required for writes".to_string())
        })?;

        let request = ReportRequest::evm(
            self.network.chain_selector,
            receiver,
            payload,
            self.config.gas_limit.clone(),
        );

        let result = reports.write_report(&request).await?;
        let tx_hash = result.into_tx_hash()?;

        tracing::info!(
            chain = self.network.name,
            receiver = %receiver,
            tx_hash = %alloy_primitives::hex::encode_prefixed(tx_hash),
            "Write report transaction succeeded"
        );

        Ok(tx_hash)
    }
}

impl std::fmt::Debug for ChainHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainHandle")
            .field("network", &self.network)
            .field("gas_limit", &self.config.gas_limit)
            .field("can_write", &self.reports.is_some())
            .finish()
    }
}
