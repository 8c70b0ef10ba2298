//! Capability wiring for workflow runs.

use std::collections::HashMap;
use std::sync::Arc;

use chainflow_tools::evm::lookup_network;
use chainflow_tools::{
    EvmClient, GatewayReportWriter, HttpClient, JsonRpcEvmClient, Notifier, ReportWriter,
    ReqwestHttpClient, TelegramNotifier,
};

use crate::chain::ChainHandle;
use crate::config::{RunnerSettings, WorkflowConfig};
use crate::error::WorkflowError;

/// Immutable bundle of configuration and capabilities shared by every run.
pub struct Runtime {
    config: WorkflowConfig,
    http: Arc<dyn HttpClient>,
    evm_clients: HashMap<String, Arc<dyn EvmClient>>,
    reports: Option<Arc<dyn ReportWriter>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Runtime {
    /// Create a runtime with only the HTTP capability attached.
    pub fn new(config: WorkflowConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http,
            evm_clients: HashMap::new(),
            reports: None,
            notifier: None,
        }
    }

    /// Build every capability the config describes.
    pub fn connect(config: WorkflowConfig, settings: &RunnerSettings) -> Result<Self, WorkflowError> {
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new(settings.http_timeout));
        let mut runtime = Self::new(config.clone(), http.clone());

        for evm in &config.evms {
            let network = lookup_network(&evm.chain_selector_name)?;
            tracing::debug!(
                chain = network.name,
                chain_id = network.chain_id,
                selector = network.chain_selector,
                "EVM client configured"
            );
            runtime = runtime.with_evm_client(
                &evm.chain_selector_name,
                Arc::new(JsonRpcEvmClient::new(http.clone(), &evm.rpc_url, network)),
            );
        }

        if let Some(ref url) = config.report_gateway_url {
            runtime = runtime.with_report_writer(Arc::new(GatewayReportWriter::new(http.clone(), url)));
        }

        if let Some(ref tg) = config.telegram {
            runtime = runtime.with_notifier(Arc::new(TelegramNotifier::new(
                http.clone(),
                &tg.bot_token,
                &tg.chat_id,
            )));
        }

        Ok(runtime)
    }

    /// Attach an EVM client for a chain selector name.
    pub fn with_evm_client(mut self, chain_selector_name: &str, client: Arc<dyn EvmClient>) -> Self {
        self.evm_clients.insert(chain_selector_name.to_string(), client);
        self
    }

    /// Attach the report writer used for writes.
    pub fn with_report_writer(mut self, writer: Arc<dyn ReportWriter>) -> Self {
        self.reports = Some(writer);
        self
    }

    /// Attach a notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn http(&self) -> &dyn HttpClient {
        self.http.as_ref()
    }

    /// Handle for the `index`-th configured chain.
    pub fn chain(&self, index: usize) -> Result<ChainHandle<'_>, WorkflowError> {
        let evm = self.config.evms.get(index).ok_or_else(|| {
            WorkflowError::Config(format!("no chain configured at index {}", index))
        })?;
        let network = lookup_network(&evm.chain_selector_name)?;
        let client = self.evm_clients.get(&evm.chain_selector_name).ok_or_else(|| {
            WorkflowError::Config(format!(
                "no EVM client for chain selector name: {}",
                evm.chain_selector_name
            ))
        })?;

        Ok(ChainHandle::new(evm, network, &**client, self.reports.as_deref()))
    }

    /// Handle for the first configured chain.
    pub fn primary_chain(&self) -> Result<ChainHandle<'_>, WorkflowError> {
        self.chain(0)
    }

    /// Send a notification; failures are logged and swallowed.
    pub async fn notify(&self, text: &str) {
        let Some(ref notifier) = self.notifier else {
            tracing::debug!("No notifier configured, skipping notification");
            return;
        };

        match notifier.notify(text).await {
            Ok(()) => tracing::info!("Notification sent"),
            Err(e) => tracing::warn!(error = %e, "Failed to send notification"),
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("chains", &self.evm_clients.keys().collect::<Vec<_>>())
            .field("reports", &self.reports.is_some())
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}
