//! In-memory capabilities for pipeline tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

use chainflow_tools::{
    BlockTag, CallMsg, EvmClient, HttpClient, HttpRequest, HttpResponse, Notifier, ReportRequest,
    ReportWriter, ToolError, WriteResult,
};
use chainflow_worker::{create_default_registry, Pipeline, Runtime, WorkflowConfig};

pub const CHAIN: &str = "ethereum-testnet-sepolia";
pub const USER: &str = "0x0DBA585a86bb828708b14d2F83784564Ae03a5d0";

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

/// HTTP fake answering by exact URL; unknown URLs get a 404.
#[derive(Default)]
pub struct FakeHttp {
    routes: Mutex<HashMap<String, (u16, Vec<u8>)>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn route(self, url: &str, status: u16, body: serde_json::Value) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_string().into_bytes()));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ToolError> {
        self.requests.lock().unwrap().push(request.url.clone());
        let (status_code, body) = self
            .routes
            .lock()
            .unwrap()
            .get(&request.url)
            .cloned()
            .unwrap_or((404, Vec::new()));
        Ok(HttpResponse { status_code, body })
    }
}

/// EVM fake answering view calls by `(contract, selector)`.
#[derive(Default)]
pub struct FakeEvm {
    responses: Mutex<HashMap<(Address, [u8; 4]), Vec<u8>>>,
    balances: Mutex<HashMap<Address, U256>>,
    pub calls: Mutex<Vec<(CallMsg, BlockTag)>>,
}

impl FakeEvm {
    pub fn respond(self, to: Address, selector: [u8; 4], data: Vec<u8>) -> Self {
        self.responses.lock().unwrap().insert((to, selector), data);
        self
    }

    pub fn balance(self, account: Address, wei: U256) -> Self {
        self.balances.lock().unwrap().insert(account, wei);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EvmClient for FakeEvm {
    async fn call_contract(&self, msg: &CallMsg, block: BlockTag) -> Result<Bytes, ToolError> {
        self.calls.lock().unwrap().push((msg.clone(), block));

        let mut selector = [0u8; 4];
        selector.copy_from_slice(&msg.data[..4]);

        self.responses
            .lock()
            .unwrap()
            .get(&(msg.to, selector))
            .cloned()
            .map(Bytes::from)
            .ok_or_else(|| ToolError::Rpc {
                code: -32000,
                message: "execution reverted".to_string(),
            })
    }

    async fn get_balance(&self, account: Address, _block: BlockTag) -> Result<U256, ToolError> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&account)
            .copied()
            .unwrap_or_default())
    }
}

/// Report writer returning a fixed result.
pub struct FakeReports {
    result: WriteResult,
    pub requests: Mutex<Vec<ReportRequest>>,
}

impl FakeReports {
    pub fn returning(result: WriteResult) -> Self {
        Self {
            result,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::returning(WriteResult::success(B256::repeat_byte(0xab)))
    }

    pub fn writes(&self) -> Vec<ReportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportWriter for FakeReports {
    async fn write_report(&self, request: &ReportRequest) -> Result<WriteResult, ToolError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.result.clone())
    }
}

/// Notifier recording messages, optionally failing every call.
#[derive(Default)]
pub struct FakeNotifier {
    pub fail: bool,
    pub messages: Mutex<Vec<String>>,
}

impl FakeNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, text: &str) -> Result<(), ToolError> {
        self.messages.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(ToolError::Notification("chat not found".to_string()));
        }
        Ok(())
    }
}

/// Capabilities shared between the pipeline and test assertions.
pub struct Harness {
    pub http: Arc<FakeHttp>,
    pub evm: Arc<FakeEvm>,
    pub reports: Arc<FakeReports>,
    pub notifier: Arc<FakeNotifier>,
    pub runtime: Arc<Runtime>,
    pub pipeline: Pipeline,
}

impl Harness {
    pub fn new(
        config: serde_json::Value,
        http: FakeHttp,
        evm: FakeEvm,
        reports: FakeReports,
        notifier: FakeNotifier,
    ) -> Self {
        let config: WorkflowConfig = serde_json::from_value(config).unwrap();
        config.validate().unwrap();

        let http = Arc::new(http);
        let evm = Arc::new(evm);
        let reports = Arc::new(reports);
        let notifier = Arc::new(notifier);

        let mut runtime = Runtime::new(config.clone(), http.clone())
            .with_report_writer(reports.clone())
            .with_notifier(notifier.clone());
        for chain in &config.evms {
            runtime = runtime.with_evm_client(&chain.chain_selector_name, evm.clone());
        }

        let runtime = Arc::new(runtime);
        Self {
            http,
            evm,
            reports,
            notifier,
            pipeline: Pipeline::new(create_default_registry(), runtime.clone()),
            runtime,
        }
    }
}
