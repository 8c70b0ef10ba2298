//! Read-only inspection commands against in-memory capabilities.

mod common;

use alloy_primitives::{aliases::U248, Address, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use serde_json::json;

use chainflow_tools::abi::{strategy_hash, AquaStrategy, IAqua, IAquaApp, IERC20};
use chainflow_tools::BlockTag;
use chainflow_worker::inspect::{self, NamedAddress};
use chainflow_worker::WorkflowError;

use common::*;

const APP: u8 = 0x48;
const AQUA: u8 = 0x49;
const WETH: u8 = 0x7b;
const USDC: u8 = 0x1c;

fn config() -> serde_json::Value {
    json!({
        "schedule": "0 */10 * * * *",
        "evms": [{
            "chainSelectorName": CHAIN,
            "rpcUrl": "http://localhost:8545",
            "gasLimit": "500000",
            "senderAddress": USER
        }]
    })
}

fn harness(evm: FakeEvm) -> Harness {
    Harness::new(
        config(),
        FakeHttp::default(),
        evm,
        FakeReports::succeeding(),
        FakeNotifier::default(),
    )
}

fn strategy() -> AquaStrategy {
    AquaStrategy {
        maker: addr(0x95),
        token0: addr(WETH),
        token1: addr(USDC),
        feeBps: U256::ZERO,
        salt: B256::with_last_byte(0x13),
    }
}

/// Aqua fake keyed by selector, so both raw reads get the same answer.
fn docked_aqua() -> FakeEvm {
    FakeEvm::default()
        .respond(addr(APP), IAquaApp::AQUACall::SELECTOR, (addr(AQUA),).abi_encode_params())
        .respond(
            addr(AQUA),
            IAqua::rawBalancesCall::SELECTOR,
            IAqua::rawBalancesCall::abi_encode_returns(&(U248::from(5_000u64), 2u8)),
        )
        .respond(
            addr(AQUA),
            IAqua::safeBalancesCall::SELECTOR,
            (U256::from(5_000u64), U256::from(12u64)).abi_encode_params(),
        )
}

#[tokio::test]
async fn test_aqua_state_reads_balances_under_strategy_hash() {
    let h = harness(docked_aqua());
    let strategy = strategy();

    let state = inspect::aqua_state(&h.runtime, addr(APP), None, &strategy)
        .await
        .unwrap();

    assert_eq!(state.aqua, addr(AQUA));
    assert_eq!(state.strategy_hash, strategy_hash(&strategy));
    assert_eq!(state.raw.len(), 2);
    assert_eq!(state.raw[0].token, addr(WETH));
    assert_eq!(state.raw[1].token, addr(USDC));
    assert_eq!(state.raw[0].balance, U256::from(5_000u64));
    assert_eq!(state.raw[0].tokens_count, 2);
    assert_eq!(state.safe, (U256::from(5_000u64), U256::from(12u64)));

    let calls = h.evm.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 4);
    assert_eq!(
        calls[1].0.data.to_vec(),
        IAqua::rawBalancesCall {
            maker: strategy.maker,
            app: addr(APP),
            strategyHash: strategy_hash(&strategy),
            token: addr(WETH),
        }
        .abi_encode()
    );
    assert_eq!(
        calls[3].0.data.to_vec(),
        IAqua::safeBalancesCall {
            maker: strategy.maker,
            app: addr(APP),
            strategyHash: strategy_hash(&strategy),
            token0: addr(WETH),
            token1: addr(USDC),
        }
        .abi_encode()
    );
    assert!(calls.iter().all(|(_, block)| *block == BlockTag::Latest));
}

#[tokio::test]
async fn test_aqua_state_with_explicit_contract_skips_app_lookup() {
    let h = harness(docked_aqua());

    inspect::aqua_state(&h.runtime, addr(APP), Some(addr(AQUA)), &strategy())
        .await
        .unwrap();

    let calls = h.evm.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|(msg, _)| msg.to == addr(AQUA)));
}

#[tokio::test]
async fn test_aqua_state_without_aqua_contract() {
    let h = harness(FakeEvm::default().respond(
        addr(APP),
        IAquaApp::AQUACall::SELECTOR,
        (Address::ZERO,).abi_encode_params(),
    ));

    let err = inspect::aqua_state(&h.runtime, addr(APP), None, &strategy())
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Data(_)));
    assert_eq!(h.evm.call_count(), 1);
}

#[tokio::test]
async fn test_balances_reads_native_and_tokens() {
    let account = addr(0x0d);
    let h = harness(
        FakeEvm::default()
            .balance(account, U256::from(1_500_000_000_000_000_000u128))
            .respond(
                addr(USDC),
                IERC20::balanceOfCall::SELECTOR,
                (U256::from(42u64),).abi_encode_params(),
            ),
    );

    let accounts = vec![NamedAddress {
        name: "maker".to_string(),
        address: account,
    }];
    let tokens = vec![NamedAddress {
        name: "USDC".to_string(),
        address: addr(USDC),
    }];

    let balances = inspect::balances(&h.runtime, &accounts, &tokens).await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].tokens[0].raw, U256::from(42u64));
    assert!(balances[0].to_string().contains("native: 1.5 ETH"));
}
