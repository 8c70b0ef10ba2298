//! Read-only inspection: operator balances and Aqua strategy state.

use alloy_primitives::{hex, Address, B256, U256};

use chainflow_tools::abi::{strategy_hash, AquaStrategy, IAqua, IAquaApp, IERC20};
use chainflow_tools::BlockTag;

use crate::error::WorkflowError;
use crate::runtime::Runtime;

/// `NAME=0x...` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedAddress {
    pub name: String,
    pub address: Address,
}

impl std::str::FromStr for NamedAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, address) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=0xADDRESS, got '{s}'"))?;
        let address = address
            .trim()
            .parse::<Address>()
            .map_err(|e| format!("invalid address for {}: {}", name, e))?;
        Ok(Self {
            name: name.trim().to_string(),
            address,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    pub symbol: String,
    pub raw: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalances {
    pub name: String,
    pub address: Address,
    pub native_wei: U256,
    pub tokens: Vec<TokenBalance>,
}

impl std::fmt::Display for AccountBalances {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({})", self.name, self.address)?;
        write!(f, "  native: {} ETH", format_ether(self.native_wei))?;
        for token in &self.tokens {
            write!(f, "\n  {}: {}", token.symbol, token.raw)?;
        }
        Ok(())
    }
}

/// Native and ERC-20 balances of each account on the first configured chain.
pub async fn balances(
    runtime: &Runtime,
    accounts: &[NamedAddress],
    tokens: &[NamedAddress],
) -> Result<Vec<AccountBalances>, WorkflowError> {
    let chain = runtime.primary_chain()?;
    let mut out = Vec::with_capacity(accounts.len());

    for account in accounts {
        let native_wei = chain.native_balance(account.address, BlockTag::Latest).await?;

        let mut token_balances = Vec::with_capacity(tokens.len());
        for token in tokens {
            let raw = chain
                .call_view(
                    token.address,
                    &IERC20::balanceOfCall { account: account.address },
                    BlockTag::Latest,
                )
                .await?
                ._0;
            token_balances.push(TokenBalance {
                symbol: token.name.clone(),
                raw,
            });
        }

        tracing::debug!(account = %account.name, native = %native_wei, "Balances read");
        out.push(AccountBalances {
            name: account.name.clone(),
            address: account.address,
            native_wei,
            tokens: token_balances,
        });
    }

    Ok(out)
}

/// Balance Aqua holds for one token of a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBalance {
    pub token: Address,
    pub balance: U256,
    pub tokens_count: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AquaState {
    pub aqua: Address,
    pub strategy_hash: B256,
    pub raw: Vec<RawBalance>,
    pub safe: (U256, U256),
}

impl std::fmt::Display for AquaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Aqua: {}", self.aqua)?;
        writeln!(f, "  strategy hash: {}", hex::encode_prefixed(self.strategy_hash))?;
        for raw in &self.raw {
            writeln!(
                f,
                "  raw {}: {} (tokens: {})",
                raw.token, raw.balance, raw.tokens_count
            )?;
        }
        write!(f, "  safe: {} / {}", self.safe.0, self.safe.1)
    }
}

/// Aqua balances of `strategy` docked by `app` on the first configured chain.
///
/// The Aqua contract is read from the app's `AQUA()` unless `aqua` is given.
pub async fn aqua_state(
    runtime: &Runtime,
    app: Address,
    aqua: Option<Address>,
    strategy: &AquaStrategy,
) -> Result<AquaState, WorkflowError> {
    let chain = runtime.primary_chain()?;

    let aqua = match aqua {
        Some(aqua) => aqua,
        None => {
            chain
                .call_view(app, &IAquaApp::AQUACall {}, BlockTag::Latest)
                .await?
                ._0
        }
    };
    if aqua.is_zero() {
        return Err(WorkflowError::Data(format!("app {} reports no Aqua contract", app)));
    }

    let hash = strategy_hash(strategy);
    tracing::debug!(aqua = %aqua, strategy_hash = %hex::encode_prefixed(hash), "Reading Aqua state");

    let mut raw = Vec::with_capacity(2);
    for token in [strategy.token0, strategy.token1] {
        let balances = chain
            .call_view(
                aqua,
                &IAqua::rawBalancesCall {
                    maker: strategy.maker,
                    app,
                    strategyHash: hash,
                    token,
                },
                BlockTag::Latest,
            )
            .await?;
        raw.push(RawBalance {
            token,
            balance: U256::from(balances.balance),
            tokens_count: balances.tokensCount,
        });
    }

    let safe = chain
        .call_view(
            aqua,
            &IAqua::safeBalancesCall {
                maker: strategy.maker,
                app,
                strategyHash: hash,
                token0: strategy.token0,
                token1: strategy.token1,
            },
            BlockTag::Latest,
        )
        .await?;

    Ok(AquaState {
        aqua,
        strategy_hash: hash,
        raw,
        safe: (safe.balance0, safe.balance1),
    })
}

/// Wei as a decimal ether string without trailing zeros.
pub fn format_ether(wei: U256) -> String {
    let unit = U256::from(10u64).pow(U256::from(18u64));
    let whole = wei / unit;
    let frac = wei % unit;

    if frac.is_zero() {
        return whole.to_string();
    }

    let frac = format!("{:0>18}", frac.to_string());
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
