//! Chainflow binary.
//!
//! Runs one workflow for one trigger, or serves a workflow on its cron schedule.

use std::path::PathBuf;
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, B256, U256};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chainflow_tools::abi::AquaStrategy;
use chainflow_worker::config::LogFormat;
use chainflow_worker::inspect::{self, NamedAddress};
use chainflow_worker::{
    create_default_registry, scheduler, CronPayload, EvmLog, Pipeline, RunnerSettings, Runtime,
    Trigger, WorkflowConfig,
};

#[derive(Parser)]
#[command(name = "chainflow")]
#[command(version, about = "Chainflow workflow runner", long_about = None)]
struct Cli {
    /// Workflow config file (.json, .yaml or .yml)
    #[arg(short, long, global = true, env = "CHAINFLOW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one cron tick of a workflow now
    Run {
        /// Workflow name (price, poorps, onchain-data)
        workflow: String,
    },

    /// Run a workflow for one chain log event
    Log {
        workflow: String,

        /// Emitting contract address
        #[arg(long)]
        address: Address,

        /// Log topic (32-byte hex), repeat in order
        #[arg(long = "topic", value_name = "HEX")]
        topics: Vec<B256>,

        /// Log data (hex)
        #[arg(long, default_value = "0x")]
        data: Bytes,

        #[arg(long)]
        tx_hash: Option<B256>,

        #[arg(long)]
        block_number: Option<u64>,
    },

    /// Run a workflow on every tick of its configured schedule
    Serve {
        workflow: String,
    },

    /// Print native and ERC-20 balances on the first configured chain
    Balances {
        /// Account to inspect (format: NAME=0xADDRESS), can be repeated
        #[arg(long = "account", value_name = "NAME=0xADDRESS", required = true)]
        accounts: Vec<NamedAddress>,

        /// ERC-20 token to read (format: SYMBOL=0xADDRESS), can be repeated
        #[arg(long = "token", value_name = "SYMBOL=0xADDRESS")]
        tokens: Vec<NamedAddress>,
    },

    /// Print Aqua raw and safe balances of a docked strategy
    AquaState {
        /// App contract the strategy is docked with
        #[arg(long)]
        app: Address,

        /// Aqua contract, read from the app's AQUA() when omitted
        #[arg(long)]
        aqua: Option<Address>,

        #[arg(long)]
        maker: Address,

        #[arg(long)]
        token0: Address,

        #[arg(long)]
        token1: Address,

        #[arg(long, default_value = "0")]
        fee_bps: U256,

        /// Strategy salt (32-byte hex)
        #[arg(long)]
        salt: B256,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = RunnerSettings::from_env();
    init_tracing(settings.log_format);

    let cli = Cli::parse();

    let path = cli
        .config
        .or_else(|| settings.config_path.clone())
        .context("No workflow config given: pass --config or set CHAINFLOW_CONFIG")?;

    let mut config = WorkflowConfig::load(&path)
        .with_context(|| format!("Failed to load workflow config {}", path.display()))?;
    config.apply_overrides(&settings);

    tracing::info!(
        config = %path.display(),
        chains = config.evms.len(),
        schedule = %config.schedule,
        "Workflow configuration loaded"
    );

    let schedule = config.schedule.clone();
    let runtime = Arc::new(Runtime::connect(config, &settings)?);
    let pipeline = Pipeline::new(create_default_registry(), runtime.clone());

    match cli.command {
        Commands::Run { workflow } => {
            let output = pipeline
                .run(&workflow, Trigger::Cron(CronPayload::at(Utc::now())))
                .await?;
            println!("{}", output);
        }
        Commands::Log {
            workflow,
            address,
            topics,
            data,
            tx_hash,
            block_number,
        } => {
            let log = EvmLog {
                address,
                topics,
                data,
                tx_hash,
                block_number,
            };
            let output = pipeline.run(&workflow, Trigger::Log(log)).await?;
            println!("{}", output);
        }
        Commands::Serve { workflow } => {
            tracing::info!(workflow = %workflow, "Starting Chainflow scheduler");

            // Handle shutdown signals
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to install CTRL+C handler");
                    std::future::pending::<()>().await;
                }
                tracing::info!("Shutdown signal received");
            };

            tokio::select! {
                result = scheduler::serve(&pipeline, &workflow, &schedule) => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Scheduler error");
                        return Err(e.into());
                    }
                }
                _ = shutdown => {
                    tracing::info!("Shutting down scheduler");
                }
            }

            tracing::info!("Scheduler stopped");
        }
        Commands::Balances { accounts, tokens } => {
            for account in inspect::balances(&runtime, &accounts, &tokens).await? {
                println!("{}", account);
            }
        }
        Commands::AquaState {
            app,
            aqua,
            maker,
            token0,
            token1,
            fee_bps,
            salt,
        } => {
            let strategy = AquaStrategy {
                maker,
                token0,
                token1,
                feeBps: fee_bps,
                salt,
            };
            let state = inspect::aqua_state(&runtime, app, aqua, &strategy).await?;
            println!("{}", state);
        }
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,chainflow_worker=debug".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}
