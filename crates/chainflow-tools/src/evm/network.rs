//! Chain selector name lookup.

use serde::Serialize;

use crate::error::ToolError;

/// A chain known by its CCIP chain selector name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Network {
    pub name: &'static str,
    pub chain_selector: u64,
    pub chain_id: u64,
    pub is_testnet: bool,
}

const NETWORKS: &[Network] = &[
    Network {
        name: "ethereum-mainnet",
        chain_selector: 5009297550715157269,
        chain_id: 1,
        is_testnet: false,
    },
    Network {
        name: "ethereum-testnet-sepolia",
        chain_selector: 16015286601757825753,
        chain_id: 11155111,
        is_testnet: true,
    },
    Network {
        name: "ethereum-testnet-sepolia-base-1",
        chain_selector: 10344971235874465080,
        chain_id: 84532,
        is_testnet: true,
    },
    Network {
        name: "ethereum-testnet-sepolia-arbitrum-1",
        chain_selector: 3478487238524512106,
        chain_id: 421614,
        is_testnet: true,
    },
    Network {
        name: "avalanche-testnet-fuji",
        chain_selector: 14767482510784806043,
        chain_id: 43113,
        is_testnet: true,
    },
    Network {
        name: "polygon-testnet-amoy",
        chain_selector: 16281711391670634445,
        chain_id: 80002,
        is_testnet: true,
    },
];

/// Resolve a chain selector name.
pub fn lookup_network(chain_selector_name: &str) -> Result<Network, ToolError> {
    NETWORKS
        .iter()
        .find(|n| n.name == chain_selector_name)
        .copied()
        .ok_or_else(|| {
            ToolError::Configuration(format!(
                "Network not found for chain selector name: {}",
                chain_selector_name
            ))
        })
}
