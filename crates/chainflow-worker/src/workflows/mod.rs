//! Built-in workflows.
//!
//! - `price`: fetch one Pyth price and announce it
//! - `poorps`: liquidation bot writing one of two position reports per tick
//! - `onchain-data`: counter or proof-of-reserve on cron, message lookup on logs

pub mod onchain_data;
pub mod poorps;
pub mod price;
pub mod pyth;

pub use onchain_data::OnchainDataWorkflow;
pub use poorps::{PoorpsWorkflow, PositionAction};
pub use price::PriceWorkflow;
