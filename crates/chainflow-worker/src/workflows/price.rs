//! Price notifier: fetch one Pyth price and announce it.

use async_trait::async_trait;

use crate::error::WorkflowError;
use crate::registry::Workflow;
use crate::runtime::Runtime;
use crate::trigger::{CronPayload, TriggerKind};

use super::pyth::fetch_price;

pub struct PriceWorkflow;

#[async_trait]
impl Workflow for PriceWorkflow {
    fn name(&self) -> &'static str {
        "price"
    }

    fn triggers(&self) -> &'static [TriggerKind] {
        &[TriggerKind::Cron]
    }

    async fn on_cron(&self, runtime: &Runtime, _payload: &CronPayload) -> Result<String, WorkflowError> {
        let url = runtime
            .config()
            .url
            .as_deref()
            .ok_or_else(|| WorkflowError::Config("url is not defined in config".to_string()))?;

        let response = fetch_price(runtime.http(), url).await?;

        // Raw mantissa, not scaled by expo.
        let price = match response.first_price() {
            Some(p) => {
                tracing::info!(price = %p.price, conf = %p.conf, expo = p.expo, "Price fetched");
                p.price.clone()
            }
            None => {
                tracing::warn!(url, "Price response has no parsed entries");
                "0".to_string()
            }
        };

        runtime.notify(&format!("Hello from bot! Price is {price}")).await;

        Ok(price)
    }
}
