//! Wiring of the client pieces for a running application.

use std::sync::Arc;

use anyhow::Context as _;

use pantry_core::HouseholdId;
use pantry_events::{InMemoryEventBus, PantryEvent};
use pantry_inventory::InventoryRow;

use crate::api::{InventoryApi, InventoryQuery};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::feed::InventoryFeed;
use crate::http::HttpInventoryApi;
use crate::session::EditSession;
use crate::submit::IntentSubmitter;

pub type SharedApi = Arc<dyn InventoryApi>;
pub type SharedBus = Arc<InMemoryEventBus<PantryEvent>>;

/// Everything a front end needs: the API client, the event bus, and a submitter bound
/// to both.
#[derive(Clone)]
pub struct ClientContext {
    config: ClientConfig,
    api: SharedApi,
    bus: SharedBus,
    submitter: IntentSubmitter<dyn InventoryApi, InMemoryEventBus<PantryEvent>>,
}

impl ClientContext {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let http = HttpInventoryApi::new(config.clone()).context("failed to build HTTP client")?;
        Ok(Self::with_api(config, Arc::new(http)))
    }

    /// Initialize logging, read configuration from the environment and connect.
    pub fn from_env() -> anyhow::Result<Self> {
        pantry_observability::init();
        let config = ClientConfig::from_env();
        tracing::info!(api_url = %config.api_url, "pantry client starting");
        Self::new(config)
    }

    /// Use `api` instead of the HTTP client.
    pub fn with_api(config: ClientConfig, api: SharedApi) -> Self {
        let bus: SharedBus = Arc::new(InMemoryEventBus::new());
        let submitter = IntentSubmitter::new(api.clone(), bus.clone());
        Self {
            config,
            api,
            bus,
            submitter,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &SharedApi {
        &self.api
    }

    pub fn bus(&self) -> &SharedBus {
        &self.bus
    }

    pub fn submitter(&self) -> &IntentSubmitter<dyn InventoryApi, InMemoryEventBus<PantryEvent>> {
        &self.submitter
    }

    pub async fn open_session(&self, row: InventoryRow, categories: &[&str]) -> EditSession {
        EditSession::open(self.api.as_ref(), row, categories).await
    }

    pub async fn inventory_feed(
        &self,
        household_id: HouseholdId,
    ) -> Result<InventoryFeed<dyn InventoryApi>, ClientError> {
        InventoryFeed::open(self.api.clone(), self.bus.as_ref(), InventoryQuery::household(household_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_core::{FoodItemId, LocationId, UserId};
    use pantry_inventory::FoodItemDetails;

    use crate::testing::RecordingApi;

    #[tokio::test]
    async fn session_submission_refreshes_feed() {
        let row = {
            let mut row = InventoryRow::new(FoodItemId::new(8), "Oats", Some(LocationId::new(1)));
            row.category = Some("Pantry".to_string());
            row.package_label = Some("Bag".to_string());
            row.qty_per_package = Some(1000.0);
            row.total_qty_in_base_units = Some(500.0);
            row
        };
        let details = FoodItemDetails {
            package_base_unit_amt: Some(1000.0),
            target_level: Some(2000.0),
            ..FoodItemDetails::default()
        };
        let api = Arc::new(RecordingApi::default().with_details(details).with_rows(vec![row.clone()]));
        let ctx = ClientContext::with_api(ClientConfig::default(), api);

        let mut feed = ctx.inventory_feed(pantry_core::HouseholdId::new(1)).await.unwrap();
        let mut session = ctx.open_session(row, &["Pantry"]).await;
        assert_eq!(session.form().quantity, "0.5");

        session.form_mut().quantity = "2".to_string();
        let report = session.submit(Some(UserId::new(1)), ctx.submitter()).await.unwrap();
        assert_eq!(report.acknowledged(), 1);

        assert!(feed.poll().await.unwrap());
    }

    #[test]
    fn http_context_uses_given_config() {
        let ctx = ClientContext::new(ClientConfig::new("http://pantry.local/")).unwrap();
        assert_eq!(ctx.config().api_url, "http://pantry.local");
        assert_eq!(ctx.bus().subscriber_count(), 0);
    }
}
