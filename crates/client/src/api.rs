//! The inventory API as seen by the client.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use pantry_core::{FoodItemId, HouseholdId, LocationId};
use pantry_inventory::{FoodItemDetails, FoodItemUpdate, InventoryRow, TransactionIntent};

use crate::error::ClientError;

/// The persisted transaction as echoed back by the API.
pub type TransactionRecord = serde_json::Value;

/// Which slice of the household inventory to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryQuery {
    pub household_id: HouseholdId,
    pub location_id: Option<LocationId>,
    pub search: Option<String>,
}

impl InventoryQuery {
    pub fn household(household_id: HouseholdId) -> Self {
        Self {
            household_id,
            location_id: None,
            search: None,
        }
    }

    pub fn at_location(mut self, location_id: LocationId) -> Self {
        self.location_id = Some(location_id);
        self
    }

    pub fn matching(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn path(&self) -> String {
        match self.location_id {
            Some(location) => format!(
                "/api/transactions/inventory/{}/location/{}",
                self.household_id, location
            ),
            None => format!("/api/transactions/inventory/{}", self.household_id),
        }
    }

    /// Search term to send, if any (trimmed, never empty).
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Body of the latest-expiration endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestExpiration {
    #[serde(default)]
    pub expiration_date: Option<String>,
}

impl LatestExpiration {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            expiration_date: Some(date.format("%Y-%m-%d").to_string()),
        }
    }

    /// The date, accepting ISO dates (optionally with a time part) and RFC 2822
    /// timestamps.
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.expiration_date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
            .or_else(|| DateTime::parse_from_rfc2822(raw).ok().map(|dt| dt.date_naive()));
        if parsed.is_none() {
            tracing::warn!(value = raw, "unrecognized expiration date");
        }
        parsed
    }
}

/// Error body returned by the API on failure.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorPayload {
    pub error: Option<String>,
}

/// Operations the pantry client needs from the inventory API.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Record one transaction. `idempotency_key` lets the server drop a duplicate
    /// delivery of the same intent.
    async fn create_transaction(
        &self,
        intent: &TransactionIntent,
        idempotency_key: Option<&str>,
    ) -> Result<TransactionRecord, ClientError>;

    async fn update_food_item(&self, food_item_id: FoodItemId, update: &FoodItemUpdate) -> Result<(), ClientError>;

    /// Hide the item from the inventory; its history is kept.
    async fn archive_food_item(&self, food_item_id: FoodItemId) -> Result<(), ClientError>;

    async fn food_item_details(&self, food_item_id: FoodItemId) -> Result<FoodItemDetails, ClientError>;

    async fn latest_expiration(&self, food_item_id: FoodItemId) -> Result<Option<NaiveDate>, ClientError>;

    async fn update_latest_expiration(&self, food_item_id: FoodItemId, date: NaiveDate) -> Result<(), ClientError>;

    async fn list_inventory(&self, query: &InventoryQuery) -> Result<Vec<InventoryRow>, ClientError>;
}
