//! In-memory [`InventoryApi`] that records every call.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use pantry_core::FoodItemId;
use pantry_inventory::{FoodItemDetails, FoodItemUpdate, InventoryRow, TransactionIntent};

use crate::api::{InventoryApi, InventoryQuery, TransactionRecord};
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Transaction(TransactionIntent, Option<String>),
    UpdateItem(FoodItemId, FoodItemUpdate),
    Archive(FoodItemId),
    Details(FoodItemId),
    LatestExpiration(FoodItemId),
    UpdateExpiration(FoodItemId, NaiveDate),
    ListInventory(InventoryQuery),
}

#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    details: Option<FoodItemDetails>,
    expiration: Option<NaiveDate>,
    rows: Mutex<Vec<InventoryRow>>,
    fail_transaction_at: Option<(usize, String)>,
    fail_update_item: Option<String>,
    fail_update_expiration: Option<String>,
}

impl RecordingApi {
    pub fn with_details(mut self, details: FoodItemDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_expiration(mut self, date: NaiveDate) -> Self {
        self.expiration = Some(date);
        self
    }

    pub fn with_rows(self, rows: Vec<InventoryRow>) -> Self {
        self.set_rows(rows);
        self
    }

    /// Reject the `index`-th transaction (0-based) with `message`.
    pub fn failing_transaction(mut self, index: usize, message: &str) -> Self {
        self.fail_transaction_at = Some((index, message.to_string()));
        self
    }

    pub fn failing_item_update(mut self, message: &str) -> Self {
        self.fail_update_item = Some(message.to_string());
        self
    }

    pub fn failing_expiration_update(mut self, message: &str) -> Self {
        self.fail_update_expiration = Some(message.to_string());
        self
    }

    pub fn set_rows(&self, rows: Vec<InventoryRow>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn transactions(&self) -> Vec<(TransactionIntent, Option<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Transaction(intent, key) => Some((intent, key)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl InventoryApi for RecordingApi {
    async fn create_transaction(
        &self,
        intent: &TransactionIntent,
        idempotency_key: Option<&str>,
    ) -> Result<TransactionRecord, ClientError> {
        let index = self.transactions().len();
        self.record(Call::Transaction(intent.clone(), idempotency_key.map(str::to_string)));
        if let Some((fail_at, message)) = &self.fail_transaction_at {
            if *fail_at == index {
                return Err(ClientError::Api(400, message.clone()));
            }
        }
        Ok(serde_json::json!({ "transaction_id": index + 1 }))
    }

    async fn update_food_item(&self, food_item_id: FoodItemId, update: &FoodItemUpdate) -> Result<(), ClientError> {
        self.record(Call::UpdateItem(food_item_id, update.clone()));
        match &self.fail_update_item {
            Some(message) => Err(ClientError::Api(500, message.clone())),
            None => Ok(()),
        }
    }

    async fn archive_food_item(&self, food_item_id: FoodItemId) -> Result<(), ClientError> {
        self.record(Call::Archive(food_item_id));
        Ok(())
    }

    async fn food_item_details(&self, food_item_id: FoodItemId) -> Result<FoodItemDetails, ClientError> {
        self.record(Call::Details(food_item_id));
        self.details
            .clone()
            .ok_or_else(|| ClientError::Api(404, "Food item not found".to_string()))
    }

    async fn latest_expiration(&self, food_item_id: FoodItemId) -> Result<Option<NaiveDate>, ClientError> {
        self.record(Call::LatestExpiration(food_item_id));
        Ok(self.expiration)
    }

    async fn update_latest_expiration(&self, food_item_id: FoodItemId, date: NaiveDate) -> Result<(), ClientError> {
        self.record(Call::UpdateExpiration(food_item_id, date));
        match &self.fail_update_expiration {
            Some(message) => Err(ClientError::Api(500, message.clone())),
            None => Ok(()),
        }
    }

    async fn list_inventory(&self, query: &InventoryQuery) -> Result<Vec<InventoryRow>, ClientError> {
        self.record(Call::ListInventory(query.clone()));
        Ok(self.rows.lock().unwrap().clone())
    }
}
