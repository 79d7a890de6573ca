//! `reqwest` implementation of [`InventoryApi`].

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{RequestBuilder, Response};

use pantry_core::FoodItemId;
use pantry_inventory::{FoodItemDetails, FoodItemUpdate, InventoryRow, TransactionIntent};

use crate::api::{ErrorPayload, InventoryApi, InventoryQuery, LatestExpiration, TransactionRecord};
use crate::config::ClientConfig;
use crate::error::ClientError;

pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// HTTP client for the inventory API.
#[derive(Debug, Clone)]
pub struct HttpInventoryApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpInventoryApi {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder, fallback: &str) -> Result<Response, ClientError> {
        let resp = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorPayload>(&body)
            .ok()
            .and_then(|p| p.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        tracing::warn!(status, %message, "inventory API request failed");
        Err(ClientError::Api(status, message))
    }

    async fn json<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
        resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryApi {
    async fn create_transaction(
        &self,
        intent: &TransactionIntent,
        idempotency_key: Option<&str>,
    ) -> Result<TransactionRecord, ClientError> {
        let mut req = self
            .client
            .post(self.url("/api/transactions/inventory/transaction"))
            .json(intent);
        if let Some(key) = idempotency_key {
            req = req.header(IDEMPOTENCY_HEADER, key);
        }

        let resp = self.send(req, "Failed to create transaction").await?;
        let record = Self::json(resp).await?;
        tracing::info!(
            food_item_id = %intent.food_item_id,
            location_id = %intent.location_id,
            kind = %intent.kind,
            quantity = intent.quantity,
            "inventory transaction created"
        );
        Ok(record)
    }

    async fn update_food_item(&self, food_item_id: FoodItemId, update: &FoodItemUpdate) -> Result<(), ClientError> {
        let req = self
            .client
            .put(self.url(&format!("/api/food-items/{food_item_id}")))
            .json(update);
        // The response body is informational only.
        self.send(req, "Failed to update item metadata").await?;
        Ok(())
    }

    async fn archive_food_item(&self, food_item_id: FoodItemId) -> Result<(), ClientError> {
        let req = self.client.delete(self.url(&format!("/api/food-items/{food_item_id}")));
        self.send(req, "Failed to archive item").await?;
        tracing::info!(%food_item_id, "food item archived");
        Ok(())
    }

    async fn food_item_details(&self, food_item_id: FoodItemId) -> Result<FoodItemDetails, ClientError> {
        let req = self.client.get(self.url(&format!("/api/food-items/{food_item_id}")));
        let resp = self.send(req, "Failed to load item details").await?;
        Self::json(resp).await
    }

    async fn latest_expiration(&self, food_item_id: FoodItemId) -> Result<Option<NaiveDate>, ClientError> {
        let req = self.client.get(self.url(&format!(
            "/api/transactions/food-item/{food_item_id}/latest-expiration"
        )));
        let resp = self.send(req, "Could not fetch expiration date").await?;
        let body: LatestExpiration = Self::json(resp).await?;
        Ok(body.date())
    }

    async fn update_latest_expiration(&self, food_item_id: FoodItemId, date: NaiveDate) -> Result<(), ClientError> {
        let req = self
            .client
            .put(self.url(&format!(
                "/api/transactions/food-item/{food_item_id}/latest-expiration"
            )))
            .json(&LatestExpiration::from_date(date));
        self.send(req, "Could not update expiration date.").await?;
        Ok(())
    }

    async fn list_inventory(&self, query: &InventoryQuery) -> Result<Vec<InventoryRow>, ClientError> {
        let mut req = self.client.get(self.url(&query.path()));
        if let Some(search) = query.search_term() {
            req = req.query(&[("search", search)]);
        }

        let resp = self.send(req, "Failed to load inventory").await?;
        let body: serde_json::Value = Self::json(resp).await?;
        match body {
            serde_json::Value::Array(_) => {
                serde_json::from_value(body).map_err(|e| ClientError::Parse(e.to_string()))
            }
            _ => {
                tracing::warn!("inventory listing was not an array; treating as empty");
                Ok(Vec::new())
            }
        }
    }
}
