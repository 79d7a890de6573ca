//! A live inventory listing that re-fetches after completed submissions.

use std::sync::Arc;

use pantry_events::{EventBus, PantryEvent, Subscription};
use pantry_inventory::InventoryRow;

use crate::api::{InventoryApi, InventoryQuery};
use crate::error::ClientError;

/// Rows for one [`InventoryQuery`], kept fresh by listening for
/// [`PantryEvent::TransactionCompleted`].
///
/// The feed subscribes before its first load, so a submission that finishes while the
/// load is in flight still triggers a refresh. Dropping the feed unsubscribes it.
pub struct InventoryFeed<A: ?Sized> {
    api: Arc<A>,
    query: InventoryQuery,
    rows: Vec<InventoryRow>,
    subscription: Subscription<PantryEvent>,
}

impl<A> InventoryFeed<A>
where
    A: InventoryApi + ?Sized,
{
    pub async fn open<B>(api: Arc<A>, bus: &B, query: InventoryQuery) -> Result<Self, ClientError>
    where
        B: EventBus<PantryEvent> + ?Sized,
    {
        let subscription = bus.subscribe();
        let rows = api.list_inventory(&query).await?;
        Ok(Self {
            api,
            query,
            rows,
            subscription,
        })
    }

    pub fn rows(&self) -> &[InventoryRow] {
        &self.rows
    }

    pub fn query(&self) -> &InventoryQuery {
        &self.query
    }

    /// Switch to a different slice of the inventory and load it.
    pub async fn set_query(&mut self, query: InventoryQuery) -> Result<(), ClientError> {
        self.query = query;
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.rows = self.api.list_inventory(&self.query).await?;
        tracing::debug!(rows = self.rows.len(), path = %self.query.path(), "inventory refreshed");
        Ok(())
    }

    /// Refresh if any submission completed since the last poll. Returns whether a
    /// refresh happened. Several pending notifications cause a single refresh.
    pub async fn poll(&mut self) -> Result<bool, ClientError> {
        let mut pending = false;
        while let Ok(event) = self.subscription.try_recv() {
            match event {
                PantryEvent::TransactionCompleted(done) => {
                    tracing::trace!(submission_id = %done.submission_id, "inventory change observed");
                    pending = true;
                }
            }
        }

        if pending {
            self.refresh().await?;
        }
        Ok(pending)
    }
}
