//! Ordered delivery of transaction intents.
//!
//! Intents are sent one at a time, each awaited before the next: relocation must be
//! accepted before the quantity change lands at the new location. The first rejection
//! stops the sequence. Nothing already accepted is rolled back, so a user retry after a
//! partial failure can re-apply steps; every intent carries an idempotency key derived
//! from its submission so a server that honors the key can discard duplicates.

use std::sync::Arc;

use chrono::Utc;

use pantry_core::{FoodItemId, SubmissionId};
use pantry_events::{Event, EventBus, PantryEvent, TransactionCompleted};
use pantry_inventory::TransactionIntent;

use crate::api::{InventoryApi, TransactionRecord};
use crate::error::SubmissionError;

/// What a completed submission produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    pub submission_id: SubmissionId,
    /// Records returned by the API, in submission order.
    pub records: Vec<TransactionRecord>,
}

impl SubmissionReport {
    pub fn acknowledged(&self) -> usize {
        self.records.len()
    }
}

/// Sends intents in order and announces completed submissions on the event bus.
pub struct IntentSubmitter<A: ?Sized, B> {
    api: Arc<A>,
    bus: Arc<B>,
}

impl<A: ?Sized, B> Clone for IntentSubmitter<A, B> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            bus: self.bus.clone(),
        }
    }
}

impl<A, B> IntentSubmitter<A, B>
where
    A: InventoryApi + ?Sized,
    B: EventBus<PantryEvent>,
{
    pub fn new(api: Arc<A>, bus: Arc<B>) -> Self {
        Self { api, bus }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Send `intents` in order under a fresh submission id.
    pub async fn submit(
        &self,
        food_item_id: FoodItemId,
        intents: &[TransactionIntent],
    ) -> Result<SubmissionReport, SubmissionError> {
        self.submit_as(SubmissionId::new(), food_item_id, intents).await
    }

    /// Send `intents` in order under `submission_id`. Reusing the id of a failed
    /// submission reuses its idempotency keys.
    pub async fn submit_as(
        &self,
        submission_id: SubmissionId,
        food_item_id: FoodItemId,
        intents: &[TransactionIntent],
    ) -> Result<SubmissionReport, SubmissionError> {
        let mut records = Vec::with_capacity(intents.len());

        for (index, intent) in intents.iter().enumerate() {
            let key = submission_id.idempotency_key(index);
            match self.api.create_transaction(intent, Some(&key)).await {
                Ok(record) => records.push(record),
                Err(source) => {
                    tracing::error!(
                        %submission_id,
                        %food_item_id,
                        step = index,
                        kind = %intent.kind,
                        error = %source,
                        "submission stopped; earlier transactions are not rolled back"
                    );
                    // Whatever was accepted has changed server state; let views refresh.
                    self.notify(submission_id, food_item_id, records.len());
                    return Err(SubmissionError::Partial {
                        submission_id,
                        acknowledged: records.len(),
                        source,
                    });
                }
            }
        }

        self.notify(submission_id, food_item_id, records.len());
        tracing::info!(%submission_id, %food_item_id, transactions = records.len(), "submission complete");

        Ok(SubmissionReport { submission_id, records })
    }

    fn notify(&self, submission_id: SubmissionId, food_item_id: FoodItemId, transactions: usize) {
        if transactions == 0 {
            return;
        }
        let event = PantryEvent::TransactionCompleted(TransactionCompleted {
            submission_id,
            food_item_id,
            transactions,
            occurred_at: Utc::now(),
        });
        let (event_type, version) = (event.event_type(), event.version());
        match self.bus.publish(event) {
            Ok(()) => tracing::debug!(event_type, version, %submission_id, "event published"),
            Err(e) => tracing::warn!(event_type, version, error = ?e, "failed to publish event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingApi};
    use pantry_core::{LocationId, UserId};
    use pantry_events::InMemoryEventBus;
    use pantry_inventory::{IntentContext, TransactionKind};

    fn intents() -> Vec<TransactionIntent> {
        let ctx = IntentContext::new(FoodItemId::new(1), UserId::new(2));
        vec![
            TransactionIntent::new(TransactionKind::TransferOut, 20.0, LocationId::new(1), ctx),
            TransactionIntent::new(TransactionKind::TransferIn, 20.0, LocationId::new(2), ctx),
            TransactionIntent::new(TransactionKind::Remove, 10.0, LocationId::new(2), ctx),
        ]
    }

    fn submitter(api: RecordingApi) -> (IntentSubmitter<RecordingApi, InMemoryEventBus<PantryEvent>>, Arc<InMemoryEventBus<PantryEvent>>) {
        let bus = Arc::new(InMemoryEventBus::new());
        (IntentSubmitter::new(Arc::new(api), bus.clone()), bus)
    }

    #[tokio::test]
    async fn sends_in_order_with_distinct_idempotency_keys() {
        let (submitter, bus) = submitter(RecordingApi::default());
        let sub = bus.subscribe();
        let submission_id = SubmissionId::new();

        let report = submitter.submit_as(submission_id, FoodItemId::new(1), &intents()).await.unwrap();
        assert_eq!(report.acknowledged(), 3);

        let calls = submitter.api().transactions();
        let kinds: Vec<_> = calls.iter().map(|(i, _)| i.kind).collect();
        assert_eq!(
            kinds,
            vec![TransactionKind::TransferOut, TransactionKind::TransferIn, TransactionKind::Remove]
        );
        let keys: Vec<_> = calls.iter().map(|(_, k)| k.clone().unwrap()).collect();
        assert_eq!(keys[0], submission_id.idempotency_key(0));
        assert_eq!(keys[2], submission_id.idempotency_key(2));

        match sub.try_recv().unwrap() {
            PantryEvent::TransactionCompleted(e) => {
                assert_eq!(e.submission_id, submission_id);
                assert_eq!(e.transactions, 3);
            }
        }
        assert_eq!(sub.drain(), 0);
    }

    #[tokio::test]
    async fn stops_at_first_rejection_without_rollback() {
        let (submitter, bus) = submitter(RecordingApi::default().failing_transaction(1, "Location not found"));
        let sub = bus.subscribe();

        let err = submitter.submit(FoodItemId::new(1), &intents()).await.unwrap_err();
        match &err {
            SubmissionError::Partial { acknowledged, source, .. } => {
                assert_eq!(*acknowledged, 1);
                assert_eq!(source.user_message(), "Location not found");
            }
            other => panic!("expected partial failure, got {other:?}"),
        }

        // Step 3 was never attempted and nothing compensating was sent.
        let calls = submitter.api().calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[1], Call::Transaction(ref i, _) if i.kind == TransactionKind::TransferIn));

        // The accepted transfer still changed server state.
        assert_eq!(sub.drain(), 1);
    }

    #[tokio::test]
    async fn empty_submission_publishes_nothing() {
        let (submitter, bus) = submitter(RecordingApi::default());
        let sub = bus.subscribe();

        let report = submitter.submit(FoodItemId::new(1), &[]).await.unwrap();
        assert_eq!(report.acknowledged(), 0);
        assert_eq!(sub.drain(), 0);
    }
}
