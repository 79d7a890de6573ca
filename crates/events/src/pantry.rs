//! Notifications emitted by the pantry client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pantry_core::{FoodItemId, SubmissionId};

use crate::event::Event;

/// Emitted once per submission after at least one inventory transaction was
/// acknowledged by the API. Inventory views refresh on receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCompleted {
    pub submission_id: SubmissionId,
    pub food_item_id: FoodItemId,
    /// Number of transactions the API acknowledged in this submission.
    pub transactions: usize,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PantryEvent {
    TransactionCompleted(TransactionCompleted),
}

impl Event for PantryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PantryEvent::TransactionCompleted(_) => "inventory.transaction.completed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PantryEvent::TransactionCompleted(e) => e.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventBus, InMemoryEventBus};

    #[test]
    fn transaction_completed_flows_through_the_bus() {
        let bus = InMemoryEventBus::<PantryEvent>::new();
        let sub = bus.subscribe();
        let occurred_at = Utc::now();

        let event = PantryEvent::TransactionCompleted(TransactionCompleted {
            submission_id: SubmissionId::new(),
            food_item_id: FoodItemId::new(3),
            transactions: 2,
            occurred_at,
        });
        bus.publish(event.clone()).unwrap();

        let received = sub.try_recv().unwrap();
        assert_eq!(received, event);
        assert_eq!(received.event_type(), "inventory.transaction.completed");
        assert_eq!(received.occurred_at(), occurred_at);
    }

    #[test]
    fn event_serializes_with_variant_tag() {
        let event = PantryEvent::TransactionCompleted(TransactionCompleted {
            submission_id: SubmissionId::new(),
            food_item_id: FoodItemId::new(9),
            transactions: 1,
            occurred_at: Utc::now(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["TransactionCompleted"]["food_item_id"], 9);
    }
}
