//! Sending a restock: purchase details first, then the stock transaction.

use pantry_core::{DomainError, SubmissionId, UserId};
use pantry_events::{EventBus, PantryEvent};
use pantry_inventory::{InventoryRow, RestockRequest, plan_restock};

use crate::api::InventoryApi;
use crate::error::SubmissionError;
use crate::session::MISSING_USER;
use crate::submit::{IntentSubmitter, SubmissionReport};

pub async fn submit_restock<A, B>(
    row: &InventoryRow,
    request: &RestockRequest,
    user_id: Option<UserId>,
    submitter: &IntentSubmitter<A, B>,
) -> Result<SubmissionReport, SubmissionError>
where
    A: InventoryApi + ?Sized,
    B: EventBus<PantryEvent>,
{
    submit_restock_as(SubmissionId::new(), row, request, user_id, submitter).await
}

/// Same as [`submit_restock`] under a given submission. Retrying a restock that failed
/// part way with [`SubmissionError::submission_id`] resends its idempotency keys.
pub async fn submit_restock_as<A, B>(
    submission_id: SubmissionId,
    row: &InventoryRow,
    request: &RestockRequest,
    user_id: Option<UserId>,
    submitter: &IntentSubmitter<A, B>,
) -> Result<SubmissionReport, SubmissionError>
where
    A: InventoryApi + ?Sized,
    B: EventBus<PantryEvent>,
{
    let user_id = user_id.ok_or_else(|| DomainError::validation(MISSING_USER))?;
    let plan = plan_restock(row, request, user_id)?;

    if let Some(update) = &plan.metadata {
        submitter
            .api()
            .update_food_item(row.food_item_id, update)
            .await
            .map_err(SubmissionError::Metadata)?;
    }

    let intents: Vec<_> = plan.intent.into_iter().collect();
    if intents.is_empty() {
        tracing::debug!(food_item_id = %row.food_item_id, "restock quantity is zero; no transaction sent");
    }
    submitter.submit_as(submission_id, row.food_item_id, &intents).await
}
