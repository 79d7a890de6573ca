//! An open edit of one inventory item.
//!
//! The session captures the stock snapshot once when it opens, lets the form change
//! freely, and turns the form into API calls on submit. All mutation goes through
//! `&mut self`, so one session can never run two submissions at once.

use chrono::NaiveDate;

use pantry_core::{DomainError, DomainResult, SubmissionId, UserId};
use pantry_events::{EventBus, PantryEvent};
use pantry_inventory::{
    Adjustment, FoodItemDetails, IntentContext, InventoryRow, ItemForm, ReconcileRequest, ReconciliationPlan,
    StockSnapshot, SubmissionMode, TransactionIntent, reconcile,
};

use crate::api::InventoryApi;
use crate::error::{ClientError, SubmissionError};
use crate::submit::{IntentSubmitter, SubmissionReport};

pub const MISSING_USER: &str = "Missing user information. Please log in again to update quantities.";
pub const INVALID_QUANTITY: &str = "Please enter a valid quantity.";
pub const NOTHING_TO_EXPIRE: &str = "No items to expire!";

/// A submission that stopped part way, kept so that resending the same plan reuses
/// its idempotency keys.
#[derive(Debug, Clone, PartialEq)]
struct PendingSubmission {
    submission_id: SubmissionId,
    intents: Vec<TransactionIntent>,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    row: InventoryRow,
    form: ItemForm,
    snapshot: StockSnapshot,
    latest_expiration: Option<NaiveDate>,
    saved_latest_expiration: Option<NaiveDate>,
    pending: Option<PendingSubmission>,
}

impl EditSession {
    /// Build a session from what is already known. `details` is `None` when the full
    /// item record could not be loaded.
    pub fn new(
        row: InventoryRow,
        details: Option<&FoodItemDetails>,
        latest_expiration: Option<NaiveDate>,
        categories: &[&str],
    ) -> Self {
        let (form, snapshot) = match details {
            Some(details) => (
                ItemForm::from_details(&row, details, categories),
                row.snapshot(details.package_base_unit_amt),
            ),
            None => (ItemForm::from_row(&row, categories), row.snapshot(None)),
        };

        Self {
            row,
            form,
            snapshot,
            latest_expiration,
            saved_latest_expiration: latest_expiration,
            pending: None,
        }
    }

    /// Load item details and the latest expiration date, then open the session.
    ///
    /// Neither load is fatal: missing details fall back to the listing row, a missing
    /// expiration date is simply unknown.
    pub async fn open<A>(api: &A, row: InventoryRow, categories: &[&str]) -> Self
    where
        A: InventoryApi + ?Sized,
    {
        let food_item_id = row.food_item_id;

        let details = match api.food_item_details(food_item_id).await {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!(%food_item_id, error = %e, "item details unavailable; using listing row");
                None
            }
        };

        let latest_expiration = match api.latest_expiration(food_item_id).await {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!(%food_item_id, error = %e, "latest expiration unavailable");
                None
            }
        };

        Self::new(row, details.as_ref(), latest_expiration, categories)
    }

    pub fn row(&self) -> &InventoryRow {
        &self.row
    }

    pub fn form(&self) -> &ItemForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ItemForm {
        &mut self.form
    }

    pub fn snapshot(&self) -> &StockSnapshot {
        &self.snapshot
    }

    pub fn latest_expiration(&self) -> Option<NaiveDate> {
        self.latest_expiration
    }

    pub fn set_latest_expiration(&mut self, date: Option<NaiveDate>) {
        self.latest_expiration = date;
    }

    /// Id of the last submission if it stopped part way. The next submit of the same
    /// plan is sent under this id.
    pub fn pending_submission(&self) -> Option<SubmissionId> {
        self.pending.as_ref().map(|p| p.submission_id)
    }

    fn expiration_changed(&self) -> Option<NaiveDate> {
        self.latest_expiration
            .filter(|date| Some(*date) != self.saved_latest_expiration)
    }

    /// Live projection of the form against the snapshot.
    pub fn adjustment(&self) -> Adjustment {
        let desired = self.form.desired_state(&self.snapshot, self.row.qty_per_package);
        Adjustment::compute(&self.snapshot, &desired, self.form.location_id, self.row.location_id)
    }

    /// Plan the transactions a submission in `mode` would send.
    pub fn plan(&self, user_id: UserId, mode: SubmissionMode) -> DomainResult<ReconciliationPlan> {
        let desired = self.form.desired_state(&self.snapshot, self.row.qty_per_package);
        reconcile(&ReconcileRequest {
            snapshot: &self.snapshot,
            desired: &desired,
            origin_location: self.row.location_id,
            form_location: self.form.location_id,
            context: IntentContext::new(self.row.food_item_id, user_id),
            mode,
        })
    }

    /// Save the form: metadata, then expiration date, then relocation, then quantity.
    ///
    /// On error the session stays as it was, so the user can fix and resubmit.
    pub async fn submit<A, B>(
        &mut self,
        user_id: Option<UserId>,
        submitter: &IntentSubmitter<A, B>,
    ) -> Result<SubmissionReport, SubmissionError>
    where
        A: InventoryApi + ?Sized,
        B: EventBus<PantryEvent>,
    {
        self.form.validate()?;
        let user_id = user_id.ok_or_else(|| DomainError::validation(MISSING_USER))?;
        let plan = self.plan(user_id, SubmissionMode::Reconcile)?;
        if plan.no_change_requested() {
            return Err(DomainError::validation(INVALID_QUANTITY).into());
        }

        let food_item_id = self.row.food_item_id;
        submitter
            .api()
            .update_food_item(food_item_id, &self.form.to_update())
            .await
            .map_err(SubmissionError::Metadata)?;

        if let Some(date) = self.expiration_changed() {
            submitter
                .api()
                .update_latest_expiration(food_item_id, date)
                .await
                .map_err(SubmissionError::Expiration)?;
            self.saved_latest_expiration = Some(date);
        }

        self.send(plan.into_intents(), submitter).await
    }

    /// Write off everything on hand at the target location.
    pub async fn expire_now<A, B>(
        &mut self,
        user_id: Option<UserId>,
        submitter: &IntentSubmitter<A, B>,
    ) -> Result<SubmissionReport, SubmissionError>
    where
        A: InventoryApi + ?Sized,
        B: EventBus<PantryEvent>,
    {
        if !self.snapshot.has_stock() {
            return Err(DomainError::validation(NOTHING_TO_EXPIRE).into());
        }
        let user_id = user_id.ok_or_else(|| DomainError::validation(MISSING_USER))?;
        let plan = self.plan(user_id, SubmissionMode::Expire)?;
        self.send(plan.into_intents(), submitter).await
    }

    /// Send `intents`, resuming the pending submission when the plan is the one that
    /// stopped part way. Any other plan starts a fresh submission.
    async fn send<A, B>(
        &mut self,
        intents: Vec<TransactionIntent>,
        submitter: &IntentSubmitter<A, B>,
    ) -> Result<SubmissionReport, SubmissionError>
    where
        A: InventoryApi + ?Sized,
        B: EventBus<PantryEvent>,
    {
        let submission_id = match self.pending.take() {
            Some(pending) if pending.intents == intents => {
                tracing::info!(submission_id = %pending.submission_id, "resuming interrupted submission");
                pending.submission_id
            }
            _ => SubmissionId::new(),
        };

        let result = submitter
            .submit_as(submission_id, self.row.food_item_id, &intents)
            .await;
        if let Err(SubmissionError::Partial { submission_id, .. }) = &result {
            self.pending = Some(PendingSubmission {
                submission_id: *submission_id,
                intents,
            });
        }
        result
    }

    /// Remove the item from the inventory; its history remains.
    pub async fn archive<A>(&self, api: &A) -> Result<(), ClientError>
    where
        A: InventoryApi + ?Sized,
    {
        api.archive_food_item(self.row.food_item_id).await
    }
}
