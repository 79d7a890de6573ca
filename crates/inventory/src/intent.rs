//! Transactions proposed to the inventory API.

use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pantry_core::{DomainError, FoodItemId, LocationId, UserId, ValueObject};

/// Kind of inventory transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Add,
    Remove,
    TransferOut,
    TransferIn,
    Expire,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Add => "add",
            TransactionKind::Remove => "remove",
            TransactionKind::TransferOut => "transfer_out",
            TransactionKind::TransferIn => "transfer_in",
            TransactionKind::Expire => "expire",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(TransactionKind::Add),
            "remove" => Ok(TransactionKind::Remove),
            "transfer_out" => Ok(TransactionKind::TransferOut),
            "transfer_in" => Ok(TransactionKind::TransferIn),
            "expire" => Ok(TransactionKind::Expire),
            other => Err(DomainError::validation(format!("unknown transaction type: {other}"))),
        }
    }
}

/// Who and what a transaction is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentContext {
    pub food_item_id: FoodItemId,
    pub user_id: UserId,
}

impl IntentContext {
    pub fn new(food_item_id: FoodItemId, user_id: UserId) -> Self {
        Self { food_item_id, user_id }
    }
}

/// One transaction awaiting submission. Serializes to the create-transaction payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionIntent {
    pub food_item_id: FoodItemId,
    pub location_id: LocationId,
    pub user_id: UserId,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    /// Magnitude in base units; never negative.
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

impl TransactionIntent {
    /// `quantity` is stored as its magnitude.
    pub fn new(kind: TransactionKind, quantity: f64, location_id: LocationId, context: IntentContext) -> Self {
        Self {
            food_item_id: context.food_item_id,
            location_id,
            user_id: context.user_id,
            kind,
            quantity: quantity.abs(),
            expiration_date: None,
        }
    }

    pub fn with_expiration(mut self, expiration_date: Option<NaiveDate>) -> Self {
        self.expiration_date = expiration_date;
        self
    }
}

impl ValueObject for TransactionIntent {}
