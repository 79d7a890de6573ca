//! Direct stock transactions (the "Stock Item" action), as opposed to editing a target
//! quantity.

use chrono::NaiveDate;

use pantry_core::{DomainError, DomainResult, LocationId, UserId};

use crate::adjustment::resolve_target_location;
use crate::form::FoodItemUpdate;
use crate::intent::{IntentContext, TransactionIntent, TransactionKind};
use crate::model::InventoryRow;
use crate::units::{packages_to_base_units, parse_number};

pub const MISSING_RESTOCK_LOCATION: &str = "Please choose a location.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestockAction {
    #[default]
    Add,
    Remove,
    TransferIn,
    TransferOut,
}

impl RestockAction {
    pub fn kind(&self) -> TransactionKind {
        match self {
            RestockAction::Add => TransactionKind::Add,
            RestockAction::Remove => TransactionKind::Remove,
            RestockAction::TransferIn => TransactionKind::TransferIn,
            RestockAction::TransferOut => TransactionKind::TransferOut,
        }
    }

    /// Price, store and expiration only make sense when stock is coming in from a
    /// purchase.
    pub fn records_purchase(&self) -> bool {
        matches!(self, RestockAction::Add)
    }
}

/// Raw form values of a restock. `packages` is the text typed into the quantity field.
#[derive(Debug, Clone, PartialEq)]
pub struct RestockRequest {
    pub action: RestockAction,
    pub packages: String,
    pub location_id: Option<LocationId>,
    pub expiration_date: Option<NaiveDate>,
    pub price_per_item: String,
    pub store: String,
}

impl Default for RestockRequest {
    fn default() -> Self {
        Self {
            action: RestockAction::Add,
            packages: "1".to_string(),
            location_id: None,
            expiration_date: None,
            price_per_item: String::new(),
            store: String::new(),
        }
    }
}

/// What a restock submission sends, in order: metadata first, then the transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct RestockPlan {
    pub metadata: Option<FoodItemUpdate>,
    pub intent: Option<TransactionIntent>,
}

impl RestockPlan {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_none() && self.intent.is_none()
    }
}

pub fn plan_restock(row: &InventoryRow, request: &RestockRequest, user_id: UserId) -> DomainResult<RestockPlan> {
    let location = resolve_target_location(request.location_id, row.location_id)
        .ok_or_else(|| DomainError::validation(MISSING_RESTOCK_LOCATION))?;

    let metadata = if request.action.records_purchase() {
        let price = parse_number(request.price_per_item.as_str());
        let store = Some(request.store.trim().to_lowercase()).filter(|s| !s.is_empty());
        (price.is_some() || store.is_some()).then(|| FoodItemUpdate {
            price_per_item: price,
            store,
            ..FoodItemUpdate::from_row(row)
        })
    } else {
        None
    };

    let quantity = packages_to_base_units(request.packages.as_str(), row.qty_per_package);
    let intent = (quantity > 0.0).then(|| {
        let expiration = request.expiration_date.filter(|_| request.action.records_purchase());
        TransactionIntent::new(
            request.action.kind(),
            quantity,
            location,
            IntentContext::new(row.food_item_id, user_id),
        )
        .with_expiration(expiration)
    });

    Ok(RestockPlan { metadata, intent })
}
