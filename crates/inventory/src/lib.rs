//! Inventory reconciliation engine.
//!
//! Pure, synchronous logic (no IO, no HTTP): converting between packages and base
//! units, projecting an edit form against the stock on hand, and deciding which
//! inventory transactions a submission has to send.

pub mod adjustment;
pub mod display;
pub mod form;
pub mod intent;
pub mod model;
pub mod reconcile;
pub mod restock;
pub mod snapshot;
pub mod units;

pub use adjustment::{Adjustment, MEANINGFUL_DELTA, QuantityChange, resolve_target_location};
pub use display::{capitalize_words, format_quantity_label, relative_expiration};
pub use form::{FoodItemUpdate, ItemForm, normalize_category_key};
pub use intent::{IntentContext, TransactionIntent, TransactionKind};
pub use model::{FoodItemDetails, InventoryRow};
pub use reconcile::{
    Phase, PlannedIntent, ReconcileRequest, ReconciliationPlan, SubmissionMode, reconcile,
};
pub use restock::{RestockAction, RestockPlan, RestockRequest, plan_restock};
pub use snapshot::{DesiredState, PackageSizeSource, PackageSizeSources, StockSnapshot};
pub use units::{
    NumericInput, base_units_to_packages, format_quantity_for_display, packages_to_base_units,
    parse_number, parse_number_or,
};
