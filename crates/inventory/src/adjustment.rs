//! The projection of a desired state against a stock snapshot.

use pantry_core::{LocationId, ValueObject};

use crate::snapshot::{DesiredState, StockSnapshot};

/// Deltas at or below this magnitude (in base units) are floating-point noise from
/// package/base-unit round trips, not a real change.
pub const MEANINGFUL_DELTA: f64 = 0.0001;

/// Where a submission applies: the form's choice, else the item's current location.
pub fn resolve_target_location(
    form_location: Option<LocationId>,
    item_location: Option<LocationId>,
) -> Option<LocationId> {
    form_location.or(item_location)
}

/// Signed change in on-hand quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantityChange {
    Increase(f64),
    Decrease(f64),
}

/// Derived view of an edit; recomputed whenever the form or snapshot changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    pub desired_packages: Option<f64>,
    pub effective_package_size: f64,
    pub desired_base_units: Option<f64>,
    pub delta_base_units: Option<f64>,
    pub current_base_units: f64,
    pub target_location: Option<LocationId>,
}

impl Adjustment {
    pub fn compute(
        snapshot: &StockSnapshot,
        desired: &DesiredState,
        form_location: Option<LocationId>,
        item_location: Option<LocationId>,
    ) -> Self {
        let current_base_units = snapshot.base_units();
        let desired_base_units = desired.desired_base_units();

        Self {
            desired_packages: desired.desired_packages,
            effective_package_size: desired.effective_package_size,
            desired_base_units,
            delta_base_units: desired_base_units.map(|d| d - current_base_units),
            current_base_units,
            target_location: resolve_target_location(form_location, item_location),
        }
    }

    /// `true` while the quantity field is empty or unparseable.
    pub fn is_incomplete(&self) -> bool {
        self.desired_base_units.is_none()
    }

    /// The change to apply, or `None` when there is nothing beyond noise.
    pub fn quantity_change(&self) -> Option<QuantityChange> {
        let delta = self.delta_base_units?;
        if delta > MEANINGFUL_DELTA {
            Some(QuantityChange::Increase(delta))
        } else if delta < -MEANINGFUL_DELTA {
            Some(QuantityChange::Decrease(delta.abs()))
        } else {
            None
        }
    }
}

impl ValueObject for Adjustment {}
