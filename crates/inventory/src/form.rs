//! The item edit form: pre-filling, validation and the metadata payload.

use serde::{Deserialize, Serialize};

use pantry_core::{DomainError, DomainResult, LocationId};

use crate::model::{FoodItemDetails, InventoryRow};
use crate::snapshot::{DesiredState, PackageSizeSources, StockSnapshot};
use crate::units::{base_units_to_packages, format_quantity_for_display, parse_number};

pub const REQUIRED_FIELDS: &str = "Please fill in all required fields";
pub const MISSING_PACKAGE_LABEL: &str = "Please enter a package label";

/// Return the known category whose spelling matches `value` ignoring case and
/// surrounding whitespace, or `value` unchanged.
pub fn normalize_category_key(value: &str, categories: &[&str]) -> String {
    if value.is_empty() {
        return String::new();
    }
    let normalized = value.trim().to_lowercase();
    categories
        .iter()
        .find(|c| c.to_lowercase() == normalized)
        .map(|c| c.to_string())
        .unwrap_or_else(|| value.to_string())
}

fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

fn text_or_empty(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("")
}

/// Raw field values of the edit form. Quantities are in packages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemForm {
    pub food_name: String,
    pub item_type: String,
    pub category: String,
    pub location_id: Option<LocationId>,
    pub package_label: String,
    pub package_base_unit_amt: String,
    pub target_level: String,
    pub quantity: String,
    pub price_per_item: String,
    pub store: String,
}

impl ItemForm {
    /// Pre-fill from the full item record, falling back to the listing row.
    pub fn from_details(row: &InventoryRow, details: &FoodItemDetails, categories: &[&str]) -> Self {
        let package_size = details
            .package_base_unit_amt
            .or(row.qty_per_package)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);

        let target_level = match details.target_level {
            Some(target) if package_size != 0.0 => format!("{:.2}", target / package_size),
            _ => String::new(),
        };

        let name = details.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(&row.food_name);
        let item_type = text_or_empty(details.item_type.as_deref().filter(|t| !t.is_empty()).or(row.item_type.as_deref()));
        let category = text_or_empty(details.category.as_deref().filter(|c| !c.is_empty()).or(row.category.as_deref()));
        let label = text_or_empty(
            details
                .package_label
                .as_deref()
                .filter(|l| !l.is_empty())
                .or(row.package_label.as_deref()),
        );

        Self {
            food_name: name.to_string(),
            item_type: item_type.to_string(),
            category: normalize_category_key(category, categories),
            location_id: row.location_id,
            package_label: label.to_string(),
            package_base_unit_amt: package_size_text(package_size),
            target_level,
            quantity: current_packages_text(row, package_size),
            price_per_item: details.latest_price.map(|p| format!("{p}")).unwrap_or_default(),
            store: details.latest_store.clone().unwrap_or_default(),
        }
    }

    /// Pre-fill from the listing row alone (used when details cannot be loaded).
    pub fn from_row(row: &InventoryRow, categories: &[&str]) -> Self {
        let package_size = row.qty_per_package.filter(|v| v.is_finite()).unwrap_or(0.0);

        Self {
            food_name: row.food_name.clone(),
            item_type: text_or_empty(row.item_type.as_deref()).to_string(),
            category: normalize_category_key(text_or_empty(row.category.as_deref()), categories),
            location_id: row.location_id,
            package_label: text_or_empty(row.package_label.as_deref()).to_string(),
            package_base_unit_amt: package_size_text(package_size),
            target_level: String::new(),
            quantity: current_packages_text(row, package_size),
            price_per_item: String::new(),
            store: String::new(),
        }
    }

    /// Check required fields. Messages are user-facing.
    pub fn validate(&self) -> DomainResult<()> {
        let required = [
            &self.food_name,
            &self.category,
            &self.package_label,
            &self.package_base_unit_amt,
            &self.target_level,
            &self.quantity,
        ];
        if required.iter().any(|v| v.is_empty()) || self.location_id.is_none() {
            return Err(DomainError::validation(REQUIRED_FIELDS));
        }
        if self.package_label.trim().is_empty() {
            return Err(DomainError::validation(MISSING_PACKAGE_LABEL));
        }
        Ok(())
    }

    pub fn package_size_sources(&self, snapshot: &StockSnapshot, item_package_size: Option<f64>) -> PackageSizeSources {
        PackageSizeSources::for_form(self.package_base_unit_amt.as_str(), snapshot, item_package_size)
    }

    pub fn desired_state(&self, snapshot: &StockSnapshot, item_package_size: Option<f64>) -> DesiredState {
        DesiredState::from_input(
            self.quantity.as_str(),
            &self.package_size_sources(snapshot, item_package_size),
        )
    }

    /// Metadata payload sent before any quantity or location transaction.
    pub fn to_update(&self) -> FoodItemUpdate {
        FoodItemUpdate {
            food_name: normalize_text(&self.food_name),
            item_type: normalize_text(&self.item_type),
            category: normalize_text(&self.category),
            package_label: normalize_text(&self.package_label),
            package_base_unit_amt: parse_number(self.package_base_unit_amt.as_str()),
            price_per_item: non_empty(&self.price_per_item).and_then(parse_number),
            target_level: non_empty(&self.target_level).and_then(parse_number),
            store: non_empty(&self.store).map(normalize_text),
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

fn package_size_text(package_size: f64) -> String {
    if package_size != 0.0 {
        format!("{package_size}")
    } else {
        String::new()
    }
}

fn current_packages_text(row: &InventoryRow, package_size: f64) -> String {
    format_quantity_for_display(base_units_to_packages(row.current_base_units(), package_size))
}

/// Item metadata update (PUT `/api/food-items/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItemUpdate {
    pub food_name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub category: String,
    pub package_label: String,
    pub package_base_unit_amt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_item: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}

impl FoodItemUpdate {
    /// Payload that restates the row's current metadata unchanged.
    pub fn from_row(row: &InventoryRow) -> Self {
        Self {
            food_name: normalize_text(&row.food_name),
            item_type: normalize_text(text_or_empty(row.item_type.as_deref())),
            category: normalize_text(text_or_empty(row.category.as_deref())),
            package_label: normalize_text(text_or_empty(row.package_label.as_deref())),
            package_base_unit_amt: row.qty_per_package,
            price_per_item: None,
            target_level: None,
            store: None,
        }
    }
}
