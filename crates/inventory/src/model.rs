//! Records returned by the inventory API.
//!
//! The API serializes decimal columns inconsistently (numbers or numeric strings), so
//! numeric fields are read leniently.

use serde::{Deserialize, Deserializer, Serialize};

use pantry_core::{FoodItemId, LocationId};

use crate::snapshot::StockSnapshot;
use crate::units::parse_number;

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => parse_number(s.as_str()),
        _ => None,
    })
}

/// One line of the household inventory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    #[serde(rename = "FoodItemID")]
    pub food_item_id: FoodItemId,
    #[serde(rename = "FoodName", default)]
    pub food_name: String,
    #[serde(rename = "Type", default)]
    pub item_type: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "LocationID", default)]
    pub location_id: Option<LocationId>,
    #[serde(rename = "LocationName", default)]
    pub location_name: Option<String>,
    #[serde(rename = "PackageLabel", default)]
    pub package_label: Option<String>,
    /// Base units per package.
    #[serde(rename = "QtyPerPackage", default, deserialize_with = "lenient_number")]
    pub qty_per_package: Option<f64>,
    #[serde(rename = "TotalQtyInBaseUnits", default, deserialize_with = "lenient_number")]
    pub total_qty_in_base_units: Option<f64>,
    #[serde(rename = "QtyInTotal", default, deserialize_with = "lenient_number")]
    pub qty_in_total: Option<f64>,
    #[serde(rename = "FormattedPackages", default)]
    pub formatted_packages: Option<String>,
    #[serde(rename = "BaseUnitAbbr", default)]
    pub base_unit_abbr: Option<String>,
}

impl InventoryRow {
    /// A row with only the identity and location set; everything else empty.
    pub fn new(food_item_id: FoodItemId, food_name: impl Into<String>, location_id: Option<LocationId>) -> Self {
        Self {
            food_item_id,
            food_name: food_name.into(),
            item_type: None,
            category: None,
            location_id,
            location_name: None,
            package_label: None,
            qty_per_package: None,
            total_qty_in_base_units: None,
            qty_in_total: None,
            formatted_packages: None,
            base_unit_abbr: None,
        }
    }

    pub fn current_base_units(&self) -> f64 {
        self.total_qty_in_base_units.unwrap_or(0.0)
    }

    /// Snapshot for an edit session, using `package_size` when given (e.g. from the
    /// item details) and the row's own package size otherwise.
    pub fn snapshot(&self, package_size: Option<f64>) -> StockSnapshot {
        let size = package_size.or(self.qty_per_package).unwrap_or(0.0);
        StockSnapshot::new(self.current_base_units(), size)
    }
}

/// Full record of a food item (GET `/api/food-items/{id}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodItemDetails {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Type", default)]
    pub item_type: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "PackageLabel", default)]
    pub package_label: Option<String>,
    #[serde(rename = "PackageBaseUnitAmt", default, deserialize_with = "lenient_number")]
    pub package_base_unit_amt: Option<f64>,
    /// Restock target, in base units.
    #[serde(rename = "TargetLevel", default, deserialize_with = "lenient_number")]
    pub target_level: Option<f64>,
    #[serde(rename = "LatestPrice", default, deserialize_with = "lenient_number")]
    pub latest_price: Option<f64>,
    #[serde(rename = "LatestStore", default)]
    pub latest_store: Option<String>,
}
