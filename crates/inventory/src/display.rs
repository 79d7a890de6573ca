//! Text shown next to inventory rows.

use chrono::{DateTime, Utc};

use crate::model::InventoryRow;

/// Quantity label for a row: the server-formatted package count when `show_packages` is
/// set and one is available, otherwise the rounded base-unit total with its unit.
pub fn format_quantity_label(row: &InventoryRow, show_packages: bool) -> String {
    if show_packages {
        if let Some(packages) = row.formatted_packages.as_deref().filter(|p| !p.is_empty()) {
            return packages.to_string();
        }
    }
    let rounded = row
        .qty_in_total
        .filter(|q| q.is_finite())
        .map(|q| (q + 0.5).floor())
        .unwrap_or(0.0);
    format!("{rounded:.0}{}", row.base_unit_abbr.as_deref().unwrap_or(""))
}

/// Time left until `target`: `"unknown"`, `"expired"`, `"3 days 4 hr"`, `"2 hr 5 min"`
/// or `"12 min"`.
pub fn relative_expiration(target: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(target) = target else {
        return "unknown".to_string();
    };
    let remaining = target - now;
    if remaining <= chrono::Duration::zero() {
        return "expired".to_string();
    }

    let total_minutes = remaining.num_minutes();
    let days = total_minutes / (60 * 24);
    let hours = (total_minutes % (60 * 24)) / 60;
    let minutes = total_minutes % 60;

    if days > 0 {
        let day_label = format!("{days} day{}", if days > 1 { "s" } else { "" });
        return if hours > 0 { format!("{day_label} {hours} hr") } else { day_label };
    }
    if hours > 0 {
        return format!("{hours} hr {minutes} min");
    }
    format!("{minutes} min")
}

/// Title-case each word: `"black BEANS"` becomes `"Black Beans"`.
pub fn capitalize_words(value: &str) -> String {
    value
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
