//! What is on hand when an edit starts, and what the user asks for.

use pantry_core::ValueObject;

use crate::units::{NumericInput, base_units_to_packages, parse_number};

/// Immutable view of an item's stock at the moment editing began.
///
/// Invariant: `base_units >= 0`, and `packages * package_size == base_units` (within
/// floating-point tolerance) whenever `package_size > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockSnapshot {
    base_units: f64,
    packages: f64,
    package_size: f64,
}

impl StockSnapshot {
    /// Build a snapshot from the last known server-side quantity.
    ///
    /// Negative or non-finite quantities are recorded as `0`; a non-positive or
    /// non-finite package size is recorded as `0` ("unknown").
    pub fn new(base_units: f64, package_size: f64) -> Self {
        let clamped = if base_units.is_finite() && base_units > 0.0 {
            base_units
        } else {
            0.0
        };
        if clamped != base_units {
            tracing::warn!(base_units, "stock snapshot clamped to zero");
        }
        let package_size = if package_size.is_finite() && package_size > 0.0 {
            package_size
        } else {
            0.0
        };

        Self {
            base_units: clamped,
            packages: base_units_to_packages(clamped, package_size),
            package_size,
        }
    }

    /// Snapshot of an item with nothing on hand and no known packaging.
    pub fn empty() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn base_units(&self) -> f64 {
        self.base_units
    }

    pub fn packages(&self) -> f64 {
        self.packages
    }

    /// Base units per package; `0` when unknown.
    pub fn package_size(&self) -> f64 {
        self.package_size
    }

    pub fn has_stock(&self) -> bool {
        self.base_units > 0.0
    }
}

impl Default for StockSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl ValueObject for StockSnapshot {}

/// Where a candidate package size came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageSizeSource {
    /// The value currently typed into the form.
    Form,
    /// The package size captured in the [`StockSnapshot`].
    Snapshot,
    /// The item's last known package size from the inventory listing.
    Item,
}

/// Candidate package sizes, in order of preference.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PackageSizeSources {
    pub form: Option<f64>,
    pub snapshot: Option<f64>,
    pub item: Option<f64>,
}

impl PackageSizeSources {
    pub fn new(form: Option<f64>, snapshot: Option<f64>, item: Option<f64>) -> Self {
        Self { form, snapshot, item }
    }

    /// Sources for an edit form: raw form text, the snapshot, and the item's known size.
    pub fn for_form(form_value: impl NumericInput, snapshot: &StockSnapshot, item: Option<f64>) -> Self {
        Self {
            form: parse_number(form_value),
            snapshot: Some(snapshot.package_size()),
            item,
        }
    }

    pub fn ordered(&self) -> [(PackageSizeSource, Option<f64>); 3] {
        [
            (PackageSizeSource::Form, self.form),
            (PackageSizeSource::Snapshot, self.snapshot),
            (PackageSizeSource::Item, self.item),
        ]
    }

    /// The first usable (finite, strictly positive) source and its value.
    pub fn resolve_with_source(&self) -> Option<(PackageSizeSource, f64)> {
        self.ordered()
            .into_iter()
            .find_map(|(source, value)| value.filter(|v| usable_package_size(*v)).map(|v| (source, v)))
    }

    /// Effective package size; `0` means "no packaging, quantities are base units".
    pub fn resolve(&self) -> f64 {
        self.resolve_with_source().map(|(_, v)| v).unwrap_or(0.0)
    }
}

fn usable_package_size(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// The user's target, captured from the form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesiredState {
    /// Requested total in packages; `None` while the input is empty or invalid.
    pub desired_packages: Option<f64>,
    /// Resolved package size used for conversion (`0` = none).
    pub effective_package_size: f64,
}

impl DesiredState {
    pub fn new(desired_packages: Option<f64>, sources: &PackageSizeSources) -> Self {
        Self {
            desired_packages: desired_packages.filter(|v| v.is_finite()),
            effective_package_size: sources.resolve(),
        }
    }

    /// Parse the raw quantity field.
    pub fn from_input(quantity: impl NumericInput, sources: &PackageSizeSources) -> Self {
        Self::new(parse_number(quantity), sources)
    }

    /// Desired total in base units, or `None` when no usable quantity was given.
    pub fn desired_base_units(&self) -> Option<f64> {
        let packages = self.desired_packages?;
        let base_units = if self.effective_package_size > 0.0 {
            packages * self.effective_package_size
        } else {
            packages
        };
        base_units.is_finite().then_some(base_units)
    }
}

impl ValueObject for DesiredState {}
