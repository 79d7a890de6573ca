//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Stock snapshots, desired states, adjustments and transaction intents have no
/// identity of their own: two instances with the same fields describe the same thing.
/// They are immutable once built; "editing" one means building a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct PackageSize(f64);
///
/// impl ValueObject for PackageSize {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
