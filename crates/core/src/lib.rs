//! `pantry-core`: shared building blocks for the pantry workspace.
//!
//! This crate contains **pure** primitives (no IO): identifiers, the domain error
//! model and the value-object marker.

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{FoodItemId, HouseholdId, LocationId, SubmissionId, UserId};
pub use value_object::ValueObject;
