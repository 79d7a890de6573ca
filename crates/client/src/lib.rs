//! Pantry inventory client.
//!
//! Talks to the inventory HTTP API on behalf of a front end: loads rows and item
//! details, runs edit sessions and restocks through the reconciliation engine, and
//! sends the resulting transactions in order. Completed submissions are announced on
//! the event bus so inventory views can refresh.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod feed;
pub mod http;
pub mod restock;
pub mod session;
pub mod submit;

#[cfg(test)]
mod testing;

pub use api::{InventoryApi, InventoryQuery, LatestExpiration, TransactionRecord};
pub use config::ClientConfig;
pub use context::ClientContext;
pub use error::{ClientError, SubmissionError};
pub use feed::InventoryFeed;
pub use http::{HttpInventoryApi, IDEMPOTENCY_HEADER};
pub use restock::{submit_restock, submit_restock_as};
pub use session::EditSession;
pub use submit::{IntentSubmitter, SubmissionReport};
