//! Cross-component notifications for the pantry client.
//!
//! Components never talk through ambient globals: a publisher holds an [`EventBus`],
//! a consumer holds a [`Subscription`] and unsubscribes by dropping it.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod pantry;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use pantry::{PantryEvent, TransactionCompleted};
