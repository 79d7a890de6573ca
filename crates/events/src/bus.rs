//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus replaces window-level custom events: a component that finishes a submission
//! publishes a typed message, and every view that cares about fresh inventory holds its
//! own [`Subscription`].
//!
//! - **Broadcast**: every live subscription receives a copy of each message
//! - **Deterministic lifetime**: dropping a subscription unsubscribes it
//! - **No persistence**: the inventory API is the source of truth; messages are hints
//!   to refresh, so a missed or duplicated message is harmless

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A subscription to an event stream.
///
/// ```ignore
/// let subscription = bus.subscribe();
///
/// // Non-blocking check from a UI loop:
/// if subscription.drain() > 0 {
///     refresh_inventory().await?;
/// }
/// ```
///
/// A subscription is meant for one consumer. Dropping it closes the channel; the bus
/// prunes closed channels on its next publish.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Consume every pending message without blocking, returning how many there were.
    pub fn drain(&self) -> usize {
        self.receiver.try_iter().count()
    }
}

/// Publish/subscribe abstraction.
///
/// `publish()` can fail (e.g. lock poisoning in the in-memory bus). A failed publish
/// never undoes the work that triggered it; callers log it and move on.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
