//! Process-local bus connecting submitters to inventory views.

use std::sync::{Mutex, mpsc};

use crate::bus::{EventBus, Subscription};

#[derive(Debug, thiserror::Error)]
pub enum InMemoryBusError {
    #[error("event bus lock poisoned")]
    Poisoned,
}

/// Channel-per-subscriber bus for one client process.
///
/// Each [`Subscription`] owns the receiving end of its own channel. A publish clones
/// the message into every channel in subscription order; channels whose receiver was
/// dropped fail the send and are forgotten.
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    senders: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered subscriptions, including dropped ones not yet pruned.
    pub fn subscriber_count(&self) -> usize {
        self.senders.lock().map(|senders| senders.len()).unwrap_or(0)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut senders = self.senders.lock().map_err(|_| InMemoryBusError::Poisoned)?;
        let before = senders.len();
        senders.retain(|sender| sender.send(message.clone()).is_ok());
        tracing::trace!(
            delivered = senders.len(),
            pruned = before - senders.len(),
            "event published"
        );
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (sender, receiver) = mpsc::channel();
        match self.senders.lock() {
            Ok(mut senders) => senders.push(sender),
            Err(_) => tracing::warn!("event bus lock poisoned; subscription will stay silent"),
        }
        Subscription::new(receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscription_receives_each_message_in_order() {
        let bus = InMemoryEventBus::<u32>::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(1).unwrap();
        bus.publish(2).unwrap();

        assert_eq!(a.try_recv().unwrap(), 1);
        assert_eq!(a.try_recv().unwrap(), 2);
        assert_eq!(b.drain(), 2);
        assert!(b.try_recv().is_err());
    }

    #[test]
    fn dropped_subscription_is_pruned_on_next_publish() {
        let bus = InMemoryEventBus::<&'static str>::new();
        let kept = bus.subscribe();
        let dropped = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(dropped);
        bus.publish("refresh").unwrap();

        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(kept.try_recv().unwrap(), "refresh");
    }

    #[test]
    fn subscription_only_sees_messages_published_after_subscribing() {
        let bus = InMemoryEventBus::<u8>::new();
        bus.publish(1).unwrap();
        let late = bus.subscribe();
        bus.publish(2).unwrap();
        assert_eq!(late.try_recv().unwrap(), 2);
        assert_eq!(late.drain(), 0);
    }
}
