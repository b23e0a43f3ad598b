//! In-memory event bus for tests/dev and single-process embedding.

use std::sync::{Mutex, mpsc};

use thiserror::Error;

use crate::bus::{EventBus, Subscription, SubscriptionId, Topical};
use crate::Topic;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    #[error("bus lock poisoned")]
    Poisoned,
}

#[derive(Debug)]
struct Subscriber<M> {
    id: SubscriptionId,
    topics: Vec<Topic>,
    tx: mpsc::Sender<M>,
}

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Fan-out to every subscriber registered for the message's topic
/// - Subscribers whose receiver was dropped are pruned on publish
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<Subscriber<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions (leak detection in tests).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Topical + Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let topic = message.topic();
        let mut subs = self.subscribers.lock().map_err(|_| InMemoryBusError::Poisoned)?;

        subs.retain(|sub| {
            if !sub.topics.contains(&topic) {
                return true;
            }
            sub.tx.send(message.clone()).is_ok()
        });

        Ok(())
    }

    fn subscribe(&self, topics: &[Topic]) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();
        let id = SubscriptionId::new();

        // If the lock is poisoned, we still return a subscription;
        // it just never receives messages.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(Subscriber {
                id,
                topics: topics.to_vec(),
                tx,
            });
        }

        Subscription::new(id, rx)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut subs) = self.subscribers.lock() else {
            return false;
        };
        let before = subs.len();
        subs.retain(|sub| sub.id != id);
        subs.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BusMessage;
    use serde_json::json;

    #[test]
    fn delivers_only_subscribed_topics_in_publish_order() {
        let bus: InMemoryEventBus<BusMessage> = InMemoryEventBus::new();
        let sub = bus.subscribe(&[Topic::Route, Topic::Tenant]);

        bus.publish(BusMessage::new(Topic::Route, json!({"pathname": "/a"}))).unwrap();
        bus.publish(BusMessage::new(Topic::Form, json!({"tenantKey": "x"}))).unwrap();
        bus.publish(BusMessage::new(Topic::Tenant, json!({"tenantId": "acme"}))).unwrap();
        bus.publish(BusMessage::new(Topic::Route, json!({"pathname": "/b"}))).unwrap();

        let topics: Vec<Topic> = std::iter::from_fn(|| sub.try_recv().ok())
            .map(|m| m.topic())
            .collect();
        assert_eq!(topics, vec![Topic::Route, Topic::Tenant, Topic::Route]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus: InMemoryEventBus<BusMessage> = InMemoryEventBus::new();
        let sub = bus.subscribe(&Topic::CONSUMED);
        assert_eq!(bus.subscriber_count(), 1);

        assert!(bus.unsubscribe(sub.id()));
        assert!(!bus.unsubscribe(sub.id()));
        assert_eq!(bus.subscriber_count(), 0);

        bus.publish(BusMessage::new(Topic::Auth, json!(null))).unwrap();
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let bus: InMemoryEventBus<BusMessage> = InMemoryEventBus::new();
        let sub = bus.subscribe(&[Topic::Auth]);
        drop(sub);

        bus.publish(BusMessage::new(Topic::Auth, json!(null))).unwrap();
        assert_eq!(bus.subscriber_count(), 0);
    }
}
