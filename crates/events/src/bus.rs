//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is the delivery channel between independently-owned modules
//! (authentication, tenant service, router, form runtime) and navigation.
//!
//! - **Topic-routed**: a subscription names the topics it wants.
//! - **Ordered per subscription**: one subscription receives all of its topics
//!   through a single channel, so arrival order is preserved across topics.
//! - **No persistence**: the bus distributes; it does not store.
//! - **Explicit teardown**: subscriptions are removed with `unsubscribe`; a
//!   leaked subscription keeps receiving messages for a disposed consumer.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Topic;

/// Messages that can be routed by topic.
pub trait Topical {
    fn topic(&self) -> Topic;
}

/// Identity of a subscription, used to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A subscription to one or more topics.
///
/// Designed for single-threaded consumption: the navigation runtime drains it
/// from its own event loop with `try_recv`.
#[derive(Debug)]
pub struct Subscription<M> {
    id: SubscriptionId,
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(id: SubscriptionId, receiver: Receiver<M>) -> Self {
        Self { id, receiver }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Topic-routed publish/subscribe bus.
///
/// The trait requires `Send + Sync`: producers may publish from any thread.
/// `publish` failures are surfaced to the caller, which decides whether the
/// message was best-effort.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self, topics: &[Topic]) -> Subscription<M>;

    /// Remove a subscription. Returns whether it was still registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self, topics: &[Topic]) -> Subscription<M> {
        (**self).subscribe(topics)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        (**self).unsubscribe(id)
    }
}
