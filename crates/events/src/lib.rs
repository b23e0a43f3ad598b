//! `tenantnav-events`: cross-module signal delivery.
//!
//! Topics, the bus message envelope, and the publish/subscribe abstraction
//! the navigation runtime listens on.

pub mod bus;
pub mod in_memory_bus;
pub mod message;
pub mod topic;

pub use bus::{EventBus, Subscription, SubscriptionId, Topical};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use message::BusMessage;
pub use topic::Topic;
