use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{Topic, Topical};

/// Envelope for a message on the shared bus.
///
/// The payload stays untyped JSON at this layer: producers are independently
/// owned modules, so decoding (and rejecting malformed shapes) is the
/// consumer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    message_id: Uuid,
    topic: Topic,
    published_at: DateTime<Utc>,
    payload: Value,
}

impl BusMessage {
    pub fn new(topic: Topic, payload: Value) -> Self {
        Self {
            message_id: Uuid::now_v7(),
            topic,
            published_at: Utc::now(),
            payload,
        }
    }

    pub fn message_id(&self) -> Uuid {
        self.message_id
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }
}

impl Topical for BusMessage {
    fn topic(&self) -> Topic {
        self.topic
    }
}
