//! Navigation error model.

use thiserror::Error;

/// Result type used across the navigation crates.
pub type NavResult<T> = Result<T, NavError>;

/// Navigation-level error.
///
/// None of these are ever surfaced to the end user as a navigation failure;
/// callers recover by degrading the view (absent value, unprefixed path, ...).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    /// A durable storage value could not be parsed into the expected shape.
    #[error("malformed persisted state under '{key}': {reason}")]
    MalformedPersistedState { key: String, reason: String },

    /// A bus payload could not be decoded for its topic.
    #[error("malformed payload on '{topic}': {reason}")]
    MalformedPayload { topic: String, reason: String },

    /// Multi-tenancy is enabled but no tenant could be resolved.
    #[error("tenant unresolved while multi-tenancy is enabled")]
    MissingTenant,

    /// The best-effort remote locale update failed.
    #[error("locale update failed: {0}")]
    LocaleUpdateFailure(String),

    /// An update was delivered after the owning module was disposed.
    #[error("update delivered after dispose")]
    SubscriptionAfterDispose,

    /// The storage backend failed (IO, lock poisoning).
    #[error("storage error: {0}")]
    Storage(String),

    /// An external service call failed.
    #[error("service error: {0}")]
    Service(String),

    /// An identifier was invalid.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl NavError {
    pub fn malformed_state(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedPersistedState {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed_payload(topic: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedPayload {
            topic: topic.into(),
            reason: reason.to_string(),
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
