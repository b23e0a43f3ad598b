//! Locale selection and its propagation.
//!
//! A selected locale is pushed to the translation engine, durable storage and
//! the event bus, in that order, within one synchronous call. Explicit user
//! selections additionally trigger the best-effort remote update.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use tenantnav_auth::Session;
use tenantnav_core::LocaleId;
use tenantnav_events::{BusMessage, EventBus, Topic};
use tenantnav_infra::{KeyValueStore, LocaleOption, LocaleUpdater, PersistedState, Translator};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocaleSelection {
    pub current: Option<LocaleId>,
    pub available: Vec<LocaleOption>,
}

impl LocaleSelection {
    /// A single available language is shown as a label, not a picker.
    pub fn is_switchable(&self) -> bool {
        self.available.len() != 1
    }
}

/// Storage and bus the synchronizer propagates to.
pub struct LocaleSinks<'a, S, B> {
    pub storage: &'a PersistedState<S>,
    pub bus: &'a B,
}

pub struct LocaleSynchronizer {
    translator: Arc<dyn Translator>,
    updater: Arc<dyn LocaleUpdater>,
    current: Option<LocaleId>,
    explicit: bool,
    /// Authentication status the fallback last fired for.
    fallback_fired_for: Option<bool>,
}

impl core::fmt::Debug for LocaleSynchronizer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocaleSynchronizer")
            .field("current", &self.current)
            .field("explicit", &self.explicit)
            .field("fallback_fired_for", &self.fallback_fired_for)
            .finish_non_exhaustive()
    }
}

impl LocaleSynchronizer {
    pub fn new(translator: Arc<dyn Translator>, updater: Arc<dyn LocaleUpdater>) -> Self {
        Self {
            translator,
            updater,
            current: None,
            explicit: false,
            fallback_fired_for: None,
        }
    }

    pub fn current(&self) -> Option<&LocaleId> {
        self.current.as_ref()
    }

    pub fn has_explicit_selection(&self) -> bool {
        self.explicit
    }

    /// Apply a user's explicit choice.
    ///
    /// Local propagation happens first; the remote update runs last and its
    /// failure is only logged.
    pub fn select_locale<S, B>(&mut self, id: LocaleId, session: &Session, sinks: LocaleSinks<'_, S, B>)
    where
        S: KeyValueStore,
        B: EventBus<BusMessage>,
    {
        self.explicit = true;
        self.propagate(&id, &sinks);

        if let Err(e) = self.updater.update_user_locale(&id, session) {
            tracing::warn!(locale = %id, error = %e, "remote locale update failed; keeping local selection");
        }
    }

    /// Fall back to the session's (or the stored) locale once per session
    /// initialization. Never overrides an explicit choice.
    ///
    /// Returns the locale that was applied, if any.
    pub fn apply_session_fallback<S, B>(
        &mut self,
        session: &Session,
        sinks: LocaleSinks<'_, S, B>,
    ) -> Option<LocaleId>
    where
        S: KeyValueStore,
        B: EventBus<BusMessage>,
    {
        if self.explicit || self.fallback_fired_for == Some(session.is_authenticated) {
            return None;
        }
        self.fallback_fired_for = Some(session.is_authenticated);

        let fallback = session
            .claims
            .locale
            .clone()
            .or_else(|| sinks.storage.locale())?;

        if self.current.as_ref() == Some(&fallback) {
            return None;
        }

        tracing::debug!(locale = %fallback, "applying session locale fallback");
        self.propagate(&fallback, &sinks);
        Some(fallback)
    }

    fn propagate<S, B>(&mut self, id: &LocaleId, sinks: &LocaleSinks<'_, S, B>)
    where
        S: KeyValueStore,
        B: EventBus<BusMessage>,
    {
        self.translator.change_language(id);

        if let Err(e) = sinks.storage.save_locale(id) {
            tracing::warn!(locale = %id, error = %e, "failed to persist locale");
        }

        let message = BusMessage::new(Topic::ChangeLanguage, Value::String(id.to_string()));
        if let Err(e) = sinks.bus.publish(message) {
            tracing::warn!(locale = %id, error = ?e, "failed to publish locale change");
        }

        self.current = Some(id.clone());
    }
}
