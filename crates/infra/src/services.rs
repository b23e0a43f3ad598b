//! External service boundaries consumed by navigation.
//!
//! Transport is out of scope here; each service is a trait with an in-memory
//! implementation for tests/dev and the replay tool.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use tenantnav_auth::Session;
use tenantnav_core::{LocaleId, NavError, NavResult};

use crate::TenantRecord;

/// One selectable language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleOption {
    #[serde(alias = "name")]
    pub id: LocaleId,
    #[serde(alias = "value")]
    pub display_name: String,
}

impl LocaleOption {
    pub fn new(id: LocaleId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Lists the languages the deployment offers, in display order.
pub trait LocaleCatalog: Send + Sync {
    fn list_locales(&self) -> NavResult<Vec<LocaleOption>>;
}

/// Fetches tenant details for an authenticated session.
pub trait TenantService: Send + Sync {
    fn fetch_tenant(&self, session: &Session) -> NavResult<TenantRecord>;
}

/// The translation engine: switches the active catalog.
pub trait Translator: Send + Sync {
    fn change_language(&self, locale: &LocaleId);
}

/// Best-effort remote "update user locale" call.
///
/// Implementations must not block the caller (queue or spawn the request);
/// a returned error is logged and otherwise ignored.
pub trait LocaleUpdater: Send + Sync {
    fn update_user_locale(&self, locale: &LocaleId, session: &Session) -> NavResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticLocaleCatalog {
    locales: Vec<LocaleOption>,
}

impl StaticLocaleCatalog {
    pub fn new(locales: Vec<LocaleOption>) -> Self {
        Self { locales }
    }
}

impl LocaleCatalog for StaticLocaleCatalog {
    fn list_locales(&self) -> NavResult<Vec<LocaleOption>> {
        Ok(self.locales.clone())
    }
}

/// Serves one fixed tenant record (or reports it as unavailable).
#[derive(Debug, Clone, Default)]
pub struct StaticTenantService {
    record: Option<TenantRecord>,
}

impl StaticTenantService {
    pub fn new(record: Option<TenantRecord>) -> Self {
        Self { record }
    }
}

impl TenantService for StaticTenantService {
    fn fetch_tenant(&self, _session: &Session) -> NavResult<TenantRecord> {
        self.record
            .clone()
            .ok_or_else(|| NavError::service("tenant details unavailable"))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLocaleUpdater;

impl LocaleUpdater for NoopLocaleUpdater {
    fn update_user_locale(&self, _locale: &LocaleId, _session: &Session) -> NavResult<()> {
        Ok(())
    }
}

/// Translator that only remembers the active catalog.
#[derive(Debug, Default)]
pub struct InMemoryTranslator {
    active: Mutex<Option<LocaleId>>,
}

impl InMemoryTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<LocaleId> {
        self.active.lock().ok().and_then(|a| a.clone())
    }
}

impl Translator for InMemoryTranslator {
    fn change_language(&self, locale: &LocaleId) {
        if let Ok(mut active) = self.active.lock() {
            *active = Some(locale.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_options_accept_catalog_wire_names() {
        let options: Vec<LocaleOption> = serde_json::from_str(
            r#"[{"name": "en", "value": "English"}, {"id": "fr", "displayName": "Français"}]"#,
        )
        .unwrap();

        assert_eq!(options[0].id.as_str(), "en");
        assert_eq!(options[0].display_name, "English");
        assert_eq!(options[1].display_name, "Français");
    }

    #[test]
    fn static_tenant_service_reports_missing_record() {
        let service = StaticTenantService::new(None);
        let err = service.fetch_tenant(&Session::anonymous()).unwrap_err();
        assert!(matches!(err, NavError::Service(_)));
    }
}
