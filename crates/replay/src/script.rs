//! Replay script format.
//!
//! ```json
//! {
//!   "auth": {"authenticated": true, "claims": {"name": "Ann", "roles": ["formsflow-reviewer"]}},
//!   "locales": [{"name": "en", "value": "English"}],
//!   "tenant": {"tenantId": "acme", "name": "Acme"},
//!   "storage": {"lang": "fr"},
//!   "config": {"multi_tenancy_enabled": true},
//!   "steps": [
//!     {"publish": {"topic": "FF_AUTH", "payload": null}},
//!     {"select_locale": "fr"},
//!     {"logout": null}
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;

use tenantnav_auth::UserClaims;
use tenantnav_core::{LocaleId, NavConfig};
use tenantnav_events::Topic;
use tenantnav_infra::{LocaleOption, TenantRecord};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Script {
    pub auth: AuthFixture,
    pub locales: Vec<LocaleOption>,
    /// Served by the tenant service when present.
    pub tenant: Option<TenantRecord>,
    /// Storage entries seeded before mount.
    pub storage: BTreeMap<String, String>,
    /// Replaces the environment configuration when present.
    pub config: Option<NavConfig>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthFixture {
    pub authenticated: bool,
    pub claims: UserClaims,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Publish { topic: Topic, payload: Value },
    /// Sign a user in and announce it.
    Login(UserClaims),
    /// Sign out through navigation and announce it.
    Logout,
    SelectLocale(LocaleId),
}

impl Script {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("invalid replay script")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_step_kind() {
        let script = Script::parse(
            r#"{
                "steps": [
                    {"publish": {"topic": "ES_ROUTE", "payload": {"pathname": "/form"}}},
                    {"login": {"name": "Ann"}},
                    {"logout": null},
                    {"select_locale": "fr"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 4);
        assert!(matches!(script.steps[0], Step::Publish { topic: Topic::Route, .. }));
        assert!(matches!(&script.steps[1], Step::Login(c) if c.display_name() == "Ann"));
        assert!(matches!(script.steps[2], Step::Logout));
        assert!(matches!(&script.steps[3], Step::SelectLocale(l) if l.as_str() == "fr"));
        assert!(!script.auth.authenticated);
    }

    #[test]
    fn unknown_step_is_rejected() {
        let err = Script::parse(r#"{"steps": [{"teleport": 1}]}"#).unwrap_err();
        assert!(err.to_string().contains("invalid replay script"));
    }
}
