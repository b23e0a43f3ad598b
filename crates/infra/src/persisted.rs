//! Typed access to the durable client storage keys.
//!
//! Reads never fail: a missing key, a backend error, or a value that does not
//! parse into the expected shape all yield `None` (the latter two are logged).

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use tenantnav_auth::{Role, UserClaims};
use tenantnav_core::{LocaleId, NavError, NavResult};

use crate::storage::KeyValueStore;

/// Storage keys shared with the other client modules.
pub mod keys {
    pub const TENANT_DATA: &str = "TENANT_DATA";
    pub const USER_ROLE: &str = "USER_ROLE";
    pub const USER_DETAILS: &str = "USER_DETAILS";
    pub const LOCALE: &str = "lang";
}

/// Tenant record as cached under `TENANT_DATA`.
///
/// Unknown fields written by other modules are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<TenantDetails>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_logo: Option<CustomLogo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomLogo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl TenantRecord {
    /// Whether the record carries a non-empty tenant name.
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    pub fn application_title(&self) -> Option<&str> {
        self.details.as_ref()?.application_title.as_deref()
    }

    pub fn logo(&self) -> Option<&str> {
        self.details
            .as_ref()?
            .custom_logo
            .as_ref()?
            .logo
            .as_deref()
            .filter(|l| !l.trim().is_empty())
    }
}

/// Typed view over a `KeyValueStore`, scoped to one mounted navigation.
#[derive(Debug)]
pub struct PersistedState<S> {
    store: S,
}

impl<S> PersistedState<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tenant_record(&self) -> Option<TenantRecord> {
        self.read_json(keys::TENANT_DATA)
    }

    pub fn save_tenant_record(&self, record: &TenantRecord) -> NavResult<()> {
        self.write_json(keys::TENANT_DATA, record)
    }

    pub fn user_roles(&self) -> Option<BTreeSet<Role>> {
        self.read_json(keys::USER_ROLE)
    }

    pub fn user_details(&self) -> Option<UserClaims> {
        self.read_json(keys::USER_DETAILS)
    }

    /// Cached claims: user details with the separately stored roles folded in.
    pub fn cached_claims(&self) -> UserClaims {
        let mut claims = self.user_details().unwrap_or_default();
        if let Some(roles) = self.user_roles() {
            if claims.roles.is_empty() {
                claims.roles = roles;
            }
        }
        claims
    }

    /// The locale is stored as a bare string, not JSON.
    pub fn locale(&self) -> Option<LocaleId> {
        let raw = self.read_raw(keys::LOCALE)?;
        match LocaleId::parse(&raw) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(key = keys::LOCALE, error = %e, "ignoring malformed persisted locale");
                None
            }
        }
    }

    pub fn save_locale(&self, locale: &LocaleId) -> NavResult<()> {
        self.store.set(keys::LOCALE, locale.as_str())
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed; treating as absent");
                None
            }
        }
    }

    fn read_json<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let raw = self.read_raw(key)?;
        match parse_json::<T>(key, &raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring malformed persisted state");
                None
            }
        }
    }

    fn write_json<T>(&self, key: &str, value: &T) -> NavResult<()>
    where
        T: Serialize,
    {
        let body = serde_json::to_string(value)
            .map_err(|e| NavError::storage(format!("failed to encode {key}: {e}")))?;
        self.store.set(key, &body)
    }
}

fn parse_json<T>(key: &str, raw: &str) -> NavResult<Option<T>>
where
    T: DeserializeOwned,
{
    serde_json::from_str::<Option<T>>(raw).map_err(|e| NavError::malformed_state(key, e))
}
