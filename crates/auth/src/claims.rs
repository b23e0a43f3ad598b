use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use tenantnav_core::LocaleId;

use crate::Role;

/// User claims as exposed by the authentication provider.
///
/// Every field is optional on the wire; missing collections decode as empty.
/// Sets are ordered so that derived views are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserClaims {
    pub name: Option<String>,

    #[serde(alias = "preferredName", alias = "preferredUsername")]
    pub preferred_username: Option<String>,

    pub groups: BTreeSet<String>,

    #[serde(alias = "role")]
    pub roles: BTreeSet<Role>,

    /// Blank or otherwise invalid values decode as absent.
    #[serde(deserialize_with = "lenient_locale")]
    pub locale: Option<LocaleId>,
}

impl UserClaims {
    /// Name shown in the user menu: full name, else username, else empty.
    pub fn display_name(&self) -> &str {
        non_blank(self.name.as_deref())
            .or_else(|| non_blank(self.preferred_username.as_deref()))
            .unwrap_or("")
    }

    /// Fill absent fields from a fallback source (e.g. cached user details).
    ///
    /// Values already present on `self` always win.
    pub fn fill_missing_from(&mut self, fallback: &UserClaims) {
        if non_blank(self.name.as_deref()).is_none() {
            self.name = fallback.name.clone();
        }
        if non_blank(self.preferred_username.as_deref()).is_none() {
            self.preferred_username = fallback.preferred_username.clone();
        }
        if self.groups.is_empty() {
            self.groups = fallback.groups.clone();
        }
        if self.roles.is_empty() {
            self.roles = fallback.roles.clone();
        }
        if self.locale.is_none() {
            self.locale = fallback.locale.clone();
        }
    }
}

fn lenient_locale<'de, D>(deserializer: D) -> Result<Option<LocaleId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(LocaleId::from_optional(raw.as_deref()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
