//! Strongly-typed identifiers used across the navigation crates.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::NavError;

/// Key of a tenant; becomes the `/tenant/{key}/` URL segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantKey(String);

/// Identifier of a language (e.g. `"fr"`, `"pt-BR"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleId(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Parse an identifier, rejecting blank input.
            pub fn parse(raw: impl AsRef<str>) -> Result<Self, NavError> {
                raw.as_ref().parse()
            }

            /// Lenient conversion for optional wire values: blank or invalid
            /// input is treated as absent.
            pub fn from_optional(raw: Option<&str>) -> Option<Self> {
                raw.and_then(|s| s.parse().ok())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $t {
            type Error = NavError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl FromStr for $t {
            type Err = NavError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(NavError::invalid_id(format!("{}: empty", $name)));
                }
                if trimmed.contains('/') {
                    return Err(NavError::invalid_id(format!(
                        "{}: '{}' contains '/'",
                        $name, trimmed
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

impl_string_newtype!(TenantKey, "TenantKey");
impl_string_newtype!(LocaleId, "LocaleId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let key = TenantKey::parse("  acme ").unwrap();
        assert_eq!(key.as_str(), "acme");
    }

    #[test]
    fn blank_is_rejected() {
        assert!(TenantKey::parse("   ").is_err());
        assert!(LocaleId::parse("").is_err());
    }

    #[test]
    fn slash_is_rejected_for_url_segments() {
        let err = TenantKey::parse("acme/admin").unwrap_err();
        assert!(matches!(err, NavError::InvalidId(_)));
    }

    #[test]
    fn optional_wire_values_degrade_to_none() {
        assert_eq!(TenantKey::from_optional(None), None);
        assert_eq!(TenantKey::from_optional(Some("")), None);
        assert_eq!(
            TenantKey::from_optional(Some("beta")),
            Some(TenantKey::parse("beta").unwrap())
        );
    }

    #[test]
    fn serde_uses_plain_strings() {
        let id = LocaleId::parse("fr").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"fr\"");
        let back: LocaleId = serde_json::from_str("\" fr \"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn decoding_applies_the_same_validation() {
        assert!(serde_json::from_str::<LocaleId>("\"  \"").is_err());
        assert!(serde_json::from_str::<TenantKey>("\"acme/admin\"").is_err());
    }
}
