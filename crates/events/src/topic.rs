use serde::{Deserialize, Serialize};

/// Named channels on the shared event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// Authentication state changed; the provider should be re-read.
    #[serde(rename = "FF_AUTH")]
    Auth,
    /// Tenant details were delivered.
    #[serde(rename = "ES_TENANT")]
    Tenant,
    /// The current route changed.
    #[serde(rename = "ES_ROUTE")]
    Route,
    /// A form (possibly anonymous) was loaded.
    #[serde(rename = "ES_FORM")]
    Form,
    /// The selected language changed (published by navigation).
    #[serde(rename = "ES_CHANGE_LANGUAGE")]
    ChangeLanguage,
}

impl Topic {
    /// Topics the navigation runtime consumes.
    pub const CONSUMED: [Topic; 4] = [Topic::Auth, Topic::Tenant, Topic::Route, Topic::Form];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Auth => "FF_AUTH",
            Topic::Tenant => "ES_TENANT",
            Topic::Route => "ES_ROUTE",
            Topic::Form => "ES_FORM",
            Topic::ChangeLanguage => "ES_CHANGE_LANGUAGE",
        }
    }
}

impl core::fmt::Display for Topic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
