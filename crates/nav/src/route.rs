//! Route classification: which navigation section is active for a path.

use serde::{Deserialize, Serialize};

/// Current location as reported by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLocation {
    pub pathname: String,
}

impl Default for RouteLocation {
    fn default() -> Self {
        Self {
            pathname: "/".to_string(),
        }
    }
}

/// Navigation sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Form,
    Admin,
    Processes,
    Application,
    Task,
    Metrics,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Form,
        Section::Admin,
        Section::Processes,
        Section::Application,
        Section::Task,
        Section::Metrics,
    ];

    /// Path segment the section is anchored at.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Form => "form",
            Section::Admin => "admin",
            Section::Processes => "processes",
            Section::Application => "application",
            Section::Task => "task",
            Section::Metrics => "metrics",
        }
    }

    /// Link target relative to the base prefix.
    pub fn target(&self) -> &'static str {
        match self {
            Section::Admin => "admin/dashboard",
            other => other.key(),
        }
    }

    /// Second path segment that also highlights the section.
    pub fn alias(&self) -> Option<&'static str> {
        match self {
            Section::Application => Some("draft"),
            Section::Metrics => Some("insights"),
            _ => None,
        }
    }

    pub fn is_active(&self, pathname: &str, base_url_prefix: &str) -> bool {
        is_active(pathname, self.key(), base_url_prefix)
            || self
                .alias()
                .is_some_and(|alias| is_active(pathname, alias, base_url_prefix))
    }
}

/// Whether `pathname` lies under `base_url_prefix + section_key`.
///
/// The match is anchored at the start of the path and must end on a segment
/// boundary, so `/tenant/forms-inc/` never activates `form` and `/formats`
/// never activates `form` either.
pub fn is_active(pathname: &str, section_key: &str, base_url_prefix: &str) -> bool {
    let Some(rest) = pathname
        .strip_prefix(base_url_prefix)
        .and_then(|rest| rest.strip_prefix(section_key))
    else {
        return false;
    };
    rest.is_empty() || rest.starts_with(['/', '?', '#'])
}
