//! Navigation configuration.
//!
//! Values come from environment variables (`NavConfig::from_env`); anything
//! unset or unparseable keeps its default.

use serde::{Deserialize, Serialize};

pub const DEFAULT_APPLICATION_NAME: &str = "formsflow.ai";
pub const DEFAULT_LOGO_PATH: &str = "/logo.svg";
pub const SKELETON_LOGO_PATH: &str = "/logo_skeleton.svg";

/// What to do with the persisted tenant record when a fresh payload arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantCachePolicy {
    /// Every freshly delivered tenant payload replaces the persisted record.
    #[default]
    AlwaysOverwrite,
    /// Keep a persisted record that already carries a non-empty name.
    KeepExistingNamed,
}

impl TenantCachePolicy {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "always_overwrite" | "overwrite" => Some(Self::AlwaysOverwrite),
            "keep_existing_named" | "keep" => Some(Self::KeepExistingNamed),
            _ => None,
        }
    }
}

/// Role identifiers that gate navigation capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleIdentifiers {
    pub admin: String,
    pub designer: String,
    pub reviewer: String,
    pub client: String,
}

impl Default for RoleIdentifiers {
    fn default() -> Self {
        Self {
            admin: "formsflow-admin".to_string(),
            designer: "formsflow-designer".to_string(),
            reviewer: "formsflow-reviewer".to_string(),
            client: "formsflow-client".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Serve every tenant under its own `/tenant/{key}/` namespace.
    pub multi_tenancy_enabled: bool,

    /// Display name used when multi-tenancy is disabled.
    pub application_name: String,

    /// Logo used when multi-tenancy is disabled, and for tenants without a
    /// custom logo.
    pub logo_path: String,

    /// Placeholder shown until tenant details are known.
    pub skeleton_logo_path: String,

    pub roles: RoleIdentifiers,

    /// When set, the applications section additionally requires one of
    /// `applications_groups` among the user's groups.
    pub applications_access_check: bool,
    pub applications_groups: Vec<String>,

    pub tenant_cache_policy: TenantCachePolicy,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            multi_tenancy_enabled: false,
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
            logo_path: DEFAULT_LOGO_PATH.to_string(),
            skeleton_logo_path: SKELETON_LOGO_PATH.to_string(),
            roles: RoleIdentifiers::default(),
            applications_access_check: false,
            applications_groups: Vec::new(),
            tenant_cache_policy: TenantCachePolicy::default(),
        }
    }
}

impl NavConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (tests, embedding).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("TENANTNAV_MULTITENANCY_ENABLED").and_then(|v| parse_bool(&v)) {
            config.multi_tenancy_enabled = v;
        }
        if let Some(v) = lookup("TENANTNAV_APPLICATION_NAME") {
            config.application_name = v;
        }
        if let Some(v) = lookup("TENANTNAV_LOGO_PATH").filter(|v| !v.trim().is_empty()) {
            config.logo_path = v;
        }
        if let Some(v) = lookup("TENANTNAV_ADMIN_ROLE") {
            config.roles.admin = v;
        }
        if let Some(v) = lookup("TENANTNAV_DESIGNER_ROLE") {
            config.roles.designer = v;
        }
        if let Some(v) = lookup("TENANTNAV_REVIEWER_ROLE") {
            config.roles.reviewer = v;
        }
        if let Some(v) = lookup("TENANTNAV_CLIENT_ROLE") {
            config.roles.client = v;
        }
        if let Some(v) = lookup("TENANTNAV_APPLICATIONS_GROUPS") {
            config.applications_groups = v
                .split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect();
            config.applications_access_check = !config.applications_groups.is_empty();
        }
        if let Some(raw) = lookup("TENANTNAV_TENANT_CACHE_POLICY") {
            match TenantCachePolicy::parse(&raw) {
                Some(policy) => config.tenant_cache_policy = policy,
                None => tracing::warn!(value = %raw, "unknown tenant cache policy; keeping default"),
            }
        }

        config
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
