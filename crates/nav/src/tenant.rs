//! Tenant resolution and the tenant-scoped URL prefix.
//!
//! Resolution is an ordered list of strategies evaluated top-down; the first
//! strategy that yields a tenant key wins. When none does, the prefix falls
//! back to `/` and navigation stays usable.

use serde::{Deserialize, Serialize};

use tenantnav_auth::Session;
use tenantnav_core::{NavError, TenantKey};
use tenantnav_infra::TenantRecord;

/// Where a tenant context came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantOrigin {
    /// Delivered on the bus or returned by the tenant service.
    Fetched,
    /// Recovered from durable storage at mount.
    Persisted,
}

/// Tenant identity and branding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    pub tenant_id: Option<TenantKey>,
    pub application_title: Option<String>,
    pub logo_ref: Option<String>,
    /// Whether branding details were part of the payload at all.
    pub details_loaded: bool,
    pub origin: TenantOrigin,
}

impl TenantContext {
    pub fn from_record(
        tenant_id: Option<TenantKey>,
        record: Option<&TenantRecord>,
        origin: TenantOrigin,
    ) -> Self {
        let tenant_id = tenant_id.or_else(|| {
            TenantKey::from_optional(record.and_then(|r| r.tenant_id.as_deref()))
        });
        Self {
            tenant_id,
            application_title: record.and_then(|r| r.application_title()).map(str::to_string),
            logo_ref: record.and_then(|r| r.logo()).map(str::to_string),
            details_loaded: record.is_some_and(|r| r.details.is_some()),
            origin,
        }
    }

    /// Whether `record` describes the same tenant as this context.
    pub fn matches_record(&self, record: &TenantRecord) -> bool {
        self.tenant_id.is_some()
            && self.tenant_id == TenantKey::from_optional(record.tenant_id.as_deref())
    }

    /// Take branding from `record` when this context carries none.
    pub fn inherit_branding(&mut self, record: &TenantRecord) {
        if self.details_loaded || record.details.is_none() || !self.matches_record(record) {
            return;
        }
        self.application_title = record.application_title().map(str::to_string);
        self.logo_ref = record.logo().map(str::to_string);
        self.details_loaded = true;
    }
}

/// Tenant key embedded in an (anonymous) form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormContext {
    pub tenant_key: Option<TenantKey>,
}

/// One step of the tenant resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantSource {
    /// A freshly delivered tenant context.
    SessionContext,
    /// A tenant context recovered from storage.
    StoredContext,
    /// The tenant key embedded in the current form.
    FormKey,
}

impl TenantSource {
    const AUTHENTICATED: [TenantSource; 3] = [
        TenantSource::SessionContext,
        TenantSource::StoredContext,
        TenantSource::FormKey,
    ];

    // No session tenant exists for anonymous form access.
    const ANONYMOUS: [TenantSource; 3] = [
        TenantSource::FormKey,
        TenantSource::SessionContext,
        TenantSource::StoredContext,
    ];

    pub fn resolution_order(authenticated: bool) -> &'static [TenantSource] {
        if authenticated {
            &Self::AUTHENTICATED
        } else {
            &Self::ANONYMOUS
        }
    }

    fn pick<'a>(
        &self,
        tenant: Option<&'a TenantContext>,
        form: &'a FormContext,
    ) -> Option<&'a TenantKey> {
        let from_context = |origin: TenantOrigin| {
            tenant
                .filter(|t| t.origin == origin)
                .and_then(|t| t.tenant_id.as_ref())
        };
        match self {
            TenantSource::SessionContext => from_context(TenantOrigin::Fetched),
            TenantSource::StoredContext => from_context(TenantOrigin::Persisted),
            TenantSource::FormKey => form.tenant_key.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantResolution {
    pub tenant_id: Option<TenantKey>,
    pub base_url_prefix: String,
}

impl TenantResolution {
    fn unscoped() -> Self {
        Self {
            tenant_id: None,
            base_url_prefix: "/".to_string(),
        }
    }
}

/// Resolve the active tenant and its URL prefix.
pub fn resolve_tenant(
    session: &Session,
    tenant: Option<&TenantContext>,
    form: &FormContext,
    multi_tenancy_enabled: bool,
) -> TenantResolution {
    if !multi_tenancy_enabled {
        return TenantResolution::unscoped();
    }

    let resolved = TenantSource::resolution_order(session.is_authenticated)
        .iter()
        .find_map(|source| source.pick(tenant, form));

    match resolved {
        Some(key) => TenantResolution {
            base_url_prefix: format!("/tenant/{key}/"),
            tenant_id: Some(key.clone()),
        },
        None => {
            tracing::debug!(
                authenticated = session.is_authenticated,
                error = %NavError::MissingTenant,
                "using unprefixed base path"
            );
            TenantResolution::unscoped()
        }
    }
}
