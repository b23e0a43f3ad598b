//! Inputs of the projection store and decoding of bus messages into them.

use serde::Deserialize;

use tenantnav_auth::Session;
use tenantnav_core::{LocaleId, NavError, NavResult, TenantKey};
use tenantnav_events::{BusMessage, Topic};
use tenantnav_infra::{LocaleOption, TenantRecord};

use crate::{FormContext, RouteLocation, TenantContext, TenantOrigin};

/// Everything that can change the navigation view, applied in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Auth(Session),
    Tenant(TenantContext),
    Route(RouteLocation),
    Form(FormContext),
    Locale(LocaleUpdate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleUpdate {
    Available(Vec<LocaleOption>),
    Selected(LocaleId),
}

/// A decoded bus message, before side effects are run.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// The provider changed; its state must be re-read.
    AuthChanged,
    Tenant {
        context: TenantContext,
        /// Raw tenant data to persist, when the payload carried any.
        record: Option<TenantRecord>,
    },
    Route(RouteLocation),
    Form(FormContext),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TenantPayload {
    #[serde(default)]
    tenant_id: Option<String>,
    #[serde(default)]
    tenant_data: Option<TenantRecord>,
}

#[derive(Debug, Deserialize)]
struct RoutePayload {
    pathname: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormPayload {
    #[serde(default)]
    tenant_key: Option<String>,
}

impl Inbound {
    /// Decode a bus message.
    ///
    /// `Ok(None)` means the message carries nothing to apply (a `null`
    /// payload, or a topic navigation does not consume).
    pub fn decode(message: &BusMessage) -> NavResult<Option<Self>> {
        let topic = message.topic();
        let payload = message.payload();

        if topic == Topic::Auth {
            return Ok(Some(Inbound::AuthChanged));
        }
        if payload.is_null() {
            return Ok(None);
        }

        let malformed = |e: serde_json::Error| NavError::malformed_payload(topic.as_str(), e);

        let inbound = match topic {
            Topic::Tenant => {
                let p = TenantPayload::deserialize(payload).map_err(malformed)?;
                let tenant_id = TenantKey::from_optional(p.tenant_id.as_deref());
                Inbound::Tenant {
                    context: TenantContext::from_record(
                        tenant_id,
                        p.tenant_data.as_ref(),
                        TenantOrigin::Fetched,
                    ),
                    record: p.tenant_data,
                }
            }
            Topic::Route => {
                let p = RoutePayload::deserialize(payload).map_err(malformed)?;
                Inbound::Route(RouteLocation {
                    pathname: p.pathname,
                })
            }
            Topic::Form => {
                let p = FormPayload::deserialize(payload).map_err(malformed)?;
                Inbound::Form(FormContext {
                    tenant_key: TenantKey::from_optional(p.tenant_key.as_deref()),
                })
            }
            Topic::Auth | Topic::ChangeLanguage => return Ok(None),
        };

        Ok(Some(inbound))
    }
}
