//! Capability evaluation: role identifiers → boolean navigation flags.
//!
//! - No IO
//! - No panics
//! - Total over any input (empty or absent role sets grant nothing)

use serde::Serialize;

use tenantnav_core::NavConfig;

use crate::{Role, UserClaims};

/// Whether `required` is among `roles`.
///
/// Accepts anything iterable over roles, so an absent set can be passed as
/// `Option<&BTreeSet<Role>>` and evaluates to `false`.
pub fn has_capability<'a, I>(roles: I, required: &str) -> bool
where
    I: IntoIterator<Item = &'a Role>,
{
    roles.into_iter().any(|role| role.as_str() == required)
}

/// Capability flags for one session, computed once per recomputation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub admin: bool,
    pub designer: bool,
    pub reviewer: bool,
    pub client: bool,
    /// Group-level access to the applications section.
    pub applications_access: bool,
}

impl Capabilities {
    pub fn evaluate(claims: &UserClaims, config: &NavConfig) -> Self {
        let roles = &config.roles;
        Self {
            admin: has_capability(&claims.roles, &roles.admin),
            designer: has_capability(&claims.roles, &roles.designer),
            reviewer: has_capability(&claims.roles, &roles.reviewer),
            client: has_capability(&claims.roles, &roles.client),
            applications_access: applications_access(claims, config),
        }
    }

    /// Nothing granted; used for anonymous sessions.
    pub fn none() -> Self {
        Self::default()
    }
}

fn applications_access(claims: &UserClaims, config: &NavConfig) -> bool {
    if !config.applications_access_check {
        return true;
    }
    config
        .applications_groups
        .iter()
        .any(|group| claims.groups.contains(group))
}

/// Label shown under the user name: the most privileged known role.
pub fn role_label(claims: &UserClaims, config: &NavConfig) -> &'static str {
    let roles = &config.roles;
    let ranked = [
        (roles.admin.as_str(), "Admin"),
        (roles.designer.as_str(), "Designer"),
        (roles.reviewer.as_str(), "Reviewer"),
        (roles.client.as_str(), "Client"),
    ];

    ranked
        .iter()
        .find(|(role, _)| has_capability(&claims.roles, role))
        .map(|(_, label)| *label)
        .unwrap_or("")
}
