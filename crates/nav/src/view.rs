//! The derived navigation view.

use serde::Serialize;

use tenantnav_auth::{Capabilities, Session, role_label};
use tenantnav_core::NavConfig;

use crate::{
    FormContext, LocaleSelection, RouteLocation, Section, TenantContext, resolve_tenant,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub key: Section,
    pub target_path: String,
    pub is_active: bool,
    pub visible: bool,
}

/// What presentation renders. Recomputed, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationView {
    pub base_url_prefix: String,
    /// Link target of the logo.
    pub brand_path: String,
    pub app_display_name: String,
    pub logo_path: String,
    pub items: Vec<NavItem>,
    pub locale: LocaleSelection,
    pub locale_switchable: bool,
    pub user_display_name: String,
    pub user_role_label: String,
    /// Present iff the session is anonymous.
    pub login_path: Option<String>,
}

impl NavigationView {
    pub fn shows_login(&self) -> bool {
        self.login_path.is_some()
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &NavItem> {
        self.items.iter().filter(|item| item.visible)
    }

    pub fn item(&self, section: Section) -> Option<&NavItem> {
        self.items.iter().find(|item| item.key == section)
    }
}

/// One snapshot of every input the view depends on.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInputs<'a> {
    pub session: &'a Session,
    pub tenant: Option<&'a TenantContext>,
    pub route: &'a RouteLocation,
    pub form: &'a FormContext,
    pub locale: &'a LocaleSelection,
}

/// Derive the view from an input snapshot. Pure: the same snapshot always
/// yields an equal view.
pub fn project(inputs: &ProjectionInputs<'_>, config: &NavConfig) -> NavigationView {
    let session = inputs.session;
    let resolution = resolve_tenant(
        session,
        inputs.tenant,
        inputs.form,
        config.multi_tenancy_enabled,
    );
    let prefix = resolution.base_url_prefix;

    let capabilities = if session.is_authenticated {
        Capabilities::evaluate(&session.claims, config)
    } else {
        Capabilities::none()
    };

    let items = Section::ALL
        .iter()
        .map(|section| NavItem {
            key: *section,
            target_path: format!("{prefix}{}", section.target()),
            is_active: section.is_active(&inputs.route.pathname, &prefix),
            visible: session.is_authenticated && section_visible(*section, &capabilities),
        })
        .collect();

    let (app_display_name, logo_path) = branding(inputs.tenant, config);

    let (user_display_name, user_role_label, login_path) = if session.is_authenticated {
        (
            session.claims.display_name().to_string(),
            role_label(&session.claims, config).to_string(),
            None,
        )
    } else {
        (String::new(), String::new(), Some(prefix.clone()))
    };

    NavigationView {
        brand_path: prefix.clone(),
        base_url_prefix: prefix,
        app_display_name,
        logo_path,
        items,
        locale: inputs.locale.clone(),
        locale_switchable: inputs.locale.is_switchable(),
        user_display_name,
        user_role_label,
        login_path,
    }
}

fn section_visible(section: Section, caps: &Capabilities) -> bool {
    match section {
        Section::Form => true,
        Section::Admin => caps.admin,
        Section::Processes => caps.designer,
        Section::Application => caps.applications_access && (caps.reviewer || caps.client),
        Section::Task | Section::Metrics => caps.reviewer,
    }
}

fn branding(tenant: Option<&TenantContext>, config: &NavConfig) -> (String, String) {
    if !config.multi_tenancy_enabled {
        return (config.application_name.clone(), config.logo_path.clone());
    }

    match tenant.filter(|t| t.details_loaded) {
        Some(t) => (
            t.application_title.clone().unwrap_or_default(),
            t.logo_ref.clone().unwrap_or_else(|| config.logo_path.clone()),
        ),
        None => (String::new(), config.skeleton_logo_path.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenantnav_auth::{Role, UserClaims};
    use tenantnav_core::TenantKey;

    use crate::TenantOrigin;

    fn reviewer() -> Session {
        Session::authenticated(UserClaims {
            name: Some("Rita".into()),
            roles: [Role::from("formsflow-reviewer")].into_iter().collect(),
            ..UserClaims::default()
        })
    }

    fn acme(details: bool) -> TenantContext {
        TenantContext {
            tenant_id: Some(TenantKey::parse("acme").unwrap()),
            application_title: details.then(|| "Acme Forms".to_string()),
            logo_ref: None,
            details_loaded: details,
            origin: TenantOrigin::Fetched,
        }
    }

    fn view_for(session: &Session, tenant: Option<&TenantContext>, path: &str, config: &NavConfig) -> NavigationView {
        let route = RouteLocation {
            pathname: path.to_string(),
        };
        let form = FormContext::default();
        let locale = LocaleSelection::default();
        project(
            &ProjectionInputs {
                session,
                tenant,
                route: &route,
                form: &form,
                locale: &locale,
            },
            config,
        )
    }

    fn multi_tenant() -> NavConfig {
        NavConfig {
            multi_tenancy_enabled: true,
            ..NavConfig::default()
        }
    }

    #[test]
    fn reviewer_sees_review_sections_with_tenant_paths() {
        let tenant = acme(true);
        let view = view_for(&reviewer(), Some(&tenant), "/tenant/acme/draft/5", &multi_tenant());

        let visible: Vec<Section> = view.visible_items().map(|i| i.key).collect();
        assert_eq!(
            visible,
            vec![Section::Form, Section::Application, Section::Task, Section::Metrics]
        );
        assert!(view.item(Section::Application).unwrap().is_active);
        assert_eq!(view.item(Section::Task).unwrap().target_path, "/tenant/acme/task");
        assert_eq!(view.user_display_name, "Rita");
        assert_eq!(view.user_role_label, "Reviewer");
        assert!(!view.shows_login());
    }

    #[test]
    fn anonymous_view_exposes_only_login() {
        let tenant = acme(true);
        let view = view_for(&Session::anonymous(), Some(&tenant), "/", &multi_tenant());

        assert_eq!(view.visible_items().count(), 0);
        assert_eq!(view.login_path.as_deref(), Some("/tenant/acme/"));
        assert_eq!(view.user_display_name, "");
    }

    #[test]
    fn branding_degrades_while_tenant_details_are_unknown() {
        let config = multi_tenant();
        let view = view_for(&reviewer(), None, "/", &config);
        assert_eq!(view.app_display_name, "");
        assert_eq!(view.logo_path, config.skeleton_logo_path);

        let tenant = acme(true);
        let view = view_for(&reviewer(), Some(&tenant), "/", &config);
        assert_eq!(view.app_display_name, "Acme Forms");
        assert_eq!(view.logo_path, config.logo_path);
    }

    #[test]
    fn single_tenant_uses_configured_branding_and_root_prefix() {
        let config = NavConfig::default();
        let tenant = acme(true);
        let view = view_for(&reviewer(), Some(&tenant), "/task/1", &config);

        assert_eq!(view.base_url_prefix, "/");
        assert_eq!(view.brand_path, "/");
        assert_eq!(view.app_display_name, config.application_name);
        assert!(view.item(Section::Task).unwrap().is_active);
        assert!(view.items.iter().all(|i| i.target_path.starts_with('/')));
    }

    #[test]
    fn every_target_is_prefixed() {
        let tenant = acme(false);
        let view = view_for(&reviewer(), Some(&tenant), "/", &multi_tenant());
        assert!(
            view.items
                .iter()
                .all(|i| i.target_path.starts_with("/tenant/acme/"))
        );
    }
}
