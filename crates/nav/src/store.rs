//! Session projection store: the reducer behind the navigation view.
//!
//! Holds the latest value of every input and recomputes the view whenever
//! one changes. Events are applied strictly in arrival order; the store never
//! reorders or coalesces, except that a later tenant context simply replaces
//! an earlier one (last-write-wins).
//!
//! ## State machine
//!
//! ```text
//! Uninitialized ──(any input)──▶ Partial ──(Auth)──▶ Ready
//!        │                          │                 │
//!        └────────────── dispose ───┴─────────────────┴──▶ Disposed
//! ```
//!
//! The view is only exposed once authentication status is known, so the
//! login-vs-navigation branch never flickers during initialization.

use serde::Serialize;

use tenantnav_auth::Session;
use tenantnav_core::{NavConfig, NavError, NavResult};

use crate::{
    FormContext, LocaleSelection, LocaleUpdate, NavEvent, NavigationView, ProjectionInputs,
    RouteLocation, TenantContext, TenantOrigin, project,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionState {
    Uninitialized,
    Partial,
    Ready,
    Disposed,
}

/// Outcome of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Inputs changed and the view was recomputed (or will be once Ready).
    Recomputed,
    /// The event did not change any input.
    Unchanged,
}

#[derive(Debug)]
pub struct SessionProjectionStore {
    config: NavConfig,
    state: ProjectionState,
    session: Option<Session>,
    tenant: Option<TenantContext>,
    route: RouteLocation,
    form: FormContext,
    locale: LocaleSelection,
    view: Option<NavigationView>,
}

impl SessionProjectionStore {
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            state: ProjectionState::Uninitialized,
            session: None,
            tenant: None,
            route: RouteLocation::default(),
            form: FormContext::default(),
            locale: LocaleSelection::default(),
            view: None,
        }
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn state(&self) -> ProjectionState {
        self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn tenant(&self) -> Option<&TenantContext> {
        self.tenant.as_ref()
    }

    pub fn route(&self) -> &RouteLocation {
        &self.route
    }

    pub fn locale(&self) -> &LocaleSelection {
        &self.locale
    }

    /// The current view; `None` until authentication status is known.
    pub fn view(&self) -> Option<&NavigationView> {
        self.view.as_ref()
    }

    /// Apply one input event.
    ///
    /// After `dispose` this is a no-op returning `SubscriptionAfterDispose`;
    /// callers treat that as a late delivery, not a failure.
    pub fn apply(&mut self, event: NavEvent) -> NavResult<Applied> {
        if self.state == ProjectionState::Disposed {
            return Err(NavError::SubscriptionAfterDispose);
        }

        let changed = match event {
            NavEvent::Auth(session) => {
                let changed = self.session.as_ref() != Some(&session);
                self.session = Some(session);
                self.state = ProjectionState::Ready;
                changed
            }
            NavEvent::Tenant(context) => self.apply_tenant(context),
            NavEvent::Route(route) => replace(&mut self.route, route),
            NavEvent::Form(form) => replace(&mut self.form, form),
            NavEvent::Locale(LocaleUpdate::Available(available)) => {
                replace(&mut self.locale.available, available)
            }
            NavEvent::Locale(LocaleUpdate::Selected(id)) => {
                replace(&mut self.locale.current, Some(id))
            }
        };

        if self.state == ProjectionState::Uninitialized {
            self.state = ProjectionState::Partial;
        }

        // Partial states keep no view: nothing is shown before auth is known.
        if self.state == ProjectionState::Ready && (changed || self.view.is_none()) {
            self.view = Some(self.recompute());
        }

        Ok(if changed {
            Applied::Recomputed
        } else {
            Applied::Unchanged
        })
    }

    /// Drop every retained input; later events are ignored.
    pub fn dispose(&mut self) {
        self.state = ProjectionState::Disposed;
        self.session = None;
        self.tenant = None;
        self.route = RouteLocation::default();
        self.form = FormContext::default();
        self.locale = LocaleSelection::default();
        self.view = None;
    }

    fn apply_tenant(&mut self, context: TenantContext) -> bool {
        // A stored value is stale by definition once a fresh one arrived.
        let stale = context.origin == TenantOrigin::Persisted
            && self
                .tenant
                .as_ref()
                .is_some_and(|t| t.origin == TenantOrigin::Fetched);
        if stale {
            tracing::debug!("ignoring persisted tenant context after a fresh delivery");
            return false;
        }
        replace(&mut self.tenant, Some(context))
    }

    fn recompute(&self) -> NavigationView {
        let anonymous = Session::anonymous();
        project(
            &ProjectionInputs {
                session: self.session.as_ref().unwrap_or(&anonymous),
                tenant: self.tenant.as_ref(),
                route: &self.route,
                form: &self.form,
                locale: &self.locale,
            },
            &self.config,
        )
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
