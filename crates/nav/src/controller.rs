//! Mounted navigation runtime.
//!
//! The controller is the only place with side effects. It owns:
//!
//! - one bus subscription covering every consumed topic (so arrival order is
//!   preserved across topics)
//! - the authentication provider handle
//! - durable storage (typed through `PersistedState`)
//! - the external services (locale catalog, tenant service, translator,
//!   remote locale updater)
//!
//! and feeds a `SessionProjectionStore` with `NavEvent`s.
//!
//! ## Flow
//!
//! ```text
//! bus message ──decode──▶ Inbound ──side effects──▶ NavEvent ──▶ store ──▶ NavigationView
//!                           │
//!                           ├─ Tenant: persist per cache policy
//!                           └─ AuthChanged: re-read provider, merge cached
//!                              claims, locale fallback, tenant fetch
//! ```
//!
//! ## Lifecycle
//!
//! `mount` subscribes and recovers persisted state; `dispose` unsubscribes and
//! drops every retained input. After `dispose`, every entry point is a no-op.

use std::sync::Arc;

use tenantnav_auth::{AuthProvider, Session};
use tenantnav_core::{LocaleId, NavConfig, NavError, TenantCachePolicy};
use tenantnav_events::{BusMessage, EventBus, Subscription, Topic};
use tenantnav_infra::{
    KeyValueStore, LocaleCatalog, LocaleUpdater, PersistedState, TenantRecord, TenantService,
    Translator,
};

use crate::{
    Inbound, LocaleSinks, LocaleSynchronizer, LocaleUpdate, NavEvent, NavigationView,
    ProjectionState, SessionProjectionStore, TenantContext, TenantOrigin,
};

/// External collaborators of a mounted navigation.
#[derive(Clone)]
pub struct NavigationServices {
    pub provider: Arc<dyn AuthProvider>,
    pub catalog: Arc<dyn LocaleCatalog>,
    /// Absent when tenant details are only ever delivered on the bus.
    pub tenant_service: Option<Arc<dyn TenantService>>,
    pub translator: Arc<dyn Translator>,
    pub locale_updater: Arc<dyn LocaleUpdater>,
}

pub struct NavigationController<B, S>
where
    B: EventBus<BusMessage>,
    S: KeyValueStore,
{
    bus: B,
    storage: PersistedState<S>,
    services: NavigationServices,
    store: SessionProjectionStore,
    locale: LocaleSynchronizer,
    subscription: Option<Subscription<BusMessage>>,
}

impl<B, S> NavigationController<B, S>
where
    B: EventBus<BusMessage>,
    S: KeyValueStore,
{
    /// Subscribe to the consumed topics and recover persisted state.
    ///
    /// The provider is not read here: it may still be initializing. The view
    /// stays hidden until the first authentication update (`FF_AUTH` on the
    /// bus, or `on_auth_changed`). A host whose provider is already settled
    /// and will not announce itself again should use `mount_synced`.
    pub fn mount(bus: B, storage: S, services: NavigationServices, config: NavConfig) -> Self {
        let subscription = bus.subscribe(&Topic::CONSUMED);
        tracing::debug!(subscription = %subscription.id(), "navigation mounted");

        let locale = LocaleSynchronizer::new(
            services.translator.clone(),
            services.locale_updater.clone(),
        );

        let mut controller = Self {
            bus,
            storage: PersistedState::new(storage),
            services,
            store: SessionProjectionStore::new(config),
            locale,
            subscription: Some(subscription),
        };

        controller.recover_tenant();
        controller.load_locales();
        controller
    }

    /// `mount` followed by an immediate provider read.
    pub fn mount_synced(
        bus: B,
        storage: S,
        services: NavigationServices,
        config: NavConfig,
    ) -> Self {
        let mut controller = Self::mount(bus, storage, services, config);
        controller.on_auth_changed();
        controller
    }

    pub fn view(&self) -> Option<&NavigationView> {
        self.store.view()
    }

    pub fn store(&self) -> &SessionProjectionStore {
        &self.store
    }

    pub fn storage(&self) -> &PersistedState<S> {
        &self.storage
    }

    pub fn is_disposed(&self) -> bool {
        self.store.state() == ProjectionState::Disposed
    }

    /// Drain pending bus messages in arrival order. Returns how many were
    /// handled.
    pub fn pump(&mut self) -> usize {
        let Some(subscription) = self.subscription.as_ref() else {
            return 0;
        };
        let pending: Vec<BusMessage> = std::iter::from_fn(|| subscription.try_recv().ok()).collect();

        let count = pending.len();
        for message in pending {
            self.handle_message(&message);
        }
        count
    }

    /// Handle one bus message.
    pub fn handle_message(&mut self, message: &BusMessage) {
        if self.is_disposed() {
            tracing::debug!(topic = %message.topic(), "message after dispose ignored");
            return;
        }

        match Inbound::decode(message) {
            Ok(Some(inbound)) => self.handle_inbound(inbound),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "skipping undecodable bus message"),
        }
    }

    /// Provider callback: authentication state may have changed.
    pub fn on_auth_changed(&mut self) {
        if self.is_disposed() {
            return;
        }

        let mut session = self.services.provider.snapshot();
        if session.is_authenticated {
            session.claims.fill_missing_from(&self.storage.cached_claims());
        }
        tracing::debug!(authenticated = session.is_authenticated, "session updated");

        self.apply(NavEvent::Auth(session.clone()));

        let sinks = LocaleSinks {
            storage: &self.storage,
            bus: &self.bus,
        };
        if let Some(id) = self.locale.apply_session_fallback(&session, sinks) {
            self.apply(NavEvent::Locale(LocaleUpdate::Selected(id)));
        }

        self.fetch_tenant_if_needed(&session);
    }

    /// The user picked a language.
    pub fn select_locale(&mut self, id: LocaleId) {
        if self.is_disposed() {
            return;
        }

        let session = self.store.session().cloned().unwrap_or_else(Session::anonymous);
        let sinks = LocaleSinks {
            storage: &self.storage,
            bus: &self.bus,
        };
        self.locale.select_locale(id.clone(), &session, sinks);
        self.apply(NavEvent::Locale(LocaleUpdate::Selected(id)));
    }

    /// The user asked to sign out. The provider announces the new state on
    /// its own channel.
    pub fn logout(&self) {
        if self.is_disposed() {
            return;
        }
        self.services.provider.logout();
    }

    /// Unsubscribe and drop all retained state. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            if !self.bus.unsubscribe(subscription.id()) {
                tracing::debug!(subscription = %subscription.id(), "subscription already gone");
            }
        }
        self.store.dispose();
        tracing::debug!("navigation disposed");
    }

    fn handle_inbound(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::AuthChanged => self.on_auth_changed(),
            Inbound::Tenant { context, record } => self.receive_tenant(context, record.as_ref()),
            Inbound::Route(route) => self.apply(NavEvent::Route(route)),
            Inbound::Form(form) => self.apply(NavEvent::Form(form)),
        }
    }

    fn receive_tenant(&mut self, mut context: TenantContext, record: Option<&TenantRecord>) {
        let cached = self.storage.tenant_record();
        if let Some(cached) = cached.as_ref() {
            context.inherit_branding(cached);
        }
        if let Some(record) = record {
            self.persist_tenant(record, &context, cached.as_ref());
        }
        self.apply(NavEvent::Tenant(context));
    }

    fn persist_tenant(
        &self,
        record: &TenantRecord,
        context: &TenantContext,
        cached: Option<&TenantRecord>,
    ) {
        let policy = self.store.config().tenant_cache_policy;
        if policy == TenantCachePolicy::KeepExistingNamed && cached.is_some_and(|r| r.has_name()) {
            tracing::debug!("keeping named persisted tenant record");
            return;
        }

        // Details are not re-sent with every delivery; keep the cached ones.
        let mut record = record.clone();
        if record.details.is_none() {
            if let Some(cached) = cached.filter(|c| context.matches_record(c)) {
                record.details = cached.details.clone();
            }
        }

        if let Err(e) = self.storage.save_tenant_record(&record) {
            tracing::warn!(error = %e, "failed to persist tenant record");
        }
    }

    fn recover_tenant(&mut self) {
        let Some(record) = self.storage.tenant_record() else {
            return;
        };
        let context = TenantContext::from_record(None, Some(&record), TenantOrigin::Persisted);
        self.apply(NavEvent::Tenant(context));
    }

    fn load_locales(&mut self) {
        let available = match self.services.catalog.list_locales() {
            Ok(available) => available,
            Err(e) => {
                tracing::warn!(error = %e, "locale catalog unavailable");
                Vec::new()
            }
        };
        self.apply(NavEvent::Locale(LocaleUpdate::Available(available)));
    }

    fn fetch_tenant_if_needed(&mut self, session: &Session) {
        if !self.store.config().multi_tenancy_enabled || !session.is_authenticated {
            return;
        }
        let has_fresh_tenant = self
            .store
            .tenant()
            .is_some_and(|t| t.origin == TenantOrigin::Fetched && t.tenant_id.is_some());
        if has_fresh_tenant {
            return;
        }
        let Some(service) = self.services.tenant_service.clone() else {
            return;
        };

        match service.fetch_tenant(session) {
            Ok(record) => {
                let context = TenantContext::from_record(None, Some(&record), TenantOrigin::Fetched);
                self.receive_tenant(context, Some(&record));
            }
            Err(e) => tracing::warn!(error = %e, "tenant details fetch failed"),
        }
    }

    fn apply(&mut self, event: NavEvent) {
        match self.store.apply(event) {
            Ok(_) => {}
            Err(NavError::SubscriptionAfterDispose) => {
                tracing::debug!("update after dispose ignored");
            }
            Err(e) => tracing::warn!(error = %e, "navigation update rejected"),
        }
    }
}
