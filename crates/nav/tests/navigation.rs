//! End-to-end behavior of a mounted navigation over the in-memory bus.

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use tenantnav_auth::{AuthProvider, Role, StaticAuthProvider, UserClaims};
use tenantnav_core::{LocaleId, NavConfig, NavResult, TenantCachePolicy};
use tenantnav_events::{BusMessage, EventBus, InMemoryEventBus, Topic};
use tenantnav_infra::{
    InMemoryKeyValueStore, KeyValueStore, LocaleOption, NoopLocaleUpdater, StaticLocaleCatalog,
    Translator, keys,
};
use tenantnav_nav::{NavigationController, NavigationServices, ProjectionState, Section};

/// Store wrapper that records every write.
#[derive(Debug, Default)]
struct RecordingStore {
    inner: InMemoryKeyValueStore,
    writes: Mutex<Vec<(String, String)>>,
}

impl RecordingStore {
    fn seeded(entries: &[(&str, &str)]) -> Self {
        Self {
            inner: InMemoryKeyValueStore::with_entries(entries.iter().copied()),
            writes: Mutex::new(Vec::new()),
        }
    }

    fn writes_to(&self, key: &str) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

impl KeyValueStore for RecordingStore {
    fn get(&self, key: &str) -> NavResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> NavResult<()> {
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> NavResult<()> {
        self.inner.remove(key)
    }
}

#[derive(Debug, Default)]
struct RecordingTranslator {
    switches: Mutex<Vec<LocaleId>>,
}

impl RecordingTranslator {
    fn switches(&self) -> Vec<LocaleId> {
        self.switches.lock().unwrap().clone()
    }
}

impl Translator for RecordingTranslator {
    fn change_language(&self, locale: &LocaleId) {
        self.switches.lock().unwrap().push(locale.clone());
    }
}

type Bus = Arc<InMemoryEventBus<BusMessage>>;
type Nav = NavigationController<Bus, Arc<RecordingStore>>;

struct Harness {
    bus: Bus,
    storage: Arc<RecordingStore>,
    provider: Arc<StaticAuthProvider>,
    translator: Arc<RecordingTranslator>,
    nav: Nav,
}

impl Harness {
    fn mount(provider: StaticAuthProvider, storage: RecordingStore, config: NavConfig) -> Self {
        let bus: Bus = Arc::new(InMemoryEventBus::new());
        let storage = Arc::new(storage);
        let provider = Arc::new(provider);
        let translator = Arc::new(RecordingTranslator::default());

        let services = NavigationServices {
            provider: provider.clone(),
            catalog: Arc::new(StaticLocaleCatalog::new(vec![
                LocaleOption::new(locale("en"), "English"),
                LocaleOption::new(locale("fr"), "Français"),
            ])),
            tenant_service: None,
            translator: translator.clone(),
            locale_updater: Arc::new(NoopLocaleUpdater),
        };

        let nav = NavigationController::mount(bus.clone(), storage.clone(), services, config);
        Self {
            bus,
            storage,
            provider,
            translator,
            nav,
        }
    }

    fn publish(&mut self, topic: Topic, payload: Value) {
        self.bus.publish(BusMessage::new(topic, payload)).unwrap();
        self.nav.pump();
    }
}

fn locale(raw: &str) -> LocaleId {
    LocaleId::parse(raw).unwrap()
}

fn multi_tenant() -> NavConfig {
    NavConfig {
        multi_tenancy_enabled: true,
        ..NavConfig::default()
    }
}

fn designer(locale_claim: Option<&str>) -> UserClaims {
    UserClaims {
        name: Some("Dana".into()),
        roles: [Role::from("formsflow-designer")].into_iter().collect(),
        locale: locale_claim.map(locale),
        ..UserClaims::default()
    }
}

#[test]
fn authenticated_tenant_scopes_every_link() {
    let mut h = Harness::mount(
        StaticAuthProvider::signed_in(designer(None)),
        RecordingStore::default(),
        multi_tenant(),
    );

    h.publish(Topic::Auth, Value::Null);
    h.publish(
        Topic::Tenant,
        json!({"tenantId": "acme", "tenantData": {"tenantId": "acme", "name": "Acme"}}),
    );
    h.publish(Topic::Route, json!({"pathname": "/tenant/acme/processes/12"}));

    let view = h.nav.view().unwrap();
    assert_eq!(view.base_url_prefix, "/tenant/acme/");
    assert_eq!(view.brand_path, "/tenant/acme/");
    assert_eq!(
        view.item(Section::Processes).unwrap().target_path,
        "/tenant/acme/processes"
    );
    assert!(view.item(Section::Processes).unwrap().is_active);
    assert!(!view.item(Section::Form).unwrap().is_active);
    assert_eq!(view.user_role_label, "Designer");
    assert_eq!(h.storage.writes_to(keys::TENANT_DATA).len(), 1);
}

#[test]
fn anonymous_form_access_uses_form_tenant() {
    let mut h = Harness::mount(
        StaticAuthProvider::anonymous(),
        RecordingStore::default(),
        multi_tenant(),
    );

    h.publish(Topic::Auth, Value::Null);
    h.publish(Topic::Form, json!({"tenantKey": "beta"}));

    let view = h.nav.view().unwrap();
    assert_eq!(view.base_url_prefix, "/tenant/beta/");
    assert_eq!(view.login_path.as_deref(), Some("/tenant/beta/"));
    assert_eq!(view.visible_items().count(), 0);
}

#[test]
fn explicit_selection_propagates_exactly_once() {
    let mut h = Harness::mount(
        StaticAuthProvider::signed_in(designer(Some("es"))),
        RecordingStore::default(),
        NavConfig::default(),
    );
    let languages = h.bus.subscribe(&[Topic::ChangeLanguage]);

    h.publish(Topic::Auth, Value::Null);
    let fallback: Vec<BusMessage> = std::iter::from_fn(|| languages.try_recv().ok()).collect();
    assert_eq!(fallback.len(), 1);

    h.nav.select_locale(locale("fr"));
    // A second auth update must not re-run the fallback over the choice.
    h.publish(Topic::Auth, Value::Null);

    let published: Vec<Value> = std::iter::from_fn(|| languages.try_recv().ok())
        .map(|m| m.into_payload())
        .collect();
    assert_eq!(published, vec![json!("fr")]);
    assert_eq!(h.storage.writes_to(keys::LOCALE), vec!["es", "fr"]);
    assert_eq!(h.translator.switches(), vec![locale("es"), locale("fr")]);

    let view = h.nav.view().unwrap();
    assert_eq!(view.locale.current, Some(locale("fr")));
    assert!(view.locale_switchable);
}

#[test]
fn late_tenant_delivery_after_dispose_has_no_effect() {
    let mut h = Harness::mount(
        StaticAuthProvider::signed_in(designer(None)),
        RecordingStore::default(),
        multi_tenant(),
    );
    h.publish(Topic::Auth, Value::Null);
    // Queued before dispose, drained after.
    h.bus
        .publish(BusMessage::new(
            Topic::Tenant,
            json!({"tenantData": {"tenantId": "late", "name": "Late"}}),
        ))
        .unwrap();

    h.nav.dispose();
    assert_eq!(h.nav.pump(), 0);
    h.nav.on_auth_changed();
    h.nav.select_locale(locale("fr"));

    assert_eq!(h.nav.store().state(), ProjectionState::Disposed);
    assert!(h.nav.view().is_none());
    assert!(h.storage.writes.lock().unwrap().is_empty());
    assert!(h.translator.switches().is_empty());
    assert_eq!(h.bus.subscriber_count(), 0);
}

#[test]
fn malformed_payloads_are_skipped() {
    let mut h = Harness::mount(
        StaticAuthProvider::signed_in(designer(None)),
        RecordingStore::default(),
        multi_tenant(),
    );
    h.publish(Topic::Auth, Value::Null);
    h.publish(Topic::Route, json!({"pathname": "/tenant/acme/form"}));

    h.publish(Topic::Route, json!({"path": 42}));
    h.publish(Topic::Tenant, json!({"tenantData": 7}));

    assert_eq!(h.nav.store().route().pathname, "/tenant/acme/form");
    assert!(h.nav.store().tenant().is_none());
}

#[test]
fn overwrite_policy_replaces_cached_record() {
    let cached = r#"{"tenantId":"acme","name":"Acme"}"#;
    let mut h = Harness::mount(
        StaticAuthProvider::signed_in(designer(None)),
        RecordingStore::seeded(&[(keys::TENANT_DATA, cached)]),
        multi_tenant(),
    );
    h.publish(Topic::Auth, Value::Null);
    h.publish(
        Topic::Tenant,
        json!({"tenantData": {"tenantId": "acme", "name": "Acme Corp"}}),
    );

    let stored = h.storage.get(keys::TENANT_DATA).unwrap().unwrap();
    assert!(stored.contains("Acme Corp"));
}

#[test]
fn keep_existing_named_policy_skips_write() {
    let cached = r#"{"tenantId":"acme","name":"Acme"}"#;
    let config = NavConfig {
        tenant_cache_policy: TenantCachePolicy::KeepExistingNamed,
        ..multi_tenant()
    };
    let mut h = Harness::mount(
        StaticAuthProvider::signed_in(designer(None)),
        RecordingStore::seeded(&[(keys::TENANT_DATA, cached)]),
        config,
    );
    h.publish(Topic::Auth, Value::Null);
    h.publish(
        Topic::Tenant,
        json!({"tenantData": {"tenantId": "acme", "name": "Acme Corp"}}),
    );

    assert!(h.storage.writes_to(keys::TENANT_DATA).is_empty());
    // The fresh context still drives the view.
    assert_eq!(h.nav.view().unwrap().base_url_prefix, "/tenant/acme/");
}

#[test]
fn logout_then_auth_update_shows_login() {
    let mut h = Harness::mount(
        StaticAuthProvider::signed_in(designer(None)),
        RecordingStore::default(),
        NavConfig::default(),
    );
    h.publish(Topic::Auth, Value::Null);
    assert!(!h.nav.view().unwrap().shows_login());

    h.nav.logout();
    h.publish(Topic::Auth, Value::Null);

    let view = h.nav.view().unwrap();
    assert!(view.shows_login());
    assert_eq!(view.user_display_name, "");
    assert!(!h.provider.is_authenticated());
}

#[test]
fn cached_roles_complete_sparse_provider_claims() {
    let roles = r#"["formsflow-admin"]"#;
    let mut h = Harness::mount(
        StaticAuthProvider::signed_in(UserClaims::default()),
        RecordingStore::seeded(&[(keys::USER_ROLE, roles)]),
        NavConfig::default(),
    );
    h.publish(Topic::Auth, Value::Null);

    let view = h.nav.view().unwrap();
    assert!(view.item(Section::Admin).unwrap().visible);
    assert_eq!(view.user_role_label, "Admin");
}

#[test]
fn tenant_delivery_without_details_keeps_persisted_branding() {
    let cached = r#"{"tenantId":"acme","details":{"applicationTitle":"Acme Forms","customLogo":{"logo":"/acme.png"}}}"#;
    let mut h = Harness::mount(
        StaticAuthProvider::signed_in(designer(None)),
        RecordingStore::seeded(&[(keys::TENANT_DATA, cached)]),
        multi_tenant(),
    );
    h.publish(Topic::Auth, Value::Null);
    assert_eq!(h.nav.view().unwrap().app_display_name, "Acme Forms");

    h.publish(Topic::Tenant, json!({"tenantId": "acme"}));
    let view = h.nav.view().unwrap();
    assert_eq!(view.app_display_name, "Acme Forms");
    assert_eq!(view.logo_path, "/acme.png");

    // A detail-less record for the same tenant does not erase cached details.
    h.publish(
        Topic::Tenant,
        json!({"tenantData": {"tenantId": "acme", "name": "Acme"}}),
    );
    assert_eq!(h.nav.view().unwrap().logo_path, "/acme.png");
    let stored = h.storage.get(keys::TENANT_DATA).unwrap().unwrap();
    assert!(stored.contains("Acme Forms"));

    // Another tenant starts without branding.
    h.publish(Topic::Tenant, json!({"tenantId": "zeta"}));
    let view = h.nav.view().unwrap();
    assert_eq!(view.base_url_prefix, "/tenant/zeta/");
    assert_eq!(view.app_display_name, "");
}
