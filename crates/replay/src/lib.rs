//! Scripted replay of navigation inputs.
//!
//! Mounts a `NavigationController` over in-memory collaborators, feeds it the
//! script's steps in order and writes the resulting view after each step as
//! one JSON line (`null` while the view is hidden).

pub mod script;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;

use tenantnav_auth::StaticAuthProvider;
use tenantnav_core::NavConfig;
use tenantnav_events::{BusMessage, EventBus, InMemoryEventBus};
use tenantnav_infra::{
    InMemoryTranslator, KeyValueStore, NoopLocaleUpdater, StaticLocaleCatalog,
    StaticTenantService, TenantService,
};
use tenantnav_nav::{NavigationController, NavigationServices, NavigationView};

pub use script::{AuthFixture, Script, Step};

/// Output options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayOptions {
    /// Pretty-print each view (no longer one line per step).
    pub pretty: bool,
}

/// Replay `script` against `storage`, writing one view per step to `out`.
/// Returns the number of steps replayed.
pub fn run<S, W>(
    script: &Script,
    config: NavConfig,
    storage: S,
    options: ReplayOptions,
    out: &mut W,
) -> anyhow::Result<usize>
where
    S: KeyValueStore,
    W: Write,
{
    for (key, value) in &script.storage {
        storage
            .set(key, value)
            .with_context(|| format!("failed to seed storage key {key}"))?;
    }

    let provider = Arc::new(if script.auth.authenticated {
        StaticAuthProvider::signed_in(script.auth.claims.clone())
    } else {
        StaticAuthProvider::anonymous()
    });
    let tenant_service = script
        .tenant
        .clone()
        .map(|record| Arc::new(StaticTenantService::new(Some(record))) as Arc<dyn TenantService>);

    let bus: Arc<InMemoryEventBus<BusMessage>> = Arc::new(InMemoryEventBus::new());
    let services = NavigationServices {
        provider: provider.clone(),
        catalog: Arc::new(StaticLocaleCatalog::new(script.locales.clone())),
        tenant_service,
        translator: Arc::new(InMemoryTranslator::new()),
        locale_updater: Arc::new(NoopLocaleUpdater),
    };

    let mut nav = NavigationController::mount(bus.clone(), storage, services, config);

    for (index, step) in script.steps.iter().enumerate() {
        tracing::debug!(step = index, "replaying step");
        match step {
            Step::Publish { topic, payload } => {
                bus.publish(BusMessage::new(*topic, payload.clone()))
                    .with_context(|| format!("step {index}: publish on {topic} failed"))?;
                nav.pump();
            }
            Step::Login(claims) => {
                provider.sign_in(claims.clone());
                nav.on_auth_changed();
            }
            Step::Logout => {
                nav.logout();
                nav.on_auth_changed();
            }
            Step::SelectLocale(id) => nav.select_locale(id.clone()),
        }
        write_view(out, nav.view(), options)
            .with_context(|| format!("step {index}: failed to write view"))?;
    }

    nav.dispose();
    Ok(script.steps.len())
}

fn write_view<W: Write>(
    out: &mut W,
    view: Option<&NavigationView>,
    options: ReplayOptions,
) -> anyhow::Result<()> {
    if options.pretty {
        serde_json::to_writer_pretty(&mut *out, &view)?;
    } else {
        serde_json::to_writer(&mut *out, &view)?;
    }
    writeln!(out)?;
    Ok(())
}
