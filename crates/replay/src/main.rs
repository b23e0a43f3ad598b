use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use tenantnav_core::NavConfig;
use tenantnav_infra::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
use tenantnav_replay::{ReplayOptions, Script};

/// Replay navigation inputs and print the derived view after each step.
#[derive(Debug, Parser)]
#[command(name = "tenantnav-replay", version)]
struct Args {
    /// JSON replay script.
    #[arg(long)]
    script: PathBuf,

    /// Force multi-tenancy on, whatever the configuration says.
    #[arg(long)]
    multi_tenancy: bool,

    /// Pretty-print views.
    #[arg(long)]
    pretty: bool,

    /// Persist client storage to this JSON file instead of memory.
    #[arg(long)]
    storage: Option<PathBuf>,
}

fn main() -> Result<()> {
    tenantnav_observability::init();
    let args = Args::parse();

    let script = Script::load(&args.script)?;
    let mut config = script.config.clone().unwrap_or_else(NavConfig::from_env);
    if args.multi_tenancy {
        config.multi_tenancy_enabled = true;
    }

    let storage: Arc<dyn KeyValueStore> = match &args.storage {
        Some(path) => Arc::new(FileKeyValueStore::open(path)?),
        None => Arc::new(InMemoryKeyValueStore::new()),
    };

    let options = ReplayOptions {
        pretty: args.pretty,
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let steps = tenantnav_replay::run(&script, config, storage, options, &mut out)?;
    out.flush()?;

    tracing::info!(steps, "replay finished");
    Ok(())
}
