//! Process-wide tracing setup shared by the navigation binaries.
//!
//! Logs always go to stderr: stdout is reserved for program output (the
//! replay tool streams views there).

use tracing_subscriber::EnvFilter;

/// Log line encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    /// Human-readable, for local runs.
    Pretty,
}

impl LogFormat {
    /// Reads `TENANTNAV_LOG_FORMAT` (`json` or `pretty`); anything else is JSON.
    pub fn from_env() -> Self {
        match std::env::var("TENANTNAV_LOG_FORMAT").as_deref() {
            Ok("pretty") => Self::Pretty,
            _ => Self::Json,
        }
    }
}

/// Initialize tracing with the format from the environment.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    init_with(LogFormat::from_env(), "info");
}

/// Initialize tracing with an explicit format. `RUST_LOG` still overrides
/// `default_directive`.
pub fn init_with(format: LogFormat, default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    match installed {
        Ok(()) => tracing::debug!(?format, "tracing initialized"),
        // Reported through whichever subscriber is already installed.
        Err(e) => tracing::debug!(?format, error = %e, "tracing already initialized"),
    }
}
