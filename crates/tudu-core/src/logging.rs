//! File-based logging setup.
//!
//! The TUI owns the terminal while it runs, so log output goes to daily
//! rolling files under the tudu home directory instead of stderr. The
//! returned guard must be held for the lifetime of the process; dropping
//! it flushes buffered lines.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Environment variable that overrides the default log filter.
pub const LOG_FILTER_ENV_VAR: &str = "TUDU_LOG";

/// Installs the global subscriber writing to `<logs_dir>/tudu.log.<date>`.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn init(logs_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory at {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::daily(logs_dir, "tudu.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // TUDU_LOG=
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .with_env_var(LOG_FILTER_ENV_VAR)
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_ansi(false);

    let subscriber = Registry::default().with(fmt_layer).with(env_filter);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
