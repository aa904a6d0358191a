// Logging setup
//
// EnvFilter (RUST_LOG, default "mailroom=info") plus a pretty or JSON fmt
// layer. Secrets are redacted by the Debug impls of the types that hold them.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FORMAT_ENV: &str = "MAILROOM_LOG_FORMAT";
const DEFAULT_FILTER: &str = "mailroom=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Development: human readable, colored
    #[default]
    Pretty,
    /// Production: one JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("unknown log format {other:?} (expected pretty or json)")),
        }
    }
}

impl LogFormat {
    /// Read MAILROOM_LOG_FORMAT, falling back to pretty
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

fn env_filter() -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")
}

/// Install the global subscriber writing to stdout
pub fn init_logging(format: LogFormat) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter()?);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
    }
    .context("Failed to install tracing subscriber")
}

/// Install the global subscriber writing to a daily rolling file.
///
/// Keep the returned guard alive for as long as events should be flushed.
pub fn init_logging_with_file(format: LogFormat, dir: &Path, file_prefix: &str) -> Result<WorkerGuard> {
    let appender = tracing_appender::rolling::daily(dir, file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let registry = tracing_subscriber::registry().with(env_filter()?);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_ansi(false).with_writer(writer))
            .try_init(),
    }
    .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
