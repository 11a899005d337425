//! Log output for the binaries and test suites.
//!
//! Events are filtered by `RUST_LOG` (falling back to a caller-chosen level)
//! and rendered either as Bunyan JSON lines, for piping estimation runs into
//! log tooling, or as plain human-readable lines.
use crate::error::{Error, Result};
use std::str::FromStr;
use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Registry, fmt::MakeWriter, layer::SubscriberExt};

/// Environment variable naming the [`LogFormat`] of the command-line tools.
pub const LOG_FORMAT_VAR: &str = "PAIRWISE_LOG_FORMAT";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Bunyan,
    /// `tracing_subscriber`'s default text lines.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bunyan" | "json" => Ok(Self::Bunyan),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(Error::InvalidConfig(format!(
                "unknown log format {:?}, expected \"bunyan\" or \"pretty\"",
                other
            ))),
        }
    }
}

impl LogFormat {
    /// Reads [`LOG_FORMAT_VAR`]; unset means the default.
    pub fn from_env() -> Result<Self> {
        match std::env::var(LOG_FORMAT_VAR) {
            Ok(value) => value.parse(),
            Err(_) => Ok(Self::default()),
        }
    }
}

/// Builds a subscriber writing `format` lines to `sink`.
/// `RUST_LOG`, when set, overrides `env_filter`.
pub fn get_subscriber(
    name: &str,
    env_filter: &str,
    format: LogFormat,
    sink: impl for<'a> MakeWriter<'a> + Send + Sync + 'static,
) -> Box<dyn Subscriber + Send + Sync> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let registry = Registry::default().with(env_filter);
    match format {
        LogFormat::Bunyan => Box::new(
            registry
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(name.to_owned(), sink)),
        ),
        LogFormat::Pretty => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(sink),
            ),
        ),
    }
}

/// Registers `subscriber` as the global default and routes `log` records to it.
/// Fails if a global subscriber or logger is already installed.
pub fn init_subscriber(
    subscriber: impl Subscriber + Send + Sync + 'static,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}

/// Global logging for a command-line tool: `info` and up, to stdout, in the
/// format named by [`LOG_FORMAT_VAR`]. Problems are reported on stderr and
/// never stop the tool.
pub fn init_cli_logging(name: &str) {
    let format = LogFormat::from_env().unwrap_or_else(|err| {
        eprintln!("{}; using {:?}", err, LogFormat::default());
        LogFormat::default()
    });
    if let Err(err) = init_subscriber(get_subscriber(name, "info", format, std::io::stdout)) {
        eprintln!("Failed to set up logging: {}", err);
    }
}
