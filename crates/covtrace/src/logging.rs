//! `tracing` subscriber setup for binaries and tests.
//!
//! The libraries only emit events; installing a subscriber is left to the
//! process that owns `main`.

use covtrace_error::{CoverageError, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Output format for [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable compact lines.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn default_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "trace" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global subscriber, writing to stderr so stdout stays free
/// for machine-readable output. `RUST_LOG` overrides the default level.
pub fn init_logging(format: LogFormat, verbose: bool) -> Result<()> {
    let registry = tracing_subscriber::registry().with(default_filter(verbose));
    let installed = match format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
    };
    installed.map_err(|error| CoverageError::config(format!("logging_init_failed error={error}")))
}

/// Initialize logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::registry()
        .with(default_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_test_writer()
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_formats() {
        assert_eq!(LogFormat::parse("compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("yaml"), None);
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }

    #[test]
    fn test_logging_is_reentrant() {
        init_test_logging();
        init_test_logging();
        tracing::info!("logging initialized twice without panicking");
    }
}
