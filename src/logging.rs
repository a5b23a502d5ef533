//! Tracing setup for the `dora` binary.
//!
//! Human-readable output always goes to stderr so it never mixes with the
//! tables and charts on stdout. When a log directory is configured, a
//! second JSON layer writes to a daily rolling file.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_FILE_PREFIX: &str = "dora.log";

/// Directive used when `RUST_LOG` is unset. Dependencies stay at `warn`.
pub fn filter_directive(level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { level.trim() };
    format!("warn,dora_dash={level},dora={level}")
}

/// `RUST_LOG` wins; otherwise `--verbose`, otherwise the configured level.
pub fn build_filter(level: &str, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level, verbose)))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held
/// until the process exits.
pub fn init(level: &str, verbose: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(build_filter(level, verbose))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialise logging")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_applies_to_both_crates() {
        assert_eq!(
            filter_directive("info", false),
            "warn,dora_dash=info,dora=info"
        );
    }

    #[test]
    fn test_verbose_forces_debug() {
        assert_eq!(
            filter_directive("error", true),
            "warn,dora_dash=debug,dora=debug"
        );
    }

    #[test]
    fn test_directive_parses_as_filter() {
        assert!(EnvFilter::try_new(filter_directive(" trace ", false)).is_ok());
    }
}
