//! Logging initialization for the nixbom CLI.
//!
//! Configures `tracing-subscriber` based on the `[general]` section
//! of `NixbomConfig`. Log lines go to stderr so that `--output json`
//! on stdout stays machine-readable.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use nixbom_core::config::{GeneralConfig, validate_log_level};

use crate::error::CliError;

/// Apply the `--log-level` flag on top of the configured `[general]` section.
///
/// The flag is checked against the same level list as `general.log_level`,
/// so a typo is reported instead of becoming an `EnvFilter` directive.
pub fn apply_log_level_override(
    mut general: GeneralConfig,
    level: Option<&str>,
) -> Result<GeneralConfig, CliError> {
    if let Some(level) = level {
        validate_log_level(level).map_err(|e| CliError::Config(format!("--log-level: {e}")))?;
        general.log_level = level.to_owned();
    }
    Ok(general)
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
/// `RUST_LOG` takes precedence over `config.log_level`.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable colored output
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize pretty tracing subscriber: {}", e)
                })?;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                config.log_format
            ));
        }
    }

    Ok(())
}
