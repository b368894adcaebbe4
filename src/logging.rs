//! Logging setup for hosts of the virtual file system.
//!
//! The library itself only emits `tracing` events; a host (such as the `vfs-shell` binary)
//! calls [`init_logging`] once to install a subscriber that writes them to stderr.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a full filter directive; it overrides the configured level.
pub const LOG_ENV: &str = "VFS_LOG";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    pub level: String,

    /// Enable colored output
    pub color: bool,

    /// Module-specific log levels, e.g. `vfs_tree::shell` => `debug`
    pub modules: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "warn".to_string(),
            color: true,
            modules: HashMap::new(),
        }
    }
}

/// Installs the global subscriber.
///
/// Priority order: the `VFS_LOG` environment variable, then `config`. Fails if a subscriber
/// is already installed or a directive does not parse.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    if !config.enabled {
        Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .context("failed to install log subscriber")?;
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(config.color)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("failed to install log subscriber")?;
    Ok(())
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => filter_from_config(config),
    }
}

/// Filter built from `config` alone: the base level plus one directive per module.
fn filter_from_config(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("invalid log level: {}", config.level))?;
    for (module, level) in &config.modules {
        let directive = format!("{module}={level}");
        filter = filter.add_directive(
            directive
                .parse()
                .with_context(|| format!("invalid log directive: {directive}"))?,
        );
    }
    Ok(filter)
}
