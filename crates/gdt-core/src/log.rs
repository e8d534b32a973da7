//! Logger installation.
//!
//! Everything in the workspace logs through the `tracing` facade. Call
//! [`init_logging`] early in `main`; libraries never install a subscriber on
//! their own.

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Subscriber configuration.
///
/// `filter` uses the `EnvFilter` directive syntax (e.g. `"info"` or
/// `"gdt_gpu=debug,gdt_device=warn"`). When it is `None` the `RUST_LOG`
/// environment variable is consulted, then `info` is used.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub filter: Option<String>,
    pub ansi: bool,
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: None,
            ansi: true,
            with_target: true,
        }
    }
}

impl LogConfig {
    fn env_filter(&self) -> Result<EnvFilter> {
        let filter = match &self.filter {
            Some(directives) => EnvFilter::try_new(directives)?,
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };
        Ok(filter)
    }
}

/// Install the global `tracing` subscriber.
///
/// Idempotent: once a subscriber has been installed by this function, later
/// calls return `Ok(())` without touching the global state.
pub fn init_logging(config: LogConfig) -> Result<()> {
    INSTALLED.get_or_try_init(|| {
        let filter = config.env_filter()?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(config.ansi)
            .with_target(config.with_target)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;

        tracing::debug!("logging initialized");
        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_filter() {
        let config = LogConfig {
            filter: Some("gdt_gpu=loud".to_string()),
            ..LogConfig::default()
        };
        assert!(config.env_filter().is_err());
    }

    #[test]
    fn second_install_is_a_no_op() {
        let config = LogConfig {
            filter: Some("warn".to_string()),
            ansi: false,
            with_target: false,
        };
        init_logging(config.clone()).unwrap();
        init_logging(config).unwrap();
    }
}
