//! Stderr logging bootstrap.
//!
//! The daemon speaks its protocol on stdout, so all diagnostics go to
//! stderr where the host process can capture them. The level spec is
//! read from `GRADETRACKD_LOG` and defaults to `info`.

use anyhow::Context;
use flexi_logger::{Logger, LoggerHandle};
use once_cell::sync::OnceCell;

const LOG_ENV_VAR: &str = "GRADETRACKD_LOG";

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

/// Initializes logging once per process; later calls are no-ops.
pub fn init() -> anyhow::Result<()> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let spec = std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| "info".to_string());
    let handle = Logger::try_with_str(&spec)
        .with_context(|| format!("invalid log spec `{spec}`"))?
        .log_to_stderr()
        .start()
        .context("failed to start logger")?;

    let _ = LOGGER.set(handle);
    Ok(())
}
