//! CLI configuration: thin wrapper around `remotedaq_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--config, --settings, --timeout).

use std::time::Duration;

use remotedaq_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use remotedaq_config::{Config, SettingsStore, config_path};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Load the config file named by `--config`, or the canonical one.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let cfg = match global.config.as_deref() {
        Some(path) => remotedaq_config::load_config_from(path)?,
        None => remotedaq_config::load_config()?,
    };
    Ok(cfg)
}

/// Config file path in effect for this invocation.
pub fn active_config_path(global: &GlobalOpts) -> std::path::PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Settings store location: `--settings` > `settings_path` > default.
pub fn settings_store(global: &GlobalOpts, cfg: &Config) -> SettingsStore {
    let path = global
        .settings
        .clone()
        .unwrap_or_else(|| cfg.settings_location());
    SettingsStore::new(path)
}

/// Translate the config file plus global flags into a `DashboardConfig`.
pub fn dashboard_config(global: &GlobalOpts, cfg: &Config) -> Result<DashboardConfig, CliError> {
    let mut dash = remotedaq_config::to_dashboard_config(cfg)?;
    if let Some(secs) = global.timeout {
        if secs == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        dash.timeout = Duration::from_secs(secs);
    }
    Ok(dash)
}
