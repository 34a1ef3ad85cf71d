//! Shared configuration for RemoteDAQ.
//!
//! The TOML application config (timeouts, refresh cadence, DAQ port,
//! channel layout), the `settings.json` network settings store, and
//! translation to `remotedaq_core::DashboardConfig`. The CLI adds
//! `GlobalOpts`-aware overrides on top.

pub mod settings;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use remotedaq_core::{ChannelLayout, DashboardConfig, NodeFilter, TlsVerification};

pub use settings::SettingsStore;

/// Prefix for every environment override.
pub const ENV_PREFIX: &str = "REMOTEDAQ_";

/// Environment variable carrying this machine's ZeroTier node id.
pub const NODE_ID_ENV: &str = "REMOTEDAQ_NODE_ID";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Directory refresh cadence in seconds. Zero disables the loop.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Port every node's HTTP server listens on.
    #[serde(default = "default_daq_port")]
    pub daq_port: u16,

    /// ZeroTier id of this machine, hidden from node listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_node_id: Option<String>,

    /// ZeroTier Central API root.
    #[serde(default = "default_zerotier_api_url")]
    pub zerotier_api_url: String,

    /// Extra CA certificate for the ZeroTier API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override for the `settings.json` location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_path: Option<PathBuf>,

    /// Override for the rolling log directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Output and color defaults for the CLI.
    #[serde(default)]
    pub defaults: Defaults,

    /// Channel counts per group.
    #[serde(default)]
    pub channels: ChannelLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
            daq_port: default_daq_port(),
            local_node_id: None,
            zerotier_api_url: default_zerotier_api_url(),
            ca_cert: None,
            settings_path: None,
            log_dir: None,
            defaults: Defaults::default(),
            channels: ChannelLayout::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    3
}
fn default_daq_port() -> u16 {
    5000
}
fn default_zerotier_api_url() -> String {
    "https://api.zerotier.com/api/v1/".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "remotedaq", "remotedaq")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("remotedaq");
    p
}

/// Platform config directory (XDG on Linux).
pub fn config_dir() -> PathBuf {
    project_dirs().map_or_else(dirs_fallback, |dirs| dirs.config_dir().to_path_buf())
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default directory for the rolling log file.
pub fn default_log_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("logs"),
        |dirs| dirs.data_local_dir().join("logs"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Nested keys use a double underscore: `REMOTEDAQ_CHANNELS__ANALOG_OUTPUT=2`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["node_id", "settings", "config", "log"])
                .split("__"),
        );

    let mut config: Config = figment.extract()?;
    if let Some(id) = std::env::var(NODE_ID_ENV)
        .ok()
        .filter(|id| !id.trim().is_empty())
    {
        config.local_node_id = Some(id);
    }
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML at `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Where the network settings live.
    pub fn settings_location(&self) -> PathBuf {
        self.settings_path
            .clone()
            .unwrap_or_else(SettingsStore::default_location)
    }

    /// Where the rolling log file goes.
    pub fn log_location(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(default_log_dir)
    }
}

/// Build a `DashboardConfig` from the file config.
///
/// Every request must carry a timeout, so a zero timeout is rejected.
pub fn to_dashboard_config(cfg: &Config) -> Result<DashboardConfig, ConfigError> {
    let zerotier_url: url::Url =
        cfg.zerotier_api_url
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "zerotier_api_url".into(),
                reason: format!("invalid URL: {}", cfg.zerotier_api_url),
            })?;

    if cfg.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let tls = cfg
        .ca_cert
        .as_ref()
        .map_or(TlsVerification::SystemDefaults, |ca| {
            TlsVerification::CustomCa(ca.clone())
        });

    Ok(DashboardConfig {
        zerotier_url,
        tls,
        timeout: Duration::from_secs(cfg.timeout),
        refresh_interval: Duration::from_secs(cfg.refresh_interval),
        daq_port: cfg.daq_port,
        local_node_id: cfg.local_node_id.clone(),
        node_filter: NodeFilter::Online,
        channels: cfg.channels,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_translate_to_dashboard_defaults() {
        let dash = to_dashboard_config(&Config::default()).unwrap();
        let expected = DashboardConfig::default();
        assert_eq!(dash.zerotier_url, expected.zerotier_url);
        assert_eq!(dash.timeout, expected.timeout);
        assert_eq!(dash.refresh_interval, expected.refresh_interval);
        assert_eq!(dash.daq_port, expected.daq_port);
        assert_eq!(dash.channels, expected.channels);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = Config {
            timeout: 0,
            ..Config::default()
        };
        assert!(matches!(
            to_dashboard_config(&cfg),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn bad_url_is_rejected() {
        let cfg = Config {
            zerotier_api_url: "not a url".into(),
            ..Config::default()
        };
        let err = to_dashboard_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("zerotier_api_url"));
    }

    #[test]
    fn ca_cert_selects_custom_tls() {
        let cfg = Config {
            ca_cert: Some(PathBuf::from("/etc/ssl/zt.pem")),
            ..Config::default()
        };
        let dash = to_dashboard_config(&cfg).unwrap();
        assert_eq!(
            dash.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/ssl/zt.pem"))
        );
    }

    #[test]
    fn toml_round_trips() {
        let cfg = Config {
            daq_port: 8080,
            local_node_id: Some("a1b2c3d4e5".into()),
            ..Config::default()
        };
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
