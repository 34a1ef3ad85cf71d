//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::net::IpAddr;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use remotedaq_core::{Dashboard, DashboardConfig, NodeFilter, NodeRecord, Settings};

use crate::cli::GlobalOpts;
use crate::config::{self, Config, SettingsStore};
use crate::error::CliError;

/// Everything a node-facing command needs before it touches the network.
pub struct Session {
    pub dashboard: Dashboard,
    pub store: SettingsStore,
}

/// Load the stored settings and build a dashboard. No network traffic.
pub fn session(global: &GlobalOpts, cfg: &Config) -> Result<Session, CliError> {
    session_with(global, cfg, |_| {})
}

/// Like [`session`], with a hook to adjust the dashboard config.
pub fn session_with(
    global: &GlobalOpts,
    cfg: &Config,
    adjust: impl FnOnce(&mut DashboardConfig),
) -> Result<Session, CliError> {
    let store = config::settings_store(global, cfg);
    let settings = store.load();
    tracing::debug!(path = %store.path().display(), ?settings, "settings loaded");

    let mut dash_cfg = config::dashboard_config(global, cfg)?;
    adjust(&mut dash_cfg);
    let dashboard = Dashboard::new(dash_cfg, settings).map_err(CliError::from)?;
    Ok(Session { dashboard, store })
}

impl Session {
    /// Convert a core error, pointing settings errors at the settings file.
    pub fn error(&self, err: remotedaq_core::CoreError) -> CliError {
        match CliError::from(err) {
            CliError::NoNetworkSettings { field, .. } => CliError::NoNetworkSettings {
                field,
                path: self.store.path().display().to_string(),
            },
            other => other,
        }
    }

    fn settings(&self) -> std::sync::Arc<Settings> {
        self.dashboard.settings()
    }
}

/// Resolve a node identifier and select it on the dashboard.
///
/// Tries the published list, then the full directory. An identifier that
/// looks like an address is accepted as-is when the directory has no match
/// or cannot be queried.
pub async fn resolve_node(session: &Session, identifier: &str) -> Result<NodeRecord, CliError> {
    let dash = &session.dashboard;
    if let Ok(node) = dash.select_by(identifier) {
        return Ok(node);
    }

    let addressable = looks_like_host(identifier);
    if session.settings().is_complete() || !addressable {
        match dash.query_nodes(NodeFilter::All).await {
            Ok(nodes) => {
                if let Some(node) = nodes.into_iter().find(|n| n.matches(identifier)) {
                    dash.select_node(node.clone());
                    return Ok(node);
                }
            }
            Err(e) if addressable => {
                tracing::warn!(error = %e, "directory lookup failed, using address directly");
            }
            Err(e) => return Err(session.error(e)),
        }
    }

    if addressable {
        return dash.select_host(identifier).map_err(CliError::from);
    }
    Err(CliError::NodeNotFound {
        identifier: identifier.into(),
    })
}

/// An IP literal or a dotted hostname.
fn looks_like_host(identifier: &str) -> bool {
    identifier.parse::<IpAddr>().is_ok() || identifier.contains('.')
}

/// Spinner on stderr while a request is in flight. Hidden when quiet or
/// when stderr is not a terminal.
pub fn spinner(message: impl Into<String>, quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Show the first and last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
