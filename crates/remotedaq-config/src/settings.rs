// ── Network settings store ──
//
// `settings.json` is the only persisted state: the ZeroTier API token and
// network id. Reads never fail; writes propagate every filesystem error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use remotedaq_core::Settings;

use crate::ConfigError;

/// On-disk shape. Missing keys read as empty strings.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct SettingsFile {
    zt_token: String,
    zt_net_id: String,
}

/// Loads and saves [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub const FILE_NAME: &'static str = "settings.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `settings.json` in the platform config directory.
    pub fn default_location() -> PathBuf {
        crate::config_dir().join(Self::FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the settings, falling back to empty fields on any problem.
    pub fn load(&self) -> Settings {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using empty settings");
                return Settings::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read settings file");
                return Settings::default();
            }
        };

        if text.trim().is_empty() {
            return Settings::default();
        }

        match serde_json::from_str::<SettingsFile>(&text) {
            Ok(file) => Settings::new(file.zt_token, file.zt_net_id),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring invalid settings file");
                Settings::default()
            }
        }
    }

    /// Overwrite the file with `settings`, creating its directory if needed.
    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = SettingsFile {
            zt_token: settings.auth_token.expose_secret().to_owned(),
            zt_net_id: settings.network_id.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
