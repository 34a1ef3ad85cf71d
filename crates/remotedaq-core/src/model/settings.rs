// ── Network settings ──

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Credentials for the node directory: ZeroTier API token and network id.
///
/// Both fields are plain strings with no validation; empty means unset.
#[derive(Clone)]
pub struct Settings {
    pub auth_token: SecretString,
    pub network_id: String,
}

impl Settings {
    pub fn new(auth_token: impl Into<String>, network_id: impl Into<String>) -> Self {
        Self {
            auth_token: SecretString::from(auth_token.into()),
            network_id: network_id.into(),
        }
    }

    /// `true` when both the token and the network id are non-empty.
    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    /// First empty field, token before network id.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.auth_token.expose_secret().is_empty() {
            Some("auth_token")
        } else if self.network_id.is_empty() {
            Some("network_id")
        } else {
            None
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

impl PartialEq for Settings {
    fn eq(&self, other: &Self) -> bool {
        self.auth_token.expose_secret() == other.auth_token.expose_secret()
            && self.network_id == other.network_id
    }
}

impl Eq for Settings {}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.auth_token.expose_secret().is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("Settings")
            .field("auth_token", &token)
            .field("network_id", &self.network_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty_and_incomplete() {
        let settings = Settings::default();
        assert_eq!(settings.auth_token.expose_secret(), "");
        assert_eq!(settings.network_id, "");
        assert!(!settings.is_complete());
    }

    #[test]
    fn token_is_reported_missing_before_network() {
        assert_eq!(Settings::default().missing_field(), Some("auth_token"));
        assert_eq!(Settings::new("tok", "").missing_field(), Some("network_id"));
        assert_eq!(Settings::new("", "net").missing_field(), Some("auth_token"));
        assert_eq!(Settings::new("tok", "net").missing_field(), None);
    }

    #[test]
    fn debug_never_prints_token() {
        let settings = Settings::new("zt-secret-token", "8056c2e21c000001");
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("zt-secret-token"));
        assert!(rendered.contains("8056c2e21c000001"));
    }
}
