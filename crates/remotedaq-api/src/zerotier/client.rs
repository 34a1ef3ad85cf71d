// ZeroTier Central HTTP client
//
// Wraps `reqwest::Client` with network-scoped URL construction and bearer
// authentication. The token is passed per call rather than baked into
// default headers, because settings can change while a client is alive.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::zerotier::models::Member;

const SERVICE: &str = "ZeroTier Central";

/// Raw HTTP client for the ZeroTier Central API.
pub struct ZeroTierClient {
    http: reqwest::Client,
    base_url: Url,
    /// Reported in [`Error::Timeout`]; must match the client's own timeout.
    timeout: Duration,
}

impl ZeroTierClient {
    /// Public ZeroTier Central API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.zerotier.com/api/v1/";

    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` is the API root (e.g. `https://api.zerotier.com/api/v1/`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, transport.timeout))
    }

    /// Create a client with a pre-built `reqwest::Client` whose request
    /// timeout is `timeout`.
    pub fn with_client(http: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url: ensure_trailing_slash(base_url),
            timeout,
        }
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a network-scoped URL: `{base}network/{network_id}/{path}`
    pub(crate) fn network_url(&self, network_id: &str, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("network/{network_id}/{path}"))?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// List every member of a network, in upstream order.
    ///
    /// `GET /network/{network_id}/member`
    pub async fn list_members(
        &self,
        network_id: &str,
        token: &SecretString,
    ) -> Result<Vec<Member>, Error> {
        let url = self.network_url(network_id, "member")?;
        debug!(network_id, "listing network members");
        self.get(url, token).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url, token: &SecretString) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Unauthorized {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: whole_secs(self.timeout),
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// Seconds, rounded up so a sub-second timeout never reads as `0s`.
fn whole_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
