// DAQ node HTTP client
//
// Wraps `reqwest::Client` with node URL construction and envelope
// normalisation. Every request resolves to a `DaqResponse`: transport
// and decoding failures are folded into a failure envelope so callers
// only ever branch on `success`.

use std::fmt;

use serde_json::{Map, Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::daq::models::DaqResponse;
use crate::daq::resources::ChannelGroup;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Message for an unreachable node.
pub const CONNECTION_REFUSED: &str = "Connection refused, check connection";
/// Message for a response that is not a JSON envelope.
pub const INVALID_RESPONSE: &str = "Invalid token or network ID, please check again";
/// Key wrapping the payload of every write request.
pub const WRITE_ENVELOPE_KEY: &str = "data";

/// Why a request failed before a usable envelope was decoded.
#[derive(Debug)]
enum RequestFailure {
    Unreachable,
    InvalidResponse,
    Unexpected(String),
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => f.write_str(CONNECTION_REFUSED),
            Self::InvalidResponse => f.write_str(INVALID_RESPONSE),
            Self::Unexpected(detail) => write!(f, "Unexpected error, Error message: {detail}"),
        }
    }
}

impl From<reqwest::Error> for RequestFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Unreachable
        } else if err.is_decode() {
            Self::InvalidResponse
        } else {
            Self::Unexpected(err.to_string())
        }
    }
}

/// HTTP client for a DAQ node's control API.
///
/// Stateless with respect to nodes: every call takes the node's base URL,
/// so one client serves every node in the directory.
#[derive(Debug, Clone)]
pub struct DaqClient {
    http: reqwest::Client,
}

impl DaqClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build the URL of a channel group on a node: `{node}/{group path}`.
    pub fn resource_url(node: &Url, group: ChannelGroup) -> Result<Url, Error> {
        let mut base = node.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(group.path())?)
    }

    // ── Envelope-level request ───────────────────────────────────────

    /// Issue a request against a node resource.
    ///
    /// With a payload this is a write: `PUT` with body `{"data": payload}`.
    /// Without one it is a read: `GET` with no body. Never fails; every
    /// error path resolves to a failure envelope.
    pub async fn request(&self, url: Url, payload: Option<Value>) -> DaqResponse {
        match self.try_request(url, payload).await {
            Ok(resp) => resp,
            Err(failure) => {
                warn!(%failure, "DAQ request failed");
                DaqResponse::failure(failure.to_string())
            }
        }
    }

    async fn try_request(
        &self,
        url: Url,
        payload: Option<Value>,
    ) -> Result<DaqResponse, RequestFailure> {
        let builder = match payload {
            Some(payload) => {
                debug!("PUT {}", url);
                let mut body = Map::new();
                body.insert(WRITE_ENVELOPE_KEY.to_owned(), payload);
                self.http.put(url).json(&body)
            }
            None => {
                debug!("GET {}", url);
                self.http.get(url)
            }
        };

        let resp = builder.send().await?;
        let status = resp.status();

        let is_json = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_none_or(|ct| ct.contains("json"));
        if !is_json {
            debug!(%status, "non-JSON content type from node");
            return Err(RequestFailure::InvalidResponse);
        }

        let body = resp.text().await?;
        let envelope: DaqResponse = serde_json::from_str(&body).map_err(|e| {
            debug!(%status, error = %e, "undecodable node response");
            RequestFailure::InvalidResponse
        })?;

        Ok(envelope)
    }

    // ── Resource helpers ─────────────────────────────────────────────

    /// Read a channel group. Writable groups are read with GET as well.
    pub async fn read(&self, node: &Url, group: ChannelGroup) -> DaqResponse {
        match Self::resource_url(node, group) {
            Ok(url) => self.request(url, None).await,
            Err(e) => DaqResponse::failure(RequestFailure::Unexpected(e.to_string()).to_string()),
        }
    }

    /// Write a payload to a channel group.
    pub async fn write(&self, node: &Url, group: ChannelGroup, payload: Value) -> DaqResponse {
        match Self::resource_url(node, group) {
            Ok(url) => self.request(url, Some(payload)).await,
            Err(e) => DaqResponse::failure(RequestFailure::Unexpected(e.to_string()).to_string()),
        }
    }

    /// `GET /analog/input`
    pub async fn read_analog_input(&self, node: &Url) -> DaqResponse {
        self.read(node, ChannelGroup::AnalogInput).await
    }

    /// `GET /digital/input`
    pub async fn read_digital_input(&self, node: &Url) -> DaqResponse {
        self.read(node, ChannelGroup::DigitalInput).await
    }

    /// `GET /digital_output/input` -- current state of the output latches.
    pub async fn read_digital_output_state(&self, node: &Url) -> DaqResponse {
        self.read(node, ChannelGroup::DigitalOutputReadback).await
    }

    /// `PUT /analog/output` with `{"data": [v0, v1, ...]}`
    pub async fn write_analog_output(&self, node: &Url, values: &[f64]) -> DaqResponse {
        self.write(node, ChannelGroup::AnalogOutput, json!(values))
            .await
    }

    /// `PUT /digital/output` with `{"data": [0|1, ...]}`
    pub async fn write_digital_output(&self, node: &Url, states: &[u8]) -> DaqResponse {
        self.write(node, ChannelGroup::DigitalOutput, json!(states))
            .await
    }
}
