// ── Core error types ──
//
// User-facing errors from remotedaq-core. Consumers never see HTTP status
// codes or JSON parse failures directly. DAQ transport failures arrive as
// failure envelopes and surface here as `Daq { message }`; directory
// failures are translated by the `From<remotedaq_api::Error>` impl.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Settings ─────────────────────────────────────────────────────
    #[error("Network settings incomplete: {field} is empty")]
    MissingSettings { field: &'static str },

    // ── Directory errors ─────────────────────────────────────────────
    #[error("Node directory rejected the credentials: {message}")]
    AuthenticationFailed { message: String },

    #[error("Node directory unavailable: {reason}")]
    DirectoryUnavailable { reason: String },

    #[error("Node directory timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Node errors ──────────────────────────────────────────────────
    #[error("No node selected")]
    NoNodeSelected,

    #[error("Node not found: {identifier}")]
    NodeNotFound { identifier: String },

    #[error("Node {node} has no assigned address")]
    NodeUnreachable { node: String },

    // ── DAQ errors ───────────────────────────────────────────────────
    /// Failure envelope from a node; `message` is `data[0]` verbatim.
    #[error("{message}")]
    Daq { message: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("No channel selected")]
    EmptySelection,

    #[error("Channel {index} is out of range ({available} available)")]
    ChannelOutOfRange { index: u8, available: usize },

    #[error("Response entry for channel {index} carries no value")]
    MalformedReading { index: u8 },

    #[error("Invalid output payload: {message}")]
    InvalidPayload { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Dashboard has been shut down")]
    ShutDown,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for errors caught before any network call.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::MissingSettings { .. }
                | Self::NoNodeSelected
                | Self::NodeNotFound { .. }
                | Self::EmptySelection
                | Self::ChannelOutOfRange { .. }
                | Self::InvalidPayload { .. }
                | Self::ValidationFailed { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<remotedaq_api::Error> for CoreError {
    fn from(err: remotedaq_api::Error) -> Self {
        match err {
            remotedaq_api::Error::Unauthorized { service, status } => {
                CoreError::AuthenticationFailed {
                    message: format!("{service} answered HTTP {status}"),
                }
            }
            remotedaq_api::Error::Transport(e) => CoreError::DirectoryUnavailable {
                reason: e.to_string(),
            },
            remotedaq_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            remotedaq_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            remotedaq_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            remotedaq_api::Error::Http { status: 404, .. } => CoreError::DirectoryUnavailable {
                reason: "network not found".into(),
            },
            remotedaq_api::Error::Http { status, message } => CoreError::DirectoryUnavailable {
                reason: format!("HTTP {status}: {message}"),
            },
            remotedaq_api::Error::Deserialization { message, body: _ } => {
                CoreError::DirectoryUnavailable {
                    reason: format!("unexpected response: {message}"),
                }
            }
        }
    }
}
