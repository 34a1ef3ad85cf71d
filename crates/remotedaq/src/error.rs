//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use remotedaq_config::ConfigError;
use remotedaq_core::{CONNECTION_REFUSED, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const DAQ: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Settings / directory ─────────────────────────────────────────
    #[error("Network settings incomplete: {field} is empty")]
    #[diagnostic(
        code(remotedaq::no_settings),
        help(
            "Store the ZeroTier token and network id with: remotedaq settings init\n\
             Settings file: {path}"
        )
    )]
    NoNetworkSettings { field: String, path: String },

    #[error("ZeroTier rejected the API token ({message})")]
    #[diagnostic(
        code(remotedaq::auth_failed),
        help(
            "Check the token under Account > API Access Tokens in ZeroTier Central.\n\
             Update it with: remotedaq settings set --token <TOKEN>"
        )
    )]
    AuthFailed { message: String },

    #[error("Node directory unavailable: {reason}")]
    #[diagnostic(
        code(remotedaq::directory_unavailable),
        help("Check the network id and your connection to ZeroTier Central.")
    )]
    DirectoryUnavailable { reason: String },

    // ── Nodes ────────────────────────────────────────────────────────
    #[error("Node '{identifier}' not found")]
    #[diagnostic(
        code(remotedaq::node_not_found),
        help("Run: remotedaq nodes list --output plain to see available nodes")
    )]
    NodeNotFound { identifier: String },

    #[error("Node {node} has no assigned address")]
    #[diagnostic(
        code(remotedaq::node_unreachable),
        help("Assign the member a managed IP in ZeroTier Central.")
    )]
    NodeUnreachable { node: String },

    #[error("{message}")]
    #[diagnostic(
        code(remotedaq::connection_refused),
        help(
            "The node did not answer on its DAQ port.\n\
             Check that it is online and that daq_port matches its server."
        )
    )]
    ConnectionRefused { message: String },

    #[error("{message}")]
    #[diagnostic(code(remotedaq::daq))]
    DaqRejected { message: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(remotedaq::timeout),
        help("Increase timeout with --timeout or check the network path.")
    )]
    Timeout { seconds: u64 },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(remotedaq::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(remotedaq::config),
        help("Inspect the resolved configuration with: remotedaq config show")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(remotedaq::json))]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    #[diagnostic(code(remotedaq::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoNetworkSettings { .. } | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NodeNotFound { .. } => exit_code::NOT_FOUND,
            Self::DirectoryUnavailable { .. }
            | Self::NodeUnreachable { .. }
            | Self::ConnectionRefused { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::DaqRejected { .. } => exit_code::DAQ,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config(_) | Self::Io(_) | Self::Json(_) | Self::Internal(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingSettings { field } => CliError::NoNetworkSettings {
                field: field.into(),
                path: String::new(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::DirectoryUnavailable { reason } => {
                CliError::DirectoryUnavailable { reason }
            }

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NodeNotFound { identifier } => CliError::NodeNotFound { identifier },

            CoreError::NoNodeSelected => CliError::Validation {
                field: "node".into(),
                reason: "no node selected".into(),
            },

            CoreError::NodeUnreachable { node } => CliError::NodeUnreachable { node },

            CoreError::Daq { message } if message == CONNECTION_REFUSED => {
                CliError::ConnectionRefused { message }
            }
            CoreError::Daq { message } => CliError::DaqRejected { message },

            CoreError::EmptySelection => CliError::Validation {
                field: "channels".into(),
                reason: "select at least one channel".into(),
            },

            err @ CoreError::ChannelOutOfRange { .. } => CliError::Validation {
                field: "channels".into(),
                reason: err.to_string(),
            },

            CoreError::MalformedReading { index } => CliError::DaqRejected {
                message: format!("node sent no value for channel {index}"),
            },

            CoreError::InvalidPayload { message } => CliError::Validation {
                field: "values".into(),
                reason: message,
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Config(ConfigError::Validation {
                field: "config".into(),
                reason: message,
            }),

            CoreError::ShutDown => CliError::Internal("dashboard has been shut down".into()),

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
