// ── Directory node ──

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A DAQ node as seen through the network directory.
///
/// Read-only to the rest of the system and rebuilt wholesale on every
/// directory refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    /// First managed address assigned on the network, if any.
    pub ip_address: Option<String>,
    pub authorized: bool,
    pub online: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_online: Option<DateTime<Utc>>,
}

impl NodeRecord {
    /// Name to show for the node, falling back to its id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Base URL of the node's HTTP server on `port`.
    ///
    /// `None` when the node has no assigned address.
    pub fn endpoint(&self, port: u16) -> Option<Url> {
        let host = self.ip_address.as_deref()?;
        endpoint_for_host(host, port)
    }

    /// Whether `identifier` names this node by id, name, or address.
    pub fn matches(&self, identifier: &str) -> bool {
        self.id.eq_ignore_ascii_case(identifier)
            || (!self.name.is_empty() && self.name == identifier)
            || self.ip_address.as_deref() == Some(identifier)
    }

    /// Identity used for list-level change detection.
    pub(crate) fn address_key(&self) -> (&str, Option<&str>) {
        (&self.id, self.ip_address.as_deref())
    }
}

/// Build `http://{host}:{port}/`, bracketing IPv6 literals.
pub(crate) fn endpoint_for_host(host: &str, port: u16) -> Option<Url> {
    let authority = match host.parse::<IpAddr>() {
        Ok(IpAddr::V6(v6)) => format!("[{v6}]:{port}"),
        Ok(IpAddr::V4(v4)) => format!("{v4}:{port}"),
        Err(_) => format!("{host}:{port}"),
    };
    Url::parse(&format!("http://{authority}/")).ok()
}

/// Which directory members to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeFilter {
    /// Every member except the local node.
    All,
    /// Online members only.
    #[default]
    Online,
}

impl NodeFilter {
    pub fn keep(self, node: &NodeRecord) -> bool {
        match self {
            Self::All => true,
            Self::Online => node.online,
        }
    }
}
