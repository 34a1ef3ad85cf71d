// ── Runtime dashboard configuration ──
//
// These types describe *how* to reach the directory and the nodes.
// They never touch disk: `remotedaq-config` builds a `DashboardConfig`
// from the config file and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use remotedaq_api::ChannelGroup;

use crate::model::NodeFilter;

/// TLS verification strategy for the directory API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Additional CA certificate file (e.g. behind an intercepting proxy).
    CustomCa(PathBuf),
}

/// Channel counts per group. Fixed by hardware convention, not computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelLayout {
    pub analog_input: usize,
    pub digital_input: usize,
    pub digital_output_readback: usize,
    pub analog_output: usize,
    pub digital_output: usize,
}

impl Default for ChannelLayout {
    fn default() -> Self {
        Self {
            analog_input: 8,
            digital_input: 8,
            digital_output_readback: 8,
            analog_output: 2,
            digital_output: 8,
        }
    }
}

impl ChannelLayout {
    /// Number of channels in a group.
    pub fn size(&self, group: ChannelGroup) -> usize {
        match group {
            ChannelGroup::AnalogInput => self.analog_input,
            ChannelGroup::DigitalInput => self.digital_input,
            ChannelGroup::DigitalOutputReadback => self.digital_output_readback,
            ChannelGroup::AnalogOutput => self.analog_output,
            ChannelGroup::DigitalOutput => self.digital_output,
        }
    }
}

/// Configuration for one dashboard session.
///
/// Built by the CLI, passed to `Dashboard` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// ZeroTier Central API root.
    pub zerotier_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Timeout applied to every outbound request.
    pub timeout: Duration,
    /// Directory refresh cadence. Zero disables the refresh loop.
    pub refresh_interval: Duration,
    /// Port every node's HTTP server listens on.
    pub daq_port: u16,
    /// ZeroTier id of the machine running the dashboard, excluded from listings.
    pub local_node_id: Option<String>,
    /// Which members the refresh loop publishes.
    pub node_filter: NodeFilter,
    /// Channel counts per group.
    pub channels: ChannelLayout,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            zerotier_url: Url::parse(remotedaq_api::ZeroTierClient::DEFAULT_BASE_URL)
                .expect("default ZeroTier URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            refresh_interval: Duration::from_secs(3),
            daq_port: 5000,
            local_node_id: None,
            node_filter: NodeFilter::Online,
            channels: ChannelLayout::default(),
        }
    }
}
