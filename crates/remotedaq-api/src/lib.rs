// remotedaq-api: Async Rust clients for DAQ node HTTP servers and ZeroTier Central

pub mod daq;
pub mod error;
pub mod transport;
pub mod zerotier;

pub use daq::{ChannelGroup, ChannelPayload, ChannelValue, DaqClient, DaqEntry, DaqResponse};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use zerotier::{Member, MemberConfig, ZeroTierClient};
