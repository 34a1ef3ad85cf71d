// DAQ node client modules
//
// Hand-written client for a node's channel I/O endpoints, all wrapped in
// the `{ success, data }` envelope.

pub mod client;
pub mod models;
pub mod resources;

pub use client::{CONNECTION_REFUSED, DaqClient, INVALID_RESPONSE, WRITE_ENVELOPE_KEY};
pub use models::{ChannelPayload, ChannelValue, DaqEntry, DaqResponse};
pub use resources::ChannelGroup;
