// ── Domain model ──
//
// Canonical types shared by the directory, the reconciler, and consumers.

mod channel;
mod node;
mod settings;

pub use channel::{ChannelReading, ChannelSelection, ChannelTable};
pub use node::{NodeFilter, NodeRecord};
pub(crate) use node::endpoint_for_host;
pub use settings::Settings;
