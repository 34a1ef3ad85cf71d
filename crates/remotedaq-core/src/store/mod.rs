// ── Reactive node store ──
//
// Holds the published node list and pushes changes to subscribers via
// `watch` channels.

mod node_store;
mod refresh;

pub use node_store::{DirectoryStatus, NodeStore};
