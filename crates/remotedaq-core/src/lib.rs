//! Shared state and business logic between `remotedaq-api` and UI consumers.
//!
//! - **[`Dashboard`]** -- Central facade. Holds the current [`Settings`],
//!   the published node list, and the selected node.
//!   [`start()`](Dashboard::start) runs the periodic directory refresh;
//!   [`read_channels()`](Dashboard::read_channels) and the write methods
//!   issue DAQ requests against the selected node.
//!
//! - **[`NodeDirectory`]** -- Turns the ZeroTier member list into
//!   [`NodeRecord`]s, dropping the local node and optionally offline ones.
//!
//! - **[`ChannelTable`]** -- Fixed-size channel table produced by the
//!   reconciler from a successful DAQ response and a [`ChannelSelection`].
//!
//! - **[`NodeStream`]** -- Subscription handle for node list changes.

pub mod config;
pub mod convert;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ChannelLayout, DashboardConfig, TlsVerification};
pub use dashboard::{Dashboard, DashboardSnapshot, RefreshState};
pub use directory::NodeDirectory;
pub use error::CoreError;
pub use reconcile::reconcile;
pub use store::{DirectoryStatus, NodeStore};
pub use stream::{NodeStream, NodeWatchStream};

pub use model::{ChannelReading, ChannelSelection, ChannelTable, NodeFilter, NodeRecord, Settings};

// Wire types that appear in the public API.
pub use remotedaq_api::daq::CONNECTION_REFUSED;
pub use remotedaq_api::{ChannelGroup, ChannelValue, DaqEntry, DaqResponse};
