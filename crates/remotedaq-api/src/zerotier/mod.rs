// ZeroTier Central API client modules
//
// Read-only access to a network's member list, the only directory
// query a dashboard needs to discover node addresses.

pub mod client;
pub mod models;

pub use client::ZeroTierClient;
pub use models::{Member, MemberConfig};
