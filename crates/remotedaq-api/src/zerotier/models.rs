// ZeroTier Central wire types
//
// Only the member fields the directory consumes are modelled; everything
// else in the upstream record is ignored. Several fields are `null` for
// members that were never named or never joined, so they decode to defaults.

use serde::{Deserialize, Deserializer, Serialize};

/// A member record from `GET /network/{id}/member`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub node_id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub online: bool,
    /// Epoch milliseconds of the last controller contact.
    #[serde(default)]
    pub last_online: Option<i64>,
    #[serde(default)]
    pub physical_address: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub config: MemberConfig,
}

/// The `config` sub-object of a member record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberConfig {
    #[serde(default, deserialize_with = "null_to_default")]
    pub authorized: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub ip_assignments: Vec<String>,
}

fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
