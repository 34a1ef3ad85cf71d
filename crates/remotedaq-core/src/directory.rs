// ── Node directory ──
//
// Turns the ZeroTier member list into the nodes a user can talk to:
// the local machine is dropped, the filter applied, upstream order kept.

use tracing::{debug, warn};

use remotedaq_api::ZeroTierClient;

use crate::error::CoreError;
use crate::model::{NodeFilter, NodeRecord, Settings};

/// Lists DAQ nodes reachable on the configured network.
pub struct NodeDirectory {
    client: ZeroTierClient,
    local_node_id: Option<String>,
}

impl NodeDirectory {
    pub fn new(client: ZeroTierClient, local_node_id: Option<String>) -> Self {
        let local_node_id = local_node_id
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty());
        Self {
            client,
            local_node_id,
        }
    }

    pub fn local_node_id(&self) -> Option<&str> {
        self.local_node_id.as_deref()
    }

    /// Query the directory, reporting why it failed.
    ///
    /// Incomplete settings short-circuit before any network call.
    pub async fn query(
        &self,
        settings: &Settings,
        filter: NodeFilter,
    ) -> Result<Vec<NodeRecord>, CoreError> {
        if let Some(field) = settings.missing_field() {
            return Err(CoreError::MissingSettings { field });
        }

        let members = self
            .client
            .list_members(&settings.network_id, &settings.auth_token)
            .await?;
        let total = members.len();

        let nodes: Vec<NodeRecord> = members
            .into_iter()
            .map(NodeRecord::from)
            .filter(|node| !self.is_local(node))
            .filter(|node| filter.keep(node))
            .collect();

        debug!(total, kept = nodes.len(), ?filter, "directory listed");
        Ok(nodes)
    }

    /// Query the directory, collapsing every failure into an empty list.
    pub async fn list_nodes(&self, settings: &Settings, filter: NodeFilter) -> Vec<NodeRecord> {
        match self.query(settings, filter).await {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!(error = %e, "node directory query failed");
                Vec::new()
            }
        }
    }

    fn is_local(&self, node: &NodeRecord) -> bool {
        self.local_node_id
            .as_deref()
            .is_some_and(|local| node.id.eq_ignore_ascii_case(local))
    }
}
