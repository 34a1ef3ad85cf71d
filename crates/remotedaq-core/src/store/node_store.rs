// ── Published node list ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::model::NodeRecord;
use crate::stream::NodeStream;

/// Outcome of the most recent directory query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DirectoryStatus {
    /// No query has completed yet.
    #[default]
    Unknown,
    Ok { nodes: usize, at: DateTime<Utc> },
    Failed { reason: String, at: DateTime<Utc> },
}

impl DirectoryStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// The node list most recently published by a directory refresh.
///
/// The list is always replaced as a whole. Subscribers only wake when
/// the set of node ids and addresses differs from the previous one.
pub struct NodeStore {
    pub(crate) nodes: watch::Sender<Arc<Vec<NodeRecord>>>,
    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
    pub(crate) status: watch::Sender<DirectoryStatus>,
}

impl NodeStore {
    pub fn new() -> Self {
        let (nodes, _) = watch::channel(Arc::new(Vec::new()));
        let (last_refresh, _) = watch::channel(None);
        let (status, _) = watch::channel(DirectoryStatus::Unknown);
        Self {
            nodes,
            last_refresh,
            status,
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<NodeRecord>> {
        self.nodes.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// First node matching `identifier` by id, name, or address.
    pub fn find(&self, identifier: &str) -> Option<NodeRecord> {
        self.nodes
            .borrow()
            .iter()
            .find(|node| node.matches(identifier))
            .cloned()
    }

    pub fn subscribe(&self) -> NodeStream {
        NodeStream::new(self.nodes.subscribe())
    }

    pub fn status(&self) -> DirectoryStatus {
        self.status.borrow().clone()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}
