// ── Directory refresh application ──
//
// A refresh result replaces the node list wholesale. A failed query
// publishes an empty list, the same as a network with no nodes, and
// records the failure in the directory status.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::{DirectoryStatus, NodeStore};
use crate::error::CoreError;
use crate::model::NodeRecord;

impl NodeStore {
    /// Replace the published list. Returns `true` when subscribers were notified.
    pub fn replace(&self, nodes: Vec<NodeRecord>) -> bool {
        let fresh = Arc::new(nodes);
        let changed = self.nodes.send_if_modified(|current| {
            let changed = !same_addresses(current, &fresh);
            *current = Arc::clone(&fresh);
            changed
        });
        self.last_refresh.send_replace(Some(Utc::now()));
        if changed {
            debug!(nodes = fresh.len(), "node list changed");
        }
        changed
    }

    /// Apply the outcome of a directory query.
    pub(crate) fn apply_directory_result(
        &self,
        result: Result<Vec<NodeRecord>, CoreError>,
    ) -> bool {
        let at = Utc::now();
        match result {
            Ok(nodes) => {
                self.status.send_replace(DirectoryStatus::Ok {
                    nodes: nodes.len(),
                    at,
                });
                self.replace(nodes)
            }
            Err(e) => {
                self.status.send_replace(DirectoryStatus::Failed {
                    reason: e.to_string(),
                    at,
                });
                self.replace(Vec::new())
            }
        }
    }
}

fn same_addresses(a: &[NodeRecord], b: &[NodeRecord]) -> bool {
    let keys = |nodes: &[NodeRecord]| -> BTreeSet<(String, Option<String>)> {
        nodes
            .iter()
            .map(|n| {
                let (id, ip) = n.address_key();
                (id.to_owned(), ip.map(str::to_owned))
            })
            .collect()
    };
    a.len() == b.len() && keys(a) == keys(b)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn node(id: &str, ip: &str, name: &str) -> NodeRecord {
        NodeRecord {
            id: id.into(),
            name: name.into(),
            ip_address: Some(ip.into()),
            authorized: true,
            online: true,
            description: None,
            physical_address: None,
            last_online: None,
        }
    }

    #[test]
    fn first_non_empty_list_is_a_change() {
        let store = NodeStore::new();
        assert!(store.replace(vec![node("a1", "10.0.0.1", "one")]));
        assert_eq!(store.len(), 1);
        assert!(store.last_refresh().is_some());
    }

    #[test]
    fn same_ids_and_addresses_do_not_notify() {
        let store = NodeStore::new();
        store.replace(vec![node("a1", "10.0.0.1", "one")]);
        let mut rx = store.nodes.subscribe();

        // A rename alone is not a change, but the stored list still updates.
        assert!(!store.replace(vec![node("a1", "10.0.0.1", "renamed")]));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.snapshot()[0].name, "renamed");
    }

    #[test]
    fn order_is_not_a_change() {
        let store = NodeStore::new();
        store.replace(vec![node("a1", "10.0.0.1", ""), node("b2", "10.0.0.2", "")]);
        assert!(!store.replace(vec![node("b2", "10.0.0.2", ""), node("a1", "10.0.0.1", "")]));
    }

    #[test]
    fn address_move_is_a_change() {
        let store = NodeStore::new();
        store.replace(vec![node("a1", "10.0.0.1", "")]);
        assert!(store.replace(vec![node("a1", "10.0.0.9", "")]));
    }

    #[test]
    fn failed_query_clears_the_list() {
        let store = NodeStore::new();
        store.apply_directory_result(Ok(vec![node("a1", "10.0.0.1", "")]));
        assert!(matches!(store.status(), DirectoryStatus::Ok { nodes: 1, .. }));

        let changed = store.apply_directory_result(Err(CoreError::DirectoryUnavailable {
            reason: "connection refused".into(),
        }));
        assert!(changed);
        assert!(store.is_empty());
        assert!(store.status().is_failed());
    }

    #[test]
    fn find_by_name_or_address() {
        let store = NodeStore::new();
        store.replace(vec![node("a1", "10.0.0.1", "bench")]);
        assert_eq!(store.find("bench").unwrap().id, "a1");
        assert_eq!(store.find("10.0.0.1").unwrap().id, "a1");
        assert!(store.find("nope").is_none());
    }
}
