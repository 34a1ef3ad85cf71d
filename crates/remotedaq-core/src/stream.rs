// ── Node list subscriptions ──

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::NodeRecord;

type Snapshot = Arc<Vec<NodeRecord>>;

/// A subscription to the published node list.
///
/// Offers the snapshot taken at creation, the latest value, and
/// change notification through [`changed()`](Self::changed) or a `Stream`.
pub struct NodeStream {
    current: Snapshot,
    receiver: watch::Receiver<Snapshot>,
}

impl NodeStream {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Snapshot captured at creation or at the last `changed()`.
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Latest published snapshot.
    pub fn latest(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next published change.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream`. The first item is the current list.
    pub fn into_stream(self) -> NodeWatchStream {
        NodeWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter over the node list `watch` channel.
pub struct NodeWatchStream {
    inner: WatchStream<Snapshot>,
}

impl Stream for NodeWatchStream {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio_test::{assert_pending, assert_ready, task};

    use crate::store::NodeStore;

    use super::*;

    fn node(id: &str, ip: &str) -> NodeRecord {
        NodeRecord {
            id: id.into(),
            name: String::new(),
            ip_address: Some(ip.into()),
            authorized: true,
            online: true,
            description: None,
            physical_address: None,
            last_online: None,
        }
    }

    #[test]
    fn changed_waits_for_a_publish() {
        let store = NodeStore::new();
        let mut stream = store.subscribe();
        assert!(stream.current().is_empty());

        let mut changed = task::spawn(stream.changed());
        assert_pending!(changed.poll());

        store.replace(vec![node("a1b2c3d4e5", "10.147.17.5")]);
        assert!(changed.is_woken());
        let snap = assert_ready!(changed.poll()).unwrap();
        assert_eq!(snap.len(), 1);
        drop(changed);

        assert_eq!(stream.current().len(), 1);
    }

    #[test]
    fn unchanged_addresses_do_not_wake() {
        let store = NodeStore::new();
        store.replace(vec![node("a1b2c3d4e5", "10.147.17.5")]);
        let mut stream = store.subscribe();

        let mut changed = task::spawn(stream.changed());
        assert_pending!(changed.poll());

        let mut renamed = node("a1b2c3d4e5", "10.147.17.5");
        renamed.name = "bench-1".into();
        assert!(!store.replace(vec![renamed]));
        assert!(!changed.is_woken());
        assert_pending!(changed.poll());
    }

    #[test]
    fn stream_yields_current_list_first() {
        let store = NodeStore::new();
        store.replace(vec![node("a1b2c3d4e5", "10.147.17.5")]);

        let mut stream = task::spawn(store.subscribe().into_stream());
        let first = assert_ready!(stream.poll_next()).unwrap();
        assert_eq!(first[0].id, "a1b2c3d4e5");
        assert_pending!(stream.poll_next());

        store.replace(Vec::new());
        let next = assert_ready!(stream.poll_next()).unwrap();
        assert!(next.is_empty());
    }
}
