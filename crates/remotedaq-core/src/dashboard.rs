// ── Dashboard facade ──
//
// Lifecycle for one dashboard session: holds the network settings, runs
// the periodic directory refresh, tracks the selected node, and issues
// DAQ reads and writes against it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use remotedaq_api::{ChannelGroup, DaqClient, DaqResponse, TlsMode, TransportConfig, ZeroTierClient};

use crate::config::{DashboardConfig, TlsVerification};
use crate::directory::NodeDirectory;
use crate::error::CoreError;
use crate::model::{ChannelSelection, ChannelTable, NodeFilter, NodeRecord, Settings};
use crate::reconcile::reconcile;
use crate::store::{DirectoryStatus, NodeStore};
use crate::stream::NodeStream;

// ── RefreshState ─────────────────────────────────────────────────

/// State of the directory refresh loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RefreshState {
    #[default]
    Idle,
    Fetching,
}

/// Point-in-time view of a dashboard, for display and serialization.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub nodes: Vec<NodeRecord>,
    pub selected: Option<NodeRecord>,
    pub refresh_state: RefreshState,
    pub directory: DirectoryStatus,
    pub last_refresh: Option<DateTime<Utc>>,
}

// ── Dashboard ────────────────────────────────────────────────────

/// Main entry point for consumers.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. Background refresh runs
/// only between [`start()`](Self::start) and [`shutdown()`](Self::shutdown).
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    settings: ArcSwap<Settings>,
    directory: NodeDirectory,
    daq: DaqClient,
    store: NodeStore,
    selected: watch::Sender<Option<NodeRecord>>,
    refresh_state: watch::Sender<RefreshState>,
    /// Serializes DAQ requests per node id.
    node_locks: DashMap<String, Arc<Mutex<()>>>,
    started: AtomicBool,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Dashboard {
    /// Build a dashboard. Does not touch the network until
    /// [`start()`](Self::start) or an explicit operation.
    pub fn new(config: DashboardConfig, settings: Settings) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let zerotier = ZeroTierClient::new(config.zerotier_url.clone(), &transport)?;
        let daq = DaqClient::new(&transport)?;
        let directory = NodeDirectory::new(zerotier, config.local_node_id.clone());

        let (selected, _) = watch::channel(None);
        let (refresh_state, _) = watch::channel(RefreshState::Idle);

        Ok(Self {
            inner: Arc::new(DashboardInner {
                config,
                settings: ArcSwap::from_pointee(settings),
                directory,
                daq,
                store: NodeStore::new(),
                selected,
                refresh_state,
                node_locks: DashMap::new(),
                started: AtomicBool::new(false),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &NodeStore {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Run an initial directory refresh and spawn the refresh loop.
    ///
    /// Calling `start` again is a no-op. A zero refresh interval skips
    /// the loop and keeps only the initial refresh.
    pub async fn start(&self) -> Result<(), CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::ShutDown);
        }
        if self.inner.started.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        self.refresh_nodes().await;

        let period = self.inner.config.refresh_interval;
        if !period.is_zero() {
            let dashboard = self.clone();
            let cancel = self.inner.cancel.clone();
            self.inner
                .task_handles
                .lock()
                .await
                .push(tokio::spawn(refresh_task(dashboard, period, cancel)));
        }

        info!(
            nodes = self.inner.store.len(),
            refresh_secs = period.as_secs_f64(),
            "dashboard started"
        );
        Ok(())
    }

    /// Stop the refresh loop and wait for it to exit.
    ///
    /// In-flight DAQ requests are not awaited; they end at their timeout.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        self.inner.refresh_state.send_replace(RefreshState::Idle);
        debug!("dashboard shut down");
    }

    /// One-shot: start without a refresh loop, run the closure, shut down.
    pub async fn oneshot<F, Fut, T>(
        config: DashboardConfig,
        settings: Settings,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(Dashboard) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.refresh_interval = Duration::ZERO;

        let dashboard = Dashboard::new(cfg, settings)?;
        dashboard.start().await?;
        let result = f(dashboard.clone()).await;
        dashboard.shutdown().await;
        result
    }

    // ── Directory ────────────────────────────────────────────────

    /// Query the directory once and publish the result.
    ///
    /// Returns `true` when the published node set changed. A failed
    /// query publishes an empty list and is recorded in
    /// [`directory_status()`](Self::directory_status).
    pub async fn refresh_nodes(&self) -> bool {
        self.inner.refresh_state.send_replace(RefreshState::Fetching);

        let settings = self.inner.settings.load_full();
        let result = self
            .inner
            .directory
            .query(&settings, self.inner.config.node_filter)
            .await;
        if let Err(ref e) = result {
            warn!(error = %e, "directory refresh failed");
        }
        let changed = self.inner.store.apply_directory_result(result);

        self.inner.refresh_state.send_replace(RefreshState::Idle);
        changed
    }

    /// Query the directory with an explicit filter, without publishing.
    pub async fn query_nodes(&self, filter: NodeFilter) -> Result<Vec<NodeRecord>, CoreError> {
        let settings = self.inner.settings.load_full();
        self.inner.directory.query(&settings, filter).await
    }

    // ── Settings ─────────────────────────────────────────────────

    pub fn settings(&self) -> Arc<Settings> {
        self.inner.settings.load_full()
    }

    /// Swap in new settings. The next refresh uses them.
    pub fn update_settings(&self, settings: Settings) {
        self.inner.settings.store(Arc::new(settings));
        info!("network settings updated");
    }

    // ── Selection ────────────────────────────────────────────────

    /// Make `node` the target of subsequent DAQ operations.
    pub fn select_node(&self, node: NodeRecord) {
        debug!(node = %node.display_name(), "node selected");
        self.inner.selected.send_replace(Some(node));
    }

    /// Select the published node matching `identifier` by id, name, or address.
    pub fn select_by(&self, identifier: &str) -> Result<NodeRecord, CoreError> {
        let node = self
            .inner
            .store
            .find(identifier)
            .ok_or_else(|| CoreError::NodeNotFound {
                identifier: identifier.to_owned(),
            })?;
        self.select_node(node.clone());
        Ok(node)
    }

    /// Select a node by address alone, bypassing the directory.
    pub fn select_host(&self, host: &str) -> Result<NodeRecord, CoreError> {
        let host = host.trim();
        if crate::model::endpoint_for_host(host, self.inner.config.daq_port).is_none() {
            return Err(CoreError::ValidationFailed {
                message: format!("'{host}' is not a valid host"),
            });
        }
        let node = NodeRecord {
            id: host.to_owned(),
            name: String::new(),
            ip_address: Some(host.to_owned()),
            authorized: true,
            online: true,
            description: None,
            physical_address: None,
            last_online: None,
        };
        self.select_node(node.clone());
        Ok(node)
    }

    pub fn selected_node(&self) -> Option<NodeRecord> {
        self.inner.selected.borrow().clone()
    }

    // ── DAQ operations ───────────────────────────────────────────

    /// Read a channel group from the selected node and reconcile the
    /// selected channels into a fresh table.
    pub async fn read_channels(
        &self,
        group: ChannelGroup,
        selection: &ChannelSelection,
    ) -> Result<ChannelTable, CoreError> {
        if selection.is_empty() {
            return Err(CoreError::EmptySelection);
        }
        if group.is_writable() {
            return Err(CoreError::ValidationFailed {
                message: format!("{} is written, not read", group.label()),
            });
        }
        let size = self.inner.config.channels.size(group);
        selection.validate(size)?;

        let (node, url) = self.selected_endpoint()?;
        let response = {
            let lock = self.node_lock(&node.id);
            let _guard = lock.lock().await;
            self.inner.daq.read(&url, group).await
        };

        let entries = response
            .into_result()
            .map_err(|message| CoreError::Daq { message })?;
        debug!(node = %node.display_name(), %group, entries = entries.len(), "channels read");
        reconcile(group, size, &entries, selection)
    }

    /// Set both analog output channels on the selected node.
    pub async fn write_analog_output(&self, values: &[f64]) -> Result<DaqResponse, CoreError> {
        let expected = self.inner.config.channels.analog_output;
        if values.len() != expected {
            return Err(CoreError::InvalidPayload {
                message: format!("expected {expected} analog values, got {}", values.len()),
            });
        }
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(CoreError::InvalidPayload {
                message: format!("analog value {v} is not a finite number"),
            });
        }

        let (node, url) = self.selected_endpoint()?;
        let response = {
            let lock = self.node_lock(&node.id);
            let _guard = lock.lock().await;
            self.inner.daq.write_analog_output(&url, values).await
        };
        accepted(response)
    }

    /// Set every digital output channel on the selected node.
    pub async fn write_digital_output(&self, states: &[u8]) -> Result<DaqResponse, CoreError> {
        let expected = self.inner.config.channels.digital_output;
        if states.len() != expected {
            return Err(CoreError::InvalidPayload {
                message: format!("expected {expected} digital states, got {}", states.len()),
            });
        }
        if let Some(s) = states.iter().find(|s| **s > 1) {
            return Err(CoreError::InvalidPayload {
                message: format!("digital state {s} is not 0 or 1"),
            });
        }

        let (node, url) = self.selected_endpoint()?;
        let response = {
            let lock = self.node_lock(&node.id);
            let _guard = lock.lock().await;
            self.inner.daq.write_digital_output(&url, states).await
        };
        accepted(response)
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to published node list changes.
    pub fn nodes(&self) -> NodeStream {
        self.inner.store.subscribe()
    }

    pub fn nodes_snapshot(&self) -> Arc<Vec<NodeRecord>> {
        self.inner.store.snapshot()
    }

    pub fn refresh_state(&self) -> watch::Receiver<RefreshState> {
        self.inner.refresh_state.subscribe()
    }

    pub fn selection(&self) -> watch::Receiver<Option<NodeRecord>> {
        self.inner.selected.subscribe()
    }

    pub fn directory_status(&self) -> DirectoryStatus {
        self.inner.store.status()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            nodes: self.inner.store.snapshot().as_ref().clone(),
            selected: self.selected_node(),
            refresh_state: *self.inner.refresh_state.borrow(),
            directory: self.inner.store.status(),
            last_refresh: self.inner.store.last_refresh(),
        }
    }

    // ── Helpers ──────────────────────────────────────────────────

    /// Capture the selected node and its endpoint for one operation.
    fn selected_endpoint(&self) -> Result<(NodeRecord, Url), CoreError> {
        let node = self.selected_node().ok_or(CoreError::NoNodeSelected)?;
        let url = node
            .endpoint(self.inner.config.daq_port)
            .ok_or_else(|| CoreError::NodeUnreachable {
                node: node.display_name().to_owned(),
            })?;
        Ok((node, url))
    }

    fn node_lock(&self, node_id: &str) -> Arc<Mutex<()>> {
        Arc::clone(
            self.inner
                .node_locks
                .entry(node_id.to_owned())
                .or_default()
                .value(),
        )
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically re-query the directory until cancelled.
async fn refresh_task(dashboard: Dashboard, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    changed = dashboard.refresh_nodes() => {
                        if changed {
                            debug!(nodes = dashboard.inner.store.len(), "published node list");
                        }
                    }
                }
            }
        }
    }

    dashboard.inner.refresh_state.send_replace(RefreshState::Idle);
}

/// Map a write response to its failure message, if any.
fn accepted(response: DaqResponse) -> Result<DaqResponse, CoreError> {
    if response.success {
        return Ok(response);
    }
    let message = response.into_result().err().unwrap_or_default();
    Err(CoreError::Daq { message })
}

fn build_transport(config: &DashboardConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
    }
}
