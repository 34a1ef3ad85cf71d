#![allow(clippy::unwrap_used)]
// Integration tests for `Dashboard` against mocked ZeroTier and DAQ servers.

use std::collections::BTreeMap;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use remotedaq_api::daq::CONNECTION_REFUSED;
use remotedaq_core::{
    ChannelGroup, ChannelSelection, ChannelValue, CoreError, Dashboard, DashboardConfig,
    DirectoryStatus, NodeFilter, RefreshState, Settings,
};

const NETWORK: &str = "8056c2e21c000001";
const LOCAL_NODE: &str = "ffffffff00";

// ── Helpers ─────────────────────────────────────────────────────────

fn member(id: &str, name: &str, ip: &str, online: bool) -> serde_json::Value {
    json!({
        "nodeId": id,
        "name": name,
        "online": online,
        "config": { "authorized": true, "ipAssignments": [ip] }
    })
}

async fn mount_members(server: &MockServer, members: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/network/{NETWORK}/member")))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(members))
        .mount(server)
        .await;
}

fn config(zerotier: &MockServer, daq_port: u16) -> DashboardConfig {
    DashboardConfig {
        zerotier_url: Url::parse(&format!("{}/api/v1/", zerotier.uri())).unwrap(),
        timeout: Duration::from_secs(5),
        refresh_interval: Duration::ZERO,
        daq_port,
        local_node_id: Some(LOCAL_NODE.into()),
        ..DashboardConfig::default()
    }
}

fn settings() -> Settings {
    Settings::new("secret-token", NETWORK)
}

fn dead_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

// ── Directory ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_drops_local_and_offline_nodes() {
    let zerotier = MockServer::start().await;
    mount_members(
        &zerotier,
        json!([
            member("a1b2c3d4e5", "bench-1", "10.147.17.5", true),
            member(LOCAL_NODE, "laptop", "10.147.17.1", true),
            member("0011223344", "bench-2", "10.147.17.6", false),
            member("5566778899", "bench-3", "10.147.17.7", true),
        ]),
    )
    .await;

    let dash = Dashboard::new(config(&zerotier, 5000), settings()).unwrap();
    assert!(dash.refresh_nodes().await);

    let ids: Vec<String> = dash.nodes_snapshot().iter().map(|n| n.id.clone()).collect();
    assert_eq!(ids, vec!["a1b2c3d4e5", "5566778899"]);
    assert!(matches!(
        dash.directory_status(),
        DirectoryStatus::Ok { nodes: 2, .. }
    ));

    let all = dash.query_nodes(NodeFilter::All).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_empty_token_lists_nothing_without_calling_out() {
    let zerotier = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&zerotier)
        .await;

    let dash = Dashboard::new(config(&zerotier, 5000), Settings::new("", NETWORK)).unwrap();
    assert!(!dash.refresh_nodes().await);
    assert!(dash.nodes_snapshot().is_empty());
    assert!(dash.directory_status().is_failed());
}

#[tokio::test]
async fn test_rejected_token_clears_the_list() {
    let zerotier = MockServer::start().await;
    mount_members(
        &zerotier,
        json!([member("a1b2c3d4e5", "bench-1", "10.147.17.5", true)]),
    )
    .await;

    let dash = Dashboard::new(config(&zerotier, 5000), settings()).unwrap();
    dash.refresh_nodes().await;
    assert_eq!(dash.nodes_snapshot().len(), 1);

    dash.update_settings(Settings::new("stale-token", NETWORK));
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer stale-token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&zerotier)
        .await;

    assert!(dash.refresh_nodes().await);
    assert!(dash.nodes_snapshot().is_empty());
    assert!(dash.directory_status().is_failed());
}

#[tokio::test]
async fn test_snapshot_records_refresh_without_subscribers() {
    let zerotier = MockServer::start().await;
    mount_members(
        &zerotier,
        json!([member("a1b2c3d4e5", "bench-1", "10.147.17.5", true)]),
    )
    .await;

    let dash = Dashboard::new(config(&zerotier, 5000), settings()).unwrap();
    let before = dash.snapshot();
    assert_eq!(before.directory, DirectoryStatus::Unknown);
    assert!(before.last_refresh.is_none());

    dash.refresh_nodes().await;

    let after = dash.snapshot();
    assert_eq!(after.nodes.len(), 1);
    assert_eq!(after.refresh_state, RefreshState::Idle);
    assert!(after.last_refresh.is_some());
    assert!(matches!(after.directory, DirectoryStatus::Ok { nodes: 1, .. }));
}

#[tokio::test]
async fn test_refresh_state_is_fetching_during_query() {
    let zerotier = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/network/{NETWORK}/member")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&zerotier)
        .await;

    let dash = Dashboard::new(config(&zerotier, 5000), settings()).unwrap();
    let refreshing = tokio::spawn({
        let dash = dash.clone();
        async move { dash.refresh_nodes().await }
    });

    tokio::time::timeout(Duration::from_secs(2), async {
        while dash.snapshot().refresh_state != RefreshState::Fetching {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    refreshing.await.unwrap();
    let snap = dash.snapshot();
    assert_eq!(snap.refresh_state, RefreshState::Idle);
    assert!(matches!(snap.directory, DirectoryStatus::Ok { nodes: 0, .. }));
}

#[tokio::test]
async fn test_slow_directory_times_out_with_configured_seconds() {
    let zerotier = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/network/{NETWORK}/member")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&zerotier)
        .await;

    let mut cfg = config(&zerotier, 5000);
    cfg.timeout = Duration::from_secs(1);
    let dash = Dashboard::new(cfg, settings()).unwrap();

    let err = dash.query_nodes(NodeFilter::All).await.unwrap_err();
    assert!(matches!(err, CoreError::Timeout { timeout_secs: 1 }));
    assert_eq!(err.to_string(), "Node directory timed out after 1s");

    dash.refresh_nodes().await;
    assert!(dash.directory_status().is_failed());
}

// ── Refresh loop ────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_loop_publishes_changes_and_stops() {
    let zerotier = MockServer::start().await;
    mount_members(
        &zerotier,
        json!([member("a1b2c3d4e5", "bench-1", "10.147.17.5", true)]),
    )
    .await;

    let mut cfg = config(&zerotier, 5000);
    cfg.refresh_interval = Duration::from_millis(50);
    let dash = Dashboard::new(cfg, settings()).unwrap();
    dash.start().await.unwrap();
    assert_eq!(dash.nodes_snapshot().len(), 1);

    let mut stream = dash.nodes();
    zerotier.reset().await;
    mount_members(
        &zerotier,
        json!([
            member("a1b2c3d4e5", "bench-1", "10.147.17.5", true),
            member("5566778899", "bench-3", "10.147.17.7", true),
        ]),
    )
    .await;

    // A tick may land between reset and remount and publish an empty list.
    let published = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snap = stream.changed().await.unwrap();
            if snap.len() == 2 {
                break snap;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(published[1].id, "5566778899");

    dash.shutdown().await;
    assert_eq!(*dash.refresh_state().borrow(), RefreshState::Idle);
    assert!(matches!(dash.start().await, Err(CoreError::ShutDown)));
}

// ── DAQ operations ──────────────────────────────────────────────────

#[tokio::test]
async fn test_read_reconciles_selected_channels() {
    let zerotier = MockServer::start().await;
    mount_members(
        &zerotier,
        json!([member("a1b2c3d4e5", "bench-1", "127.0.0.1", true)]),
    )
    .await;

    let node = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analog/input"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "port": "0", "value": "1.2" },
                { "port": "1", "value": "2.2" },
                { "port": "2", "value": "3.3" },
                { "port": "3", "value": "4.4" },
                { "port": "4", "value": "5.5" },
                { "port": "5", "value": "6.6" },
                { "port": "6", "value": "7.7" },
                { "port": "7", "value": "8.8" },
            ]
        })))
        .mount(&node)
        .await;

    let port = node.address().port();
    let table = Dashboard::oneshot(config(&zerotier, port), settings(), |dash| async move {
        dash.select_by("bench-1")?;
        let selection: ChannelSelection = "0,3".parse()?;
        dash.read_channels(ChannelGroup::AnalogInput, &selection).await
    })
    .await
    .unwrap();

    let expected: BTreeMap<u8, ChannelValue> =
        [(0, "1.2".into()), (3, "4.4".into())].into_iter().collect();
    assert_eq!(table.to_map(), expected);
    assert_eq!(table.size(), 8);
    assert!(table.get(1).is_none());
    assert!(table.get(2).is_none());
}

#[tokio::test]
async fn test_write_rejection_surfaces_node_message() {
    let zerotier = MockServer::start().await;
    let node = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/digital/output"))
        .and(body_json(json!({ "data": [1, 0, 1, 0, 1, 0, 1, 0] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "data": ["Output locked by interlock"]
        })))
        .expect(1)
        .mount(&node)
        .await;

    let dash = Dashboard::new(config(&zerotier, node.address().port()), settings()).unwrap();
    dash.select_host("127.0.0.1").unwrap();

    let err = dash
        .write_digital_output(&[1, 0, 1, 0, 1, 0, 1, 0])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Output locked by interlock");
}

#[tokio::test]
async fn test_analog_write_is_echoed() {
    let zerotier = MockServer::start().await;
    let node = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/analog/output"))
        .and(body_json(json!({ "data": [1.5, 0.0] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [1.5, 0.0]
        })))
        .mount(&node)
        .await;

    let dash = Dashboard::new(config(&zerotier, node.address().port()), settings()).unwrap();
    dash.select_host("127.0.0.1").unwrap();

    let resp = dash.write_analog_output(&[1.5, 0.0]).await.unwrap();
    assert!(resp.success);
}

#[tokio::test]
async fn test_unreachable_node_reports_connection_refused() {
    let zerotier = MockServer::start().await;
    let dash = Dashboard::new(config(&zerotier, dead_port()), settings()).unwrap();
    dash.select_host("127.0.0.1").unwrap();

    let err = dash
        .read_channels(ChannelGroup::DigitalInput, &ChannelSelection::all(8))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), CONNECTION_REFUSED);
}
