//! Node command handlers.

use std::time::Duration;

use remotedaq_core::{CoreError, Dashboard, DirectoryStatus, NodeFilter, NodeRecord};
use tabled::Tabled;

use crate::cli::{GlobalOpts, NodesArgs, NodesCommand};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

fn row(n: &NodeRecord, color: bool) -> NodeRow {
    NodeRow {
        id: n.id.clone(),
        name: n.name.clone(),
        ip: n.ip_address.clone().unwrap_or_default(),
        status: output::online_label(n.online, color),
        last_seen: last_seen(n),
    }
}

fn last_seen(n: &NodeRecord) -> String {
    n.last_online.map_or_else(
        || "-".into(),
        |at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

fn detail(n: &NodeRecord, daq_port: u16, color: bool) -> String {
    let mut lines = vec![
        output::heading(n.display_name(), color),
        format!("ID:          {}", n.id),
        format!("Name:        {}", if n.name.is_empty() { "-" } else { &n.name }),
        format!("IP:          {}", n.ip_address.as_deref().unwrap_or("-")),
        format!(
            "Endpoint:    {}",
            n.endpoint(daq_port)
                .map_or_else(|| "-".to_owned(), String::from)
        ),
        format!("Status:      {}", output::online_label(n.online, color)),
        format!("Authorized:  {}", if n.authorized { "yes" } else { "no" }),
        format!("Last Seen:   {}", last_seen(n)),
    ];
    if let Some(ref addr) = n.physical_address {
        lines.push(format!("Physical:    {addr}"));
    }
    if let Some(ref desc) = n.description {
        lines.push(format!("Description: {desc}"));
    }
    lines.join("\n")
}

fn node_id(n: &NodeRecord) -> String {
    n.id.clone()
}

fn render_nodes(nodes: &[NodeRecord], global: &GlobalOpts) -> String {
    let color = output::should_color(&global.color);
    output::render_list(&global.output, nodes, |n| row(n, color), node_id)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: NodesArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    match args.command {
        NodesCommand::List { online } => {
            let session = util::session(global, cfg)?;
            let filter = if online {
                NodeFilter::Online
            } else {
                NodeFilter::All
            };

            let spin = util::spinner("Querying ZeroTier...", global.quiet);
            let result = session.dashboard.query_nodes(filter).await;
            spin.finish_and_clear();

            let nodes = result.map_err(|e| session.error(e))?;
            output::print_output(&render_nodes(&nodes, global), global.quiet);
            Ok(())
        }

        NodesCommand::Show { node } => {
            let session = util::session(global, cfg)?;
            let record = util::resolve_node(&session, &node).await?;
            let color = output::should_color(&global.color);
            let port = session.dashboard.config().daq_port;
            let out = output::render_single(
                &global.output,
                &record,
                |n| detail(n, port, color),
                node_id,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NodesCommand::Watch { all, interval } => watch(global, cfg, all, interval).await,
    }
}

/// Start the refresh loop and reprint the list on every change until Ctrl-C.
async fn watch(
    global: &GlobalOpts,
    cfg: &Config,
    all: bool,
    interval: Option<u64>,
) -> Result<(), CliError> {
    let session = util::session_with(global, cfg, |dash_cfg| {
        if let Some(secs) = interval {
            dash_cfg.refresh_interval = Duration::from_secs(secs.max(1));
        }
        if dash_cfg.refresh_interval.is_zero() {
            dash_cfg.refresh_interval = Duration::from_secs(3);
        }
        if all {
            dash_cfg.node_filter = NodeFilter::All;
        }
    })?;
    let dash = &session.dashboard;

    // Settings problems would only ever produce an empty list; report them.
    if let Some(field) = dash.settings().missing_field() {
        return Err(session.error(CoreError::MissingSettings { field }));
    }

    dash.start().await.map_err(|e| session.error(e))?;
    let mut stream = dash.nodes();
    print_watch_frame(&stream.latest(), dash, global);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            biased;
            _ = &mut ctrl_c => break,
            changed = stream.changed() => {
                let Some(nodes) = changed else { break };
                print_watch_frame(&nodes, dash, global);
            }
        }
    }

    dash.shutdown().await;
    Ok(())
}

fn print_watch_frame(nodes: &[NodeRecord], dash: &Dashboard, global: &GlobalOpts) {
    if let DirectoryStatus::Failed { ref reason, .. } = dash.directory_status() {
        tracing::warn!(%reason, "node directory unavailable");
    }
    output::print_output(&render_nodes(nodes, global), global.quiet);
}
