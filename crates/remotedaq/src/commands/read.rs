//! Channel read handler.

use serde::Serialize;
use tabled::Tabled;

use remotedaq_core::{ChannelGroup, ChannelSelection, ChannelTable, ChannelValue};

use crate::cli::{GlobalOpts, ReadArgs, ReadGroup};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

use super::util;

impl From<ReadGroup> for ChannelGroup {
    fn from(group: ReadGroup) -> Self {
        match group {
            ReadGroup::Analog => Self::AnalogInput,
            ReadGroup::Digital => Self::DigitalInput,
            ReadGroup::DigitalOutput => Self::DigitalOutputReadback,
        }
    }
}

// ── Rows ────────────────────────────────────────────────────────────

/// One slot of the channel table; blank slots serialize as `null`.
#[derive(Serialize)]
struct Slot {
    channel: usize,
    value: Option<ChannelValue>,
}

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Channel")]
    channel: usize,
    #[tabled(rename = "Value")]
    value: String,
}

fn slots(table: &ChannelTable) -> Vec<Slot> {
    table
        .slots()
        .iter()
        .enumerate()
        .map(|(channel, value)| Slot {
            channel,
            value: value.clone(),
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ReadArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let group = ChannelGroup::from(args.group);
    let size = cfg.channels.size(group);

    // Rejected before any network traffic.
    let selection = selection(&args, size)?;
    selection.validate(size)?;

    let session = util::session(global, cfg)?;
    let node = util::resolve_node(&session, &args.node).await?;

    let spin = util::spinner(
        format!("Reading {} from {}...", group.label(), node.display_name()),
        global.quiet,
    );
    let result = session.dashboard.read_channels(group, &selection).await;
    spin.finish_and_clear();
    let table = result.map_err(|e| session.error(e))?;

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &slots(&table),
        |s| SlotRow {
            channel: s.channel,
            value: s
                .value
                .as_ref()
                .map_or_else(|| output::blank(color), ToString::to_string),
        },
        |s| s.value.as_ref().map(ToString::to_string).unwrap_or_default(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn selection(args: &ReadArgs, size: usize) -> Result<ChannelSelection, CliError> {
    if args.all {
        return Ok(ChannelSelection::all(size));
    }
    match args.channels.as_deref() {
        Some(list) => Ok(list.parse::<ChannelSelection>()?),
        None => Err(CliError::Validation {
            field: "channels".into(),
            reason: "select channels with --channels or --all".into(),
        }),
    }
}
