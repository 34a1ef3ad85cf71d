//! Output write handlers.

use remotedaq_core::{DaqEntry, DaqResponse};

use crate::cli::{GlobalOpts, WriteArgs, WriteCommand};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: WriteArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let (node, summary) = match &args.command {
        WriteCommand::Analog { node, values } => (node, join(values)),
        WriteCommand::Digital { node, states } => (node, join(states)),
    };

    let session = util::session(global, cfg)?;
    let record = util::resolve_node(&session, node).await?;
    let dash = &session.dashboard;

    let spin = util::spinner(
        format!("Writing to {}...", record.display_name()),
        global.quiet,
    );
    let result = match &args.command {
        WriteCommand::Analog { values, .. } => dash.write_analog_output(values).await,
        WriteCommand::Digital { states, .. } => dash.write_digital_output(states).await,
    };
    spin.finish_and_clear();
    let response = result.map_err(|e| session.error(e))?;

    tracing::info!(node = %record.display_name(), values = %summary, "outputs written");
    let out = output::render_single(
        &global.output,
        &response,
        |_| format!("Set {} outputs to [{summary}]", record.display_name()),
        |r: &DaqResponse| {
            r.data
                .iter()
                .map(entry_text)
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn entry_text(entry: &DaqEntry) -> String {
    match entry {
        DaqEntry::Channel(payload) => payload.value.to_string(),
        DaqEntry::Message(msg) => msg.clone(),
        DaqEntry::Other(value) => value.to_string(),
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
