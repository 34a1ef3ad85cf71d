//! Command dispatch: bridges CLI args -> dashboard operations -> output formatting.

pub mod config_cmd;
pub mod nodes;
pub mod read;
pub mod settings;
pub mod util;
pub mod write;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a command that needs the loaded config.
pub async fn dispatch(cmd: Command, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    match cmd {
        Command::Nodes(args) => nodes::handle(args, global, cfg).await,
        Command::Read(args) => read::handle(args, global, cfg).await,
        Command::Write(args) => write::handle(args, global, cfg).await,
        Command::Settings(args) => settings::handle(args, global, cfg),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
