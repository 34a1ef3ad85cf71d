//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

pub fn handle(
    args: ConfigArgs,
    global: &GlobalOpts,
    loaded: Result<Config, CliError>,
) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", config::active_config_path(global).display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = loaded?;
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&cfg)
                    .map_err(|e| CliError::Config(e.into()))?,
                _ => output::render_single(&global.output, &cfg, |_| String::new(), |_| String::new()),
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }
    }
}
