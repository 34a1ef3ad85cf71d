mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::path::Path;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::CliError;

/// Overrides the `-v` level, e.g. `REMOTEDAQ_LOG=remotedaq_core=debug`.
const LOG_ENV: &str = "REMOTEDAQ_LOG";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Config is loaded up front so the log directory is known before
    // tracing starts. Errors surface once a command actually needs it.
    let loaded = config::load(&cli.global);
    let log_dir = match &loaded {
        Ok(cfg) if !cli.global.no_log_file => Some(cfg.log_location()),
        _ => None,
    };
    let guard = init_tracing(cli.global.verbose, log_dir.as_deref());

    if let Err(err) = run(cli, loaded).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        // Flush the file writer; `exit` skips destructors.
        drop(guard);
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let appender = log_dir.and_then(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("remotedaq")
            .filename_suffix("log")
            .build(dir)
            .map_err(|e| eprintln!("warning: file logging disabled: {e}"))
            .ok()
    });
    let (file_layer, guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

async fn run(cli: Cli, loaded: Result<Config, CliError>) -> Result<(), CliError> {
    match cli.command {
        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "remotedaq", &mut std::io::stdout());
            Ok(())
        }

        // Config commands report on the config itself, even a broken one
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global, loaded),

        cmd => {
            let cfg = loaded?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &cli.global, &cfg).await
        }
    }
}
