//! Clap derive structures for the `remotedaq` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// remotedaq -- operate DAQ nodes on a ZeroTier network
#[derive(Debug, Parser)]
#[command(
    name = "remotedaq",
    version,
    about = "Operate remote DAQ nodes over a ZeroTier network",
    long_about = "Discover DAQ nodes through ZeroTier Central, read their analog and\n\
        digital inputs, read back and set their outputs, and manage the\n\
        network credentials the dashboard uses.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "REMOTEDAQ_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, env = "REMOTEDAQ_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Path to the network settings file
    #[arg(long, env = "REMOTEDAQ_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, env = "REMOTEDAQ_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Do not write the rolling log file
    #[arg(long, global = true)]
    pub no_log_file: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and inspect DAQ nodes on the network
    #[command(alias = "n")]
    Nodes(NodesArgs),

    /// Read a channel group from a node
    #[command(alias = "r")]
    Read(ReadArgs),

    /// Set output channels on a node
    #[command(alias = "w")]
    Write(WriteArgs),

    /// Manage the ZeroTier token and network id
    Settings(SettingsArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Nodes ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List network members other than this machine
    #[command(alias = "ls")]
    List {
        /// Only show nodes that are online
        #[arg(long)]
        online: bool,
    },

    /// Show one node's status
    Show {
        /// Node id, name, or IP address
        node: String,
    },

    /// Keep listing nodes, reprinting whenever the set changes (Ctrl-C stops)
    Watch {
        /// Include offline nodes
        #[arg(long)]
        all: bool,

        /// Refresh interval in seconds (overrides the config file)
        #[arg(long)]
        interval: Option<u64>,
    },
}

// ── Read ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Channel group to read
    pub group: ReadGroup,

    /// Node id, name, or IP address
    #[arg(long, short = 'n')]
    pub node: String,

    /// Channels to read, e.g. "0,3" or "0-7"
    #[arg(long, short = 'c', conflicts_with = "all")]
    pub channels: Option<String>,

    /// Read every channel of the group
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReadGroup {
    /// Analog inputs
    Analog,
    /// Digital inputs
    Digital,
    /// Digital output latch state
    DigitalOutput,
}

// ── Write ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WriteArgs {
    #[command(subcommand)]
    pub command: WriteCommand,
}

#[derive(Debug, Subcommand)]
pub enum WriteCommand {
    /// Set the analog output channels
    Analog {
        /// Node id, name, or IP address
        #[arg(long, short = 'n')]
        node: String,

        /// One value per analog output channel
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Set the digital output channels
    Digital {
        /// Node id, name, or IP address
        #[arg(long, short = 'n')]
        node: String,

        /// One state (0 or 1) per digital output channel
        #[arg(required = true, num_args = 1..)]
        states: Vec<u8>,
    },
}

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the stored network settings
    Show {
        /// Print the API token in full
        #[arg(long)]
        reveal: bool,
    },

    /// Update the stored network settings
    Set {
        /// ZeroTier Central API token
        #[arg(long)]
        token: Option<String>,

        /// ZeroTier network id
        #[arg(long)]
        network: Option<String>,
    },

    /// Prompt for the network settings and save them
    Init,

    /// Print the settings file path
    Path,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
