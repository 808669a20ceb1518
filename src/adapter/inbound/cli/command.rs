//! Command-line interface definitions.
//!
//! Defines the CLI structure for sceneboard using `clap`: browsing and
//! editing events, playback, import/export, the image manifest and
//! configuration management.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::paths;
use crate::application::catalog::DEFAULT_PREFIX;

/// Author and play back dialogue events
#[derive(Parser, Debug)]
#[command(name = "sceneboard")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Resolve against the terminal and `NO_COLOR`.
    #[must_use]
    pub fn enabled(self) -> bool {
        use std::io::IsTerminal;
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
        }
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all events
    List,

    /// Show one event and its dialogs
    Show(EventArg),

    /// Create a new event
    Create(CreateArgs),

    /// Rename an event
    Rename(RenameArgs),

    /// Delete an event
    Delete(DeleteArgs),

    /// Edit an event's dialogs interactively
    Edit(EventArg),

    /// Play an event in the terminal
    Play(PlayArgs),

    /// Export all dialogs as a JavaScript module
    Export(ExportArgs),

    /// Import dialogs from a JavaScript module
    Import(ImportArgs),

    /// Manage the character image manifest
    #[command(subcommand)]
    Images(ImagesCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `sceneboard images`.
#[derive(Subcommand, Debug)]
pub enum ImagesCommand {
    /// Scan an image directory and write its manifest.
    Scan(ImagesScanArgs),
}

/// Subcommands for `sceneboard config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate the configuration file.
    Validate,
}

/// Subcommands for `sceneboard check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Probe the configured store without falling back.
    Store,
}

/// A single event id.
#[derive(Parser, Debug)]
pub struct EventArg {
    /// Event id.
    pub id: String,
}

/// Arguments for `create`.
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Event name.
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for `rename`.
#[derive(Parser, Debug)]
pub struct RenameArgs {
    /// Event id.
    pub id: String,
    /// New name.
    pub name: String,
}

/// Arguments for `delete`.
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Event id.
    pub id: String,
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `play`.
#[derive(Parser, Debug)]
pub struct PlayArgs {
    /// Event id.
    pub id: String,
    /// Print lines at once and advance on Enter.
    #[arg(long)]
    pub no_animate: bool,
}

/// Arguments for `export`.
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Output file (writes to stdout if not specified).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `import`.
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Module file to read, or `-` for stdin.
    pub file: PathBuf,
}

/// Arguments for `images scan`.
#[derive(Parser, Debug)]
pub struct ImagesScanArgs {
    /// Image directory.
    #[arg(long, default_value = "img")]
    pub dir: PathBuf,
    /// Prefix written before each file name.
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,
    /// Manifest path (defaults to `<dir>/images.json`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `config init`.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Output path (defaults to the global `--config` path).
    pub path: Option<PathBuf>,
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}
