use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;

/// Rename media files to a canonical name using a remote naming service
#[derive(Parser, Debug)]
#[command(name = "movie-tidy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output. Any NO_COLOR value except a falsey one (`0`, `false`, `no`, `off`) counts
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up canonical names for the files in a directory and rename them
    Run(RunArgs),

    /// Show version information
    Version {
        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },
}

/// Arguments of `run`. Unset values fall back to the configuration file.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory to scan [default: ./]
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Naming template sent to the service [default: [year][star]title_short]
    #[arg(long = "name_format", visible_alias = "name-format", value_name = "FORMAT")]
    pub name_format: Option<String>,

    /// Confirm interactively even when only one name comes back [default: true]
    #[arg(
        long = "manual_mode",
        visible_alias = "manual-mode",
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub manual_mode: Option<bool>,

    /// Only process the N most recently modified files (0 = all)
    #[arg(long = "recent_file_count", visible_alias = "recent-file-count", value_name = "N")]
    pub recent_file_count: Option<usize>,

    /// Only process the file with exactly this name
    #[arg(long, value_name = "NAME", default_value = "")]
    pub filename: String,

    /// Base URL of the naming service
    #[arg(long, value_name = "URL", env = "MOVIE_TIDY_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Attempts per file when the naming service cannot be reached
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Output format of the final summary
    #[arg(long, value_enum, default_value = "summary")]
    pub output: OutputFormat,
}
