//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// MKV Frames - walk a Matroska element stream and hand every frame to a processor
#[derive(Parser, Debug)]
#[command(
    name = "mkv-frames",
    author,
    version,
    about = "Dispatch MKV frames with track and fragment metadata",
    long_about = "Reads a depth-first MKV element stream (one JSON element per line),\n\
                  tracks track and fragment metadata, and dispatches every SimpleBlock\n\
                  frame to the configured frame processor."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "MKV_FRAMES_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "MKV_FRAMES_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Visit an element stream and dispatch its frames
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "MKV_FRAMES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Element stream to read, overrides `input.path`
    #[arg(short, long, env = "MKV_FRAMES_INPUT")]
    pub input: Option<PathBuf>,

    /// Collect per-cluster tags and pass them to the processor
    #[arg(long)]
    pub tags: bool,

    /// Write frames to this directory with a file processor
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of elements to visit (0 = unlimited)
    #[arg(long, default_value = "0", env = "MKV_FRAMES_MAX_ELEMENTS")]
    pub max_elements: usize,

    /// Validate configuration and exit without reading the stream
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "MKV_FRAMES_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "run.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

impl Cli {
    /// Logging setup derived from `-v`, `-q` and `--log-format`
    pub fn log_config(&self) -> observability::LogConfig {
        observability::LogConfig::from_verbosity(self.verbose, self.quiet)
            .with_format(self.log_format.clone().into())
    }
}
