use std::path::PathBuf;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};
use flaccid::process::ParsePolicy;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (flaccid ",
    env!("FLACCID_VERSION"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Debug, ClapParser)]
#[command(
    name         = env!("CARGO_PKG_NAME"),
    version      = env!("CARGO_PKG_VERSION"),
    long_version = LONG_VERSION,
    author       = env!("CARGO_PKG_AUTHORS"),
    about        = "Tools for inspecting FLAC container metadata",
    long_about   = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Abort on the first anomaly (same as --policy strict).
    #[arg(long, global = true)]
    pub strict: bool,

    /// Reaction to unsupported block types and malformed block lengths.
    #[arg(long, global = true, value_enum, default_value_t = PolicyArg::StopAtUnsupported)]
    pub policy: PolicyArg,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Show a progress bar while inspecting several inputs.
    #[arg(long, global = true)]
    pub progress: bool,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn parse_policy(&self) -> ParsePolicy {
        if self.strict {
            ParsePolicy::Strict
        } else {
            self.policy.into()
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print stream information, seek table, tags and the first frame header.
    Info(InfoArgs),

    /// Print Vorbis comments as NAME=value lines.
    Tags(TagsArgs),
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Input FLAC files (use "-" for stdin).
    #[arg(value_name = "INPUT", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report: ReportFormat,
}

#[derive(Debug, Args)]
pub struct TagsArgs {
    /// Input FLAC file (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Only print comments with this field name (case-insensitive).
    #[arg(long, value_name = "NAME")]
    pub field: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum PolicyArg {
    /// Abort on any anomaly, including unsupported block types.
    Strict,
    /// End the block list at the first unsupported block type (default).
    StopAtUnsupported,
    /// Keep unsupported blocks as raw bytes and continue.
    SkipUnknown,
    /// As skip-unknown, and tolerate SEEKTABLE lengths that are not a multiple of 18.
    SkipMalformed,
}

impl From<PolicyArg> for ParsePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Strict => ParsePolicy::Strict,
            PolicyArg::StopAtUnsupported => ParsePolicy::StopAtUnsupported,
            PolicyArg::SkipUnknown => ParsePolicy::SkipUnknownRetainRaw,
            PolicyArg::SkipMalformed => ParsePolicy::SkipMalformedLength,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ReportFormat {
    /// Human-readable text.
    Text,
    /// YAML document with one entry per input.
    Yaml,
}
