//! CLI argument definitions for `gleaner`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "gleaner",
    version,
    about = "Populate structured records from HTML pages or text batches",
    long_about = "Populate structured records from HTML pages or text batches.\n\n\
                  Fields, their queries and their input/output processors are\n\
                  described in a JSON loader configuration. The materialized\n\
                  record is printed as JSON on stdout."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a record from an HTML page.
    Html(HtmlArgs),

    /// Load a record from a text file, one text per line.
    Text(TextArgs),
}

#[derive(Parser)]
pub struct HtmlArgs {
    /// Loader configuration (JSON).
    #[arg(long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// HTML page to load from.
    #[arg(value_name = "PAGE")]
    pub page: PathBuf,

    /// URL the page was fetched from, exposed to processors as the response.
    #[arg(long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Keep fields whose output value is empty.
    #[arg(long = "keep-empty")]
    pub keep_empty: bool,
}

#[derive(Parser)]
pub struct TextArgs {
    /// Loader configuration (JSON).
    #[arg(long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// Text file, one text per line.
    #[arg(value_name = "TEXTS")]
    pub texts: PathBuf,

    /// Regex separating keys from values; field queries then match keys.
    #[arg(long = "kv-split", value_name = "SEP")]
    pub kv_split: Option<String>,

    /// Keep fields whose output value is empty.
    #[arg(long = "keep-empty")]
    pub keep_empty: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
