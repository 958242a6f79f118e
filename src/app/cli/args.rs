//! Command line arguments for the load driver
//!
//! Queue shape options are overrides: anything left unset falls back to the
//! configuration file, then to the built-in defaults.

use crate::app::cli::validation::{validate_positive_int, validate_queue_name};
use crate::queue::{LanePolicyKind, RouterKind};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How the run summary is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "multiqueue")]
#[command(about = "Drive synthetic flow records through a partitioned MultiQueue")]
#[command(version = crate::core::version::long_version())]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Queue name used in logs and errors
    #[arg(short = 'n', long = "name", value_name = "NAME", value_parser = validate_queue_name)]
    pub name: Option<String>,

    /// Number of partitions (one consumer each)
    #[arg(short = 'p', long = "partitions", value_name = "COUNT", value_parser = validate_positive_int)]
    pub partitions: Option<usize>,

    /// Write lanes per partition
    #[arg(short = 'L', long = "lanes", value_name = "COUNT", value_parser = validate_positive_int)]
    pub lanes: Option<usize>,

    /// Total capacity shared across partitions
    #[arg(short = 'C', long = "capacity", value_name = "ITEMS", value_parser = validate_positive_int)]
    pub capacity: Option<usize>,

    /// Items a lane buffers before merging into its partition
    #[arg(short = 'b', long = "burst", value_name = "ITEMS", value_parser = validate_positive_int)]
    pub burst: Option<usize>,

    /// Key to partition routing
    #[arg(long = "router", value_name = "ROUTER")]
    pub router: Option<RouterKind>,

    /// Producer to lane assignment
    #[arg(long = "lane-policy", value_name = "POLICY")]
    pub lane_policy: Option<LanePolicyKind>,

    /// Number of producer threads
    #[arg(short = 'P', long = "producers", value_name = "COUNT", default_value = "4", value_parser = validate_positive_int)]
    pub producers: usize,

    /// Records each producer writes
    #[arg(short = 'i', long = "items", value_name = "COUNT", default_value = "10000", value_parser = validate_positive_int)]
    pub items: usize,

    /// Records per put batch and per consumer read
    #[arg(short = 'B', long = "batch-size", value_name = "COUNT", default_value = "64", value_parser = validate_positive_int)]
    pub batch_size: usize,

    /// Distinct flow ids the records are keyed by
    #[arg(long = "flows", value_name = "COUNT", default_value = "1024", value_parser = validate_positive_int)]
    pub flows: usize,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force colored output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color")]
    pub no_color: bool,

    /// Summary format
    #[arg(short = 'o', long = "output", value_name = "FORMAT", default_value = "text")]
    pub output: OutputFormat,
}

impl Args {
    /// Color decision: explicit flags win, otherwise color when stdout is a TTY
    pub fn use_color(&self) -> bool {
        use std::io::IsTerminal;

        if self.no_color {
            false
        } else {
            self.color || std::io::stdout().is_terminal()
        }
    }
}
