use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON report on stdout
    Json,
    /// Human readable listing on stdout
    Summary,
    /// JSON on stdout, listing on stderr
    Both,
}

/// Range-RAPTOR transit journey search over a JSON timetable
#[derive(Debug, Parser)]
#[command(name = "rangeraptor", version)]
pub struct Args {
    /// TOML configuration, defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Timetable JSON file
    #[arg(short, long)]
    pub timetable: PathBuf,

    /// Request JSON file
    #[arg(short, long)]
    pub request: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Both)]
    pub format: OutputFormat,

    /// Overrides the configured log level
    #[arg(long)]
    pub log_level: Option<String>,
}
