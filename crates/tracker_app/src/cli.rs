use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracker_core::Company;
use tracker_logging::LogDestination;

#[derive(Debug, Parser)]
#[command(
    name = "job-tracker",
    version,
    about = "Browse scraped job postings and trigger company scrapes"
)]
pub struct Cli {
    /// Backend base URL; overrides the config file and JOB_TRACKER_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// RON config file (defaults to ./job-tracker.ron when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File, global = true)]
    pub log: LogTarget,

    /// Run a single action and exit instead of the interactive screen.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Fetch and print the job list.
    List,
    /// Scrape one company, then print the refreshed list.
    Scrape { company: Company },
    /// Delete old postings, then print the refreshed list.
    Cleanup,
}
