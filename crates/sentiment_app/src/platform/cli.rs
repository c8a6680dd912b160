use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use sentiment_core::Category;
use sentiment_engine::DEFAULT_BASE_URL;

use super::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "sentiment_client")]
#[command(about = "Runs a sentiment analysis job and renders its KPI dashboard")]
#[command(version)]
pub struct Cli {
    /// Company to analyse
    #[arg(short, long, default_value = "")]
    pub company: String,

    /// Free-text hints forwarded with the job
    #[arg(long, default_value = "")]
    pub hints: String,

    /// Maximum number of source links (capped at 50; invalid input means 12)
    #[arg(long, default_value = "12", allow_hyphen_values = true)]
    pub max_links: String,

    /// Backend base URL
    #[arg(long, env = "SENTIMENT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Status poll cadence in milliseconds
    #[arg(long, default_value_t = 900, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_ms: u64,

    /// Directory the export archive is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Open the detail view of a KPI category once the job finishes (repeatable)
    #[arg(long = "detail", value_name = "CATEGORY", value_parser = parse_category)]
    pub details: Vec<Category>,

    /// Request recommended actions when the Predictive Analysis detail is open
    #[arg(long)]
    pub generate_actions: bool,

    /// Export the rendered panels once the job finishes
    #[arg(long)]
    pub export: bool,

    /// Log verbosity (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Where log lines go
    #[arg(long, value_enum, default_value = "terminal")]
    pub log: LogDestination,
}

impl Cli {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::from_name(raw).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
        format!("unknown category '{raw}', expected one of: {}", known.join(", "))
    })
}
