//! Command-line configuration for the job scout binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use scout_core::{ExperienceLevel, SearchRequest, Source, UnknownSource, ValidationError};
use scout_engine::SearchSettings;
use scout_logging::{LogDestination, DEFAULT_LOG_FILE};

/// Search several job boards in parallel and aggregate what they find.
#[derive(Parser, Debug, Clone)]
#[command(name = "job-scout")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Job title or keywords, e.g. "AI Engineer"
    #[arg(short = 'k', long)]
    pub keywords: Option<String>,

    /// Location, e.g. "San Francisco" or "Remote"
    #[arg(short = 'l', long, default_value = "")]
    pub location: String,

    /// Job board to search; repeat for several (default: linkedin, indeed, wellfound, yc_jobs)
    #[arg(short = 'b', long = "board", value_parser = parse_source)]
    pub boards: Vec<Source>,

    /// Experience level filter: entry, mid, senior or lead
    #[arg(short = 'x', long, value_parser = parse_experience)]
    pub experience: Option<ExperienceLevel>,

    /// Base url of the search service
    #[arg(long, env = "SCOUT_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Seconds allowed for establishing the connection
    #[arg(long, default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Seconds allowed for the whole search (default: no limit)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Where to write log output
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log file used by the `file` and `both` targets
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log at debug level
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Print the aggregated jobs as JSON lines instead of a table
    #[arg(long)]
    pub json: bool,

    /// List the known job boards and exit
    #[arg(long)]
    pub list_boards: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
    Off,
}

impl Args {
    pub fn search_request(&self) -> Result<SearchRequest, ValidationError> {
        let boards = if self.boards.is_empty() {
            Source::DEFAULT_SELECTION.to_vec()
        } else {
            self.boards.clone()
        };
        let keywords = self.keywords.as_deref().unwrap_or_default();
        Ok(SearchRequest::new(keywords, &self.location, boards)?
            .with_experience_level(self.experience))
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            api_url: self.api_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.timeout_secs.map(Duration::from_secs),
            ..SearchSettings::default()
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(self.log_file.clone()),
            LogTarget::Both => LogDestination::Both(self.log_file.clone()),
            LogTarget::Off => LogDestination::Off,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

/// Command-line board names are case-insensitive; wire ids are not.
fn parse_source(raw: &str) -> Result<Source, UnknownSource> {
    raw.trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| UnknownSource(raw.to_string()))
}

fn parse_experience(raw: &str) -> Result<ExperienceLevel, String> {
    raw.parse()
}
