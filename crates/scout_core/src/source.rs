use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A job board the backend can search. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Linkedin,
    Indeed,
    Wellfound,
    YcJobs,
    LevelsFyi,
    Glassdoor,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job board: {0}")]
pub struct UnknownSource(pub String);

impl Source {
    pub const ALL: [Source; 6] = [
        Source::Linkedin,
        Source::Indeed,
        Source::Wellfound,
        Source::YcJobs,
        Source::LevelsFyi,
        Source::Glassdoor,
    ];

    /// Boards preselected when the user does not choose any.
    pub const DEFAULT_SELECTION: [Source; 4] = [
        Source::Linkedin,
        Source::Indeed,
        Source::Wellfound,
        Source::YcJobs,
    ];

    /// Wire identifier, as sent in requests and received in events.
    pub fn id(self) -> &'static str {
        match self {
            Source::Linkedin => "linkedin",
            Source::Indeed => "indeed",
            Source::Wellfound => "wellfound",
            Source::YcJobs => "yc_jobs",
            Source::LevelsFyi => "levels_fyi",
            Source::Glassdoor => "glassdoor",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Source::Linkedin => "LinkedIn",
            Source::Indeed => "Indeed",
            Source::Wellfound => "Wellfound",
            Source::YcJobs => "Y Combinator",
            Source::LevelsFyi => "Levels.fyi",
            Source::Glassdoor => "Glassdoor",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Source {
    type Err = UnknownSource;

    /// Exact match on the wire id.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.id() == raw)
            .ok_or_else(|| UnknownSource(raw.to_string()))
    }
}
