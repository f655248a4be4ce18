use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
}

impl ExperienceLevel {
    pub fn id(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            "lead" => Ok(ExperienceLevel::Lead),
            other => Err(format!("unknown experience level: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("keywords must not be empty")]
    EmptyKeywords,
    #[error("at least one job board must be selected")]
    NoBoardsSelected,
}

/// A validated search request. Only [`SearchRequest::new`] can build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    keywords: String,
    location: String,
    experience_level: Option<ExperienceLevel>,
    job_boards: Vec<Source>,
}

impl SearchRequest {
    /// Trims the text fields and drops repeated boards (first occurrence wins).
    pub fn new(
        keywords: &str,
        location: &str,
        job_boards: impl IntoIterator<Item = Source>,
    ) -> Result<Self, ValidationError> {
        let keywords = keywords.trim();
        if keywords.is_empty() {
            return Err(ValidationError::EmptyKeywords);
        }

        let mut boards = Vec::new();
        for board in job_boards {
            if !boards.contains(&board) {
                boards.push(board);
            }
        }
        if boards.is_empty() {
            return Err(ValidationError::NoBoardsSelected);
        }

        Ok(Self {
            keywords: keywords.to_string(),
            location: location.trim().to_string(),
            experience_level: None,
            job_boards: boards,
        })
    }

    pub fn with_experience_level(mut self, level: Option<ExperienceLevel>) -> Self {
        self.experience_level = level;
        self
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn experience_level(&self) -> Option<ExperienceLevel> {
        self.experience_level
    }

    pub fn job_boards(&self) -> &[Source] {
        &self.job_boards
    }

    /// JSON body for the search endpoint.
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "keywords": self.keywords,
            "location": self.location,
            "job_boards": self.job_boards.iter().map(|b| b.id()).collect::<Vec<_>>(),
        });
        if let Some(level) = self.experience_level {
            body["experience_level"] = json!(level.id());
        }
        body
    }
}
