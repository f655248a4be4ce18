use scout_core::{AgentCardView, AppViewModel, JobRecord, SessionPhase, Source};

const TITLE_WIDTH: usize = 40;
const COMPANY_WIDTH: usize = 24;
const LOCATION_WIDTH: usize = 20;

pub fn render_boards() -> Vec<String> {
    Source::ALL
        .iter()
        .map(|source| format!("{:<12} {}", source.id(), source.display_name()))
        .collect()
}

/// Lines for agent cards that differ from the previous snapshot.
pub fn progress_lines(previous: &[AgentCardView], view: &AppViewModel) -> Vec<String> {
    view.agents
        .iter()
        .filter(|card| {
            previous
                .iter()
                .find(|old| old.source == card.source)
                .map_or(true, |old| old != *card)
        })
        .map(agent_line)
        .collect()
}

fn agent_line(card: &AgentCardView) -> String {
    let mut line = format!("[{}] {}", card.name, card.status);
    if let Some(message) = &card.message {
        line.push_str(&format!(": {message}"));
    }
    if card.job_count > 0 {
        line.push_str(&format!(" ({} jobs)", card.job_count));
    }
    if let Some(url) = &card.streaming_url {
        line.push_str(&format!(" live: {url}"));
    }
    if let Some(error) = &card.error {
        line.push_str(&format!(" error: {error}"));
    }
    line
}

pub fn summary_line(view: &AppViewModel) -> String {
    let phase = match view.phase {
        SessionPhase::Idle => "Idle",
        SessionPhase::Streaming => "Searching",
        SessionPhase::Completed => "Completed",
        SessionPhase::Failed => "Failed",
    };
    let summary = &view.summary;
    let mut line = format!(
        "{}: {} boards, {} running, {} completed, {} failed, {} jobs",
        phase,
        summary.boards,
        summary.running,
        summary.completed,
        summary.failed,
        summary.jobs_found
    );
    if view.dropped_events > 0 {
        line.push_str(&format!(", {} unreadable updates", view.dropped_events));
    }
    line
}

pub fn render_results(jobs: &[JobRecord]) -> Vec<String> {
    if jobs.is_empty() {
        return vec!["No jobs found.".to_string()];
    }

    let mut lines = Vec::with_capacity(jobs.len() + 2);
    lines.push(format!(
        "{:<tw$}  {:<cw$}  {:<lw$}  {:<10}  {}",
        "Title",
        "Company",
        "Location",
        "Source",
        "Url",
        tw = TITLE_WIDTH,
        cw = COMPANY_WIDTH,
        lw = LOCATION_WIDTH,
    ));
    lines.push("-".repeat(TITLE_WIDTH + COMPANY_WIDTH + LOCATION_WIDTH + 20));
    for job in jobs {
        lines.push(format!(
            "{:<tw$}  {:<cw$}  {:<lw$}  {:<10}  {}",
            truncate(&job.title, TITLE_WIDTH),
            truncate(&job.company, COMPANY_WIDTH),
            truncate(&job.location, LOCATION_WIDTH),
            job.source.id(),
            job.url,
            tw = TITLE_WIDTH,
            cw = COMPANY_WIDTH,
            lw = LOCATION_WIDTH,
        ));
    }
    lines
}

pub fn render_json_lines(jobs: &[JobRecord]) -> serde_json::Result<Vec<String>> {
    jobs.iter().map(serde_json::to_string).collect()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
