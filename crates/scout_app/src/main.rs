use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use scout_app::args::Args;
use scout_app::controller::SearchController;
use scout_app::render;
use scout_logging::{scout_error, scout_info};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.list_boards {
        for line in render::render_boards() {
            println!("{line}");
        }
        return Ok(());
    }

    if !scout_logging::initialize(args.log_destination(), args.log_level()) {
        eprintln!("warning: logging could not be initialized");
    }

    let request = args.search_request().context("invalid search")?;
    scout_info!("job-scout starting, api_url={}", args.api_url);

    let mut controller = SearchController::new(args.search_settings());
    controller.start_search(request);

    let mut shown = Vec::new();
    loop {
        let view = controller.snapshot();
        for line in render::progress_lines(&shown, &view) {
            eprintln!("{line}");
        }
        shown = view.agents.clone();

        if !controller.is_searching() {
            break;
        }
        controller.wait_for_event(POLL_INTERVAL);
    }

    let view = controller.snapshot();
    eprintln!("{}", render::summary_line(&view));

    let lines = if args.json {
        render::render_json_lines(&view.jobs).context("failed to encode jobs")?
    } else {
        render::render_results(&view.jobs)
    };
    for line in lines {
        println!("{line}");
    }

    if let Some(error) = &view.error {
        scout_error!("Search failed: {}", error);
        bail!("{error}");
    }
    Ok(())
}
