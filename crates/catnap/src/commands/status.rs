use chrono::{DateTime, Utc};
use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info};

use catnap_core::events;
use catnap_core::storage::CatnapPaths;
use catnap_core::{CategoryGroup, StatusCounts};

use super::build_engine;
use crate::table::{render_counts, render_groups};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    generation: u64,
    refreshed_at: Option<DateTime<Utc>>,
    counts: StatusCounts,
    groups: Vec<CategoryGroup>,
}

pub(crate) async fn handle_status_command(
    matches: &ArgMatches,
    paths: CatnapPaths,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let describe = matches.get_flag("describe");

    info!(
        event = "cli.status_started",
        json_output = json_output,
        describe = describe
    );

    let engine = build_engine(paths);
    let mut snapshot = match engine.refresh().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Failed to scan '{}': {}", engine.config().scan_path, e);
            error!(event = "cli.status_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };
    if describe {
        snapshot = engine.enrich_descriptions().await;
    }

    let config = engine.config();
    let groups = snapshot.grouped(&config);
    let counts = snapshot.status_counts();

    if json_output {
        let report = StatusReport {
            generation: snapshot.generation,
            refreshed_at: snapshot.refreshed_at,
            counts,
            groups,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if snapshot.is_empty() {
        println!("No repositories found under {}", config.scan_path);
    } else {
        println!("{}", render_groups(&groups, Utc::now(), describe));
        println!("{}", render_counts(&counts));
    }

    info!(
        event = "cli.status_completed",
        repos = snapshot.repos.len(),
        generation = snapshot.generation
    );
    Ok(())
}
