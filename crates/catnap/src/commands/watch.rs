use chrono::Utc;
use clap::ArgMatches;
use tracing::{info, warn};

use catnap_core::events;
use catnap_core::storage::CatnapPaths;

use super::build_engine;
use crate::table::{render_counts, render_groups};

pub(crate) async fn handle_watch_command(
    matches: &ArgMatches,
    paths: CatnapPaths,
) -> Result<(), Box<dyn std::error::Error>> {
    let describe = matches.get_flag("describe");

    let engine = build_engine(paths);
    let config = engine.config();
    info!(
        event = "cli.watch_started",
        scan_path = %config.scan_path,
        interval_minutes = config.refresh_interval_minutes,
        describe = describe
    );

    let mut snapshots = engine.subscribe();
    engine.set_expanded(describe);
    engine.start_polling();

    println!(
        "Watching {} every {} min. Press Ctrl-C to stop.",
        config.scan_path,
        config.refresh_interval().as_secs() / 60
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    warn!(event = "cli.watch_channel_closed");
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                let groups = snapshot.grouped(&engine.config());
                let refreshed = snapshot
                    .refreshed_at
                    .map(|at| at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
                    .unwrap_or_default();

                println!();
                println!("── refresh #{} at {} ──", snapshot.generation, refreshed);
                if snapshot.is_empty() {
                    println!("No repositories found under {}", engine.config().scan_path);
                } else {
                    println!("{}", render_groups(&groups, Utc::now(), describe));
                    println!("{}", render_counts(&snapshot.status_counts()));
                }
            }
            _ = &mut ctrl_c => {
                info!(event = "cli.watch_interrupted");
                break;
            }
        }
    }

    events::log_app_shutdown();
    engine.shutdown().await;
    info!(event = "cli.watch_completed");
    Ok(())
}
