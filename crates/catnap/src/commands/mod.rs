use std::path::PathBuf;
use std::sync::Arc;

use clap::ArgMatches;
use tracing::error;

use catnap_core::process::{CommandRunner, Toolchain};
use catnap_core::storage::CatnapPaths;
use catnap_core::{RefreshEngine, events};

mod cache;
mod completions;
mod config;
mod status;
mod watch;

pub async fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    let paths = resolve_paths(matches);

    match matches.subcommand() {
        Some(("status", sub_matches)) => status::handle_status_command(sub_matches, paths).await,
        Some(("watch", sub_matches)) => watch::handle_watch_command(sub_matches, paths).await,
        Some(("config", sub_matches)) => config::handle_config_command(sub_matches, &paths),
        Some(("cache", sub_matches)) => cache::handle_cache_command(sub_matches, &paths),
        Some(("completions", sub_matches)) => {
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

/// `--config-dir` when given, otherwise the default location.
fn resolve_paths(matches: &ArgMatches) -> CatnapPaths {
    match matches.get_one::<PathBuf>("config-dir") {
        Some(dir) => CatnapPaths::new(dir.clone()),
        None => CatnapPaths::resolve(),
    }
}

fn build_engine(paths: CatnapPaths) -> RefreshEngine {
    RefreshEngine::new(paths, Arc::new(CommandRunner::default()), Toolchain::detect())
}
