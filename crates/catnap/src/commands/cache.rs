use chrono::{DateTime, Utc};
use clap::ArgMatches;
use serde::Serialize;
use tracing::info;

use catnap_core::cache::{default_cache_ttl, load_cache};
use catnap_core::refresh::age_label;
use catnap_core::storage::CatnapPaths;

use crate::table::truncate;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CachedDescription {
    name: String,
    description: String,
    fetched_at: DateTime<Utc>,
    fresh: bool,
}

pub(crate) fn handle_cache_command(
    matches: &ArgMatches,
    paths: &CatnapPaths,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let now = Utc::now();
    let ttl = default_cache_ttl();

    let entries: Vec<CachedDescription> = load_cache(&paths.cache_file())
        .into_iter()
        .map(|(name, entry)| CachedDescription {
            fresh: entry.is_fresh(now, ttl),
            name,
            description: entry.description,
            fetched_at: entry.fetched_at,
        })
        .collect();

    info!(
        event = "cli.cache_listed",
        path = %paths.cache_file().display(),
        count = entries.len()
    );

    if json_output {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No cached descriptions in {}", paths.cache_file().display());
        return Ok(());
    }

    let name_width = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(10)
        .clamp(10, 40);

    for entry in &entries {
        let freshness = if entry.fresh { "fresh" } else { "stale" };
        println!(
            "{}  {:<9}  {:<5}  {}",
            truncate(&entry.name, name_width),
            age_label(entry.fetched_at, now),
            freshness,
            truncate(&entry.description, 60).trim_end()
        );
    }
    Ok(())
}
