use clap::ArgMatches;
use tracing::{error, info, warn};

use catnap_core::CatnapConfig;
use catnap_core::config::{apply_setting, render_config, save_config, try_load_config};
use catnap_core::events;
use catnap_core::storage::CatnapPaths;

pub(crate) fn handle_config_command(
    matches: &ArgMatches,
    paths: &CatnapPaths,
) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("show", _)) => {
            let config = load_config_with_warning(paths);
            print!("{}", render_config(&config)?);
            Ok(())
        }
        Some(("path", _)) => {
            println!("{}", paths.config_file().display());
            if !paths.config_file().exists() && paths.legacy_config_file().exists() {
                eprintln!(
                    "Note: reading legacy {}. It is migrated to {} on the next save.",
                    paths.legacy_config_file().display(),
                    paths.config_file().display()
                );
            }
            Ok(())
        }
        Some(("init", sub_matches)) => handle_init(paths, sub_matches.get_flag("force")),
        Some(("toggle", sub_matches)) => {
            let section = sub_matches
                .get_one::<String>("section")
                .ok_or("Section argument is required")?;
            handle_toggle(paths, section)
        }
        Some(("set", sub_matches)) => {
            let key = sub_matches
                .get_one::<String>("key")
                .ok_or("Key argument is required")?;
            let value = sub_matches
                .get_one::<String>("value")
                .ok_or("Value argument is required")?;
            handle_set(paths, key, value)
        }
        _ => {
            error!(event = "cli.config_command_unknown");
            Err("Unknown config command".into())
        }
    }
}

/// Load the config file, telling the user when it exists but can't be used.
fn load_config_with_warning(paths: &CatnapPaths) -> CatnapConfig {
    match try_load_config(&paths.config_file()) {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check {} for syntax errors.",
                e,
                paths.config_file().display()
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            CatnapConfig::default()
        }
    }
}

fn handle_init(paths: &CatnapPaths, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = paths.config_file();
    if path.exists() && !force {
        eprintln!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
        return Err("Config file already exists".into());
    }

    save_config(&path, &CatnapConfig::default())?;
    println!("Wrote default configuration to {}", path.display());
    info!(event = "cli.config_init_completed", path = %path.display());
    Ok(())
}

fn handle_toggle(paths: &CatnapPaths, section: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_warning(paths).toggle_section(section);

    if let Err(e) = save_config(&paths.config_file(), &config) {
        eprintln!("Failed to save config: {}", e);
        events::log_app_error(&e);
        return Err(e.into());
    }

    let state = if config.is_section_collapsed(section) {
        "collapsed"
    } else {
        "expanded"
    };
    println!("Section '{}' is now {}", section, state);
    info!(
        event = "cli.config_toggle_completed",
        section = section,
        state = state
    );
    Ok(())
}

fn handle_set(
    paths: &CatnapPaths,
    key: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let current = load_config_with_warning(paths);

    let updated = match apply_setting(&current, key, value).and_then(|c| c.validate().map(|_| c)) {
        Ok(updated) => updated,
        Err(e) => {
            eprintln!("Invalid value for {}: {}", key, e);
            error!(event = "cli.config_set_failed", key = key, error = %e);
            return Err(e.into());
        }
    };

    save_config(&paths.config_file(), &updated)?;
    println!("Set {} = {}", key, value);
    info!(event = "cli.config_set_completed", key = key);
    Ok(())
}
