use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

use catnap_core::config::SETTING_KEYS;

pub fn build_cli() -> Command {
    Command::new("catnap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("See which of your repositories are active, in progress or stale")
        .long_about("catnap scans a directory of git repositories, classifies each one by the age of its last commit, and groups them by category. Descriptions can be pulled from GitHub through the gh CLI and are cached for a day.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .help("Directory holding config.toml and gh-cache.json (default: ~/.config/catnap, or $CATNAP_CONFIG_DIR)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("status")
                .about("Scan once and print repositories grouped by category")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("describe")
                        .long("describe")
                        .short('d')
                        .help("Fetch stale GitHub descriptions and show them")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("watch")
                .about("Rescan on the configured interval until interrupted")
                .arg(
                    Arg::new("describe")
                        .long("describe")
                        .short('d')
                        .help("Also refresh GitHub descriptions on every cycle")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or change the configuration")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("path").about("Print the configuration file path"))
                .subcommand(
                    Command::new("init")
                        .about("Write a configuration file with default values")
                        .arg(
                            Arg::new("force")
                                .long("force")
                                .short('f')
                                .help("Overwrite an existing configuration file")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("toggle")
                        .about("Collapse or expand a category section")
                        .arg(
                            Arg::new("section")
                                .help("Category name, e.g. \"Uncategorized\"")
                                .required(true)
                                .index(1),
                        ),
                )
                .subcommand(
                    Command::new("set")
                        .about("Set a single configuration value")
                        .arg(
                            Arg::new("key")
                                .help("Configuration key")
                                .required(true)
                                .value_parser(SETTING_KEYS.to_vec())
                                .index(1),
                        )
                        .arg(
                            Arg::new("value")
                                .help("New value")
                                .required(true)
                                .allow_hyphen_values(true)
                                .index(2),
                        ),
                ),
        )
        .subcommand(
            Command::new("cache")
                .about("List cached GitHub descriptions")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .value_parser(value_parser!(Shell))
                        .index(1),
                ),
        )
}
