//! Repository trees and a fake `git` for refresh tests.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::git::discovery::VCS_MARKER;
use crate::process::test_helpers::{ScriptedRunner, exit_failure};

pub fn make_repos(root: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = root.join(name);
            std::fs::create_dir_all(path.join(VCS_MARKER)).unwrap();
            path
        })
        .collect()
}

/// Answers the scanner's three queries for any repository.
///
/// Every repository last committed at `last_commit`, except that names
/// starting with `empty` have no commits and names containing `dirty` have
/// local changes. `gh` lookups answer `"<slug> description"`.
pub fn fake_tools(last_commit: DateTime<Utc>) -> ScriptedRunner {
    let stamp = last_commit.to_rfc3339_opts(SecondsFormat::Secs, true);
    ScriptedRunner::new(move |args, cwd| {
        let name = cwd
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        match args[0] {
            "log" if name.starts_with("empty") => Err(exit_failure(
                "fatal: your current branch 'main' does not have any commits yet",
            )),
            "log" => Ok(stamp.clone()),
            "rev-parse" => Ok("main".to_string()),
            "status" if name.contains("dirty") => Ok(" M README.md".to_string()),
            "status" => Ok(String::new()),
            "repo" => Ok(format!("{} description", args[2])),
            other => Err(exit_failure(&format!("unexpected command {other}"))),
        }
    })
}
