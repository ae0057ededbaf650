use std::collections::{BTreeMap, HashMap};

/// Bucket for repositories not listed in any configured category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Lowercased repository name to category, built once per configuration.
///
/// Categories are visited in name order, so a repository listed under
/// several categories belongs to the alphabetically first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    by_repo: HashMap<String, String>,
}

impl CategoryIndex {
    pub fn new(categories: &BTreeMap<String, Vec<String>>) -> Self {
        let mut by_repo = HashMap::new();
        for (category, repos) in categories {
            for repo in repos {
                by_repo
                    .entry(repo.to_lowercase())
                    .or_insert_with(|| category.clone());
            }
        }
        Self { by_repo }
    }

    pub fn category_for(&self, repo_name: &str) -> &str {
        self.by_repo
            .get(&repo_name.to_lowercase())
            .map(String::as_str)
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn len(&self) -> usize {
        self.by_repo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_repo.is_empty()
    }
}
