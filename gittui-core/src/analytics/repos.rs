//! Language breakdown and top repositories.

use std::collections::HashMap;

use crate::theme::language_color;
use crate::types::{LanguageStat, Repository};

/// How many entries the dashboard keeps for each list.
pub const TOP_N: usize = 5;

/// Share of non-fork repositories per primary language, largest first.
///
/// Repositories without a detected language are ignored. Equal shares are
/// ordered by language name so the list is stable across refreshes.
pub fn top_languages(repositories: &[Repository], limit: usize) -> Vec<LanguageStat> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut total = 0u32;

    for repo in repositories.iter().filter(|r| !r.is_fork) {
        if let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) {
            *counts.entry(language).or_insert(0) += 1;
            total += 1;
        }
    }

    if total == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(&str, u32)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(name, count)| LanguageStat {
            name: name.to_string(),
            percentage: f64::from(count) / f64::from(total),
            color: language_color(name),
        })
        .collect()
}

/// Repositories with the most stars, ties keeping API order.
pub fn top_repositories(repositories: &[Repository], limit: usize) -> Vec<Repository> {
    let mut sorted = repositories.to_vec();
    sorted.sort_by(|a, b| b.stars.cmp(&a.stars));
    sorted.truncate(limit);
    sorted
}
