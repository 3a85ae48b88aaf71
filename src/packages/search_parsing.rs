//! Parsers for the `-Ss` listing format shared by pacman and AUR helpers:
//!
//! ```text
//! extra/vim 9.1.0-1 [installed]
//!     Vi Improved, a highly configurable text editor
//! ```

use crate::core::types::Source;
use crate::packages::traits::PackageSearchResult;

/// Entries start at column 0 as `[repo/]name version [extra...]`; indented
/// lines that follow belong to that entry's description.
pub fn parse_indented_listing(stdout: &str, backend: Source) -> Vec<PackageSearchResult> {
    let mut results: Vec<PackageSearchResult> = Vec::new();

    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            if let Some(current) = results.last_mut() {
                let text = line.trim();
                current.description = Some(match current.description.take() {
                    Some(existing) => format!("{} {}", existing, text),
                    None => text.to_string(),
                });
            }
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(qualified) = parts.next() else {
            continue;
        };
        let version = parts.next().map(str::to_string);
        let extra: Vec<&str> = parts.collect();

        let (repo, name) = match qualified.split_once('/') {
            Some((repo, name)) => (Some(repo), name),
            None => (None, qualified),
        };

        let annotation = match (repo, extra.is_empty()) {
            (Some(repo), true) => Some(repo.to_string()),
            (Some(repo), false) => Some(format!("{} {}", repo, extra.join(" "))),
            (None, false) => Some(extra.join(" ")),
            (None, true) => None,
        };

        results.push(PackageSearchResult {
            name: name.to_string(),
            version,
            description: None,
            backend,
            annotation,
        });
    }

    results
}
