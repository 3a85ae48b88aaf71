//! Package search command
//!
//! Queries every source in turn. A source that fails gets an error marker in
//! its section and never hides the others.

use crate::core::types::Source;
use crate::error::Result;
use crate::packages::traits::{PackageSearchResult, SearchQuery};
use crate::traits::BackendProvider;
use crate::ui as output;
use crate::utils::action_log;
use colored::Colorize;

/// Section order in the rendered report.
pub const SEARCH_ORDER: [Source; 4] = [Source::Registry, Source::Pacman, Source::Aur, Source::Flatpak];

pub const NO_RESULTS: &str = "No results found.";

#[derive(Debug, Clone, PartialEq)]
pub enum SectionResult {
    Hits(Vec<PackageSearchResult>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSection {
    pub source: Source,
    pub result: SectionResult,
}

#[derive(Debug, Clone)]
pub struct SearchReport {
    pub query: String,
    pub sections: Vec<SearchSection>,
}

impl SearchReport {
    pub fn total_hits(&self) -> usize {
        self.sections
            .iter()
            .map(|s| match &s.result {
                SectionResult::Hits(hits) => hits.len(),
                SectionResult::Error(_) => 0,
            })
            .sum()
    }
}

/// Sequential fan-out over `sources`.
pub fn aggregate(
    backends: &dyn BackendProvider,
    sources: &[Source],
    query: &SearchQuery,
) -> SearchReport {
    let sections = sources
        .iter()
        .map(|&source| {
            output::verbose(&format!("Searching {}...", source.display_name()));
            let result = match backends.backend(source).and_then(|b| b.search(query)) {
                Ok(hits) => SectionResult::Hits(hits),
                Err(e) => SectionResult::Error(e.to_string()),
            };
            SearchSection { source, result }
        })
        .collect();

    SearchReport {
        query: query.text.clone(),
        sections,
    }
}

fn format_hit(hit: &PackageSearchResult) -> String {
    let mut line = hit.name.clone();
    if let Some(version) = &hit.version {
        line.push(' ');
        line.push_str(version);
    }
    if let Some(annotation) = &hit.annotation {
        line.push_str(&format!(" ({})", annotation));
    }
    if let Some(description) = &hit.description {
        line.push_str(" - ");
        line.push_str(description);
    }
    line
}

/// Plain-text rendering: every section, each with hits or an explicit marker.
pub fn render(report: &SearchReport) -> String {
    let mut out = String::new();
    for section in &report.sections {
        out.push_str(&format!("== {} ==\n", section.source.display_name()));
        match &section.result {
            SectionResult::Hits(hits) if hits.is_empty() => {
                out.push_str(&format!("  {}\n", NO_RESULTS));
            }
            SectionResult::Hits(hits) => {
                for hit in hits {
                    out.push_str(&format!("  {}\n", format_hit(hit)));
                }
            }
            SectionResult::Error(message) => {
                out.push_str(&format!("  Error: {}\n", message));
            }
        }
    }
    out
}

fn print_report(report: &SearchReport) {
    for section in &report.sections {
        output::header(section.source.display_name());
        match &section.result {
            SectionResult::Hits(hits) if hits.is_empty() => {
                output::indent(&NO_RESULTS.dimmed().to_string(), 1);
            }
            SectionResult::Hits(hits) => {
                for hit in hits {
                    output::indent(&format_hit(hit), 1);
                }
            }
            SectionResult::Error(message) => {
                output::indent(&format!("{} {}", "Error:".red(), message), 1);
            }
        }
    }

    println!();
    output::info(&format!(
        "{} result(s) for '{}'",
        report.total_hits(),
        report.query
    ));
}

pub fn run(backends: &dyn BackendProvider, query: SearchQuery) -> Result<()> {
    let report = aggregate(backends, &SEARCH_ORDER, &query);
    print_report(&report);
    action_log::log_action(&format!("Searched for '{}'", query.text));
    Ok(())
}

#[cfg(test)]
mod tests;
