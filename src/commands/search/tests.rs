use super::*;
use crate::core::types::Action;
use crate::error::MeowError;
use crate::packages::traits::{Backend, ExecStatus, InstallTarget};

struct CannedBackend {
    source: Source,
    hits: Option<Vec<&'static str>>,
}

impl Backend for CannedBackend {
    fn source(&self) -> Source {
        self.source
    }

    fn is_available(&self) -> bool {
        true
    }

    fn exists(&self, _name: &str) -> bool {
        false
    }

    fn resolve_target(&self, _action: Action, _name: &str) -> Result<Option<InstallTarget>> {
        Ok(None)
    }

    fn execute(&self, _action: Action, _target: &InstallTarget) -> Result<ExecStatus> {
        Ok(ExecStatus::ok())
    }

    fn resolve_version(&self, _target: &InstallTarget) -> String {
        "unknown".to_string()
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<PackageSearchResult>> {
        match &self.hits {
            Some(names) => Ok(names
                .iter()
                .take(query.limit)
                .map(|name| PackageSearchResult {
                    name: name.to_string(),
                    version: Some("1.0".to_string()),
                    description: Some("a tool".to_string()),
                    backend: self.source,
                    annotation: None,
                })
                .collect()),
            None => Err(MeowError::TransportError {
                endpoint: "http://localhost:8000/api/packages".to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}

/// Registry is down, pacman has two hits, the rest have none.
struct Canned;

impl BackendProvider for Canned {
    fn backend(&self, source: Source) -> Result<Box<dyn Backend>> {
        let hits = match source {
            Source::Registry => None,
            Source::Pacman => Some(vec!["catfetch", "catimg"]),
            Source::Aur | Source::Flatpak => Some(Vec::new()),
        };
        Ok(Box::new(CannedBackend { source, hits }))
    }
}

#[test]
fn one_failing_backend_does_not_hide_the_others() {
    let report = aggregate(&Canned, &SEARCH_ORDER, &SearchQuery::new("cat"));

    assert_eq!(report.sections.len(), 4);
    assert!(matches!(report.sections[0].result, SectionResult::Error(_)));
    match &report.sections[1].result {
        SectionResult::Hits(hits) => {
            let names: Vec<&str> = hits.iter().map(|h| h.name.as_str()).collect();
            assert_eq!(names, ["catfetch", "catimg"]);
        }
        other => panic!("unexpected section: {other:?}"),
    }
    assert_eq!(report.total_hits(), 2);
}

#[test]
fn render_marks_every_section() {
    let report = aggregate(&Canned, &SEARCH_ORDER, &SearchQuery::new("cat"));
    let text = render(&report);

    assert!(text.contains("== Meow registry ==\n  Error: Could not reach"));
    assert!(text.contains("== Pacman ==\n  catfetch 1.0 - a tool\n  catimg 1.0 - a tool\n"));
    assert!(text.contains("== AUR ==\n  No results found.\n"));
    assert!(text.contains("== Flathub ==\n  No results found.\n"));
}

#[test]
fn provider_errors_become_error_sections() {
    struct Broken;
    impl BackendProvider for Broken {
        fn backend(&self, _source: Source) -> Result<Box<dyn Backend>> {
            Err(MeowError::ConfigError("bad registry-url".to_string()))
        }
    }

    let report = aggregate(&Broken, &[Source::Registry], &SearchQuery::new("x"));
    assert_eq!(
        report.sections[0].result,
        SectionResult::Error("Configuration error: bad registry-url".to_string())
    );
}

#[test]
fn limit_is_passed_through() {
    let query = SearchQuery {
        limit: 1,
        ..SearchQuery::new("cat")
    };
    let report = aggregate(&Canned, &[Source::Pacman], &query);
    assert_eq!(report.total_hits(), 1);
}

#[test]
fn hit_formatting_includes_annotation() {
    let hit = PackageSearchResult {
        name: "vim".to_string(),
        version: Some("9.1".to_string()),
        description: None,
        backend: Source::Pacman,
        annotation: Some("extra [installed]".to_string()),
    };
    assert_eq!(format_hit(&hit), "vim 9.1 (extra [installed])");
}
