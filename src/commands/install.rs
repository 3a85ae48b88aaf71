//! Installation orchestrator
//!
//! Resolving -> Confirming -> Executing -> Recording -> Done, with Aborted
//! reachable from Resolving (no usable source) and Confirming (declined).
//! Failed and NotFound outcomes end in Done without touching the store.

use crate::commands::build;
use crate::config::settings::Settings;
use crate::core::resolver::{self, Resolution};
use crate::core::types::{Action, Outcome, Source};
use crate::error::{MeowError, Result};
use crate::state::types::{InstallRecord, RecordPatch};
use crate::traits::AppContext;
use crate::ui as output;
use crate::utils::action_log;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Resolving,
    Confirming,
    Executing,
    Recording,
    Done,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Resolved,
    Unresolved,
    Declined,
    Accepted,
    Succeeded,
    Failed,
    Recorded,
}

impl Phase {
    /// Transition table. Steps that do not apply leave the phase unchanged.
    pub fn next(self, step: Step) -> Phase {
        match (self, step) {
            (Phase::Resolving, Step::Resolved) => Phase::Confirming,
            (Phase::Resolving, Step::Unresolved) => Phase::Aborted,
            (Phase::Confirming, Step::Accepted) => Phase::Executing,
            (Phase::Confirming, Step::Declined) => Phase::Aborted,
            // Target could not be resolved; nothing was asked or run.
            (Phase::Confirming, Step::Failed) => Phase::Done,
            (Phase::Executing, Step::Succeeded) => Phase::Recording,
            (Phase::Executing, Step::Failed) => Phase::Done,
            (Phase::Recording, Step::Recorded) => Phase::Done,
            (phase, _) => phase,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Aborted)
    }
}

/// Everything that happened during one install/update.
#[derive(Debug, Clone)]
pub struct OperationReport {
    pub package: String,
    pub action: Action,
    pub resolution: Option<Resolution>,
    pub source: Option<Source>,
    /// Raw answer when the operator was asked for a source.
    pub prompt_answer: Option<String>,
    pub outcome: Option<Outcome>,
    pub trail: Vec<Phase>,
    pub record_written: bool,
    pub store_warning: Option<String>,
}

impl OperationReport {
    fn new(package: &str, action: Action) -> Self {
        Self {
            package: package.to_string(),
            action,
            resolution: None,
            source: None,
            prompt_answer: None,
            outcome: None,
            trail: vec![Phase::Resolving],
            record_written: false,
            store_warning: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.trail.last().copied().unwrap_or(Phase::Resolving)
    }

    fn advance(&mut self, step: Step) {
        let next = self.phase().next(step);
        if next != self.phase() {
            self.trail.push(next);
        }
    }
}

/// Run one install or update through the full state machine.
///
/// `Err` is reserved for an unknown explicit source and for backend errors
/// the operator must see (unreachable registry, invalid name).
pub fn run_operation(
    ctx: &AppContext,
    action: Action,
    name: &str,
    explicit: Option<&str>,
) -> Result<OperationReport> {
    let mut report = OperationReport::new(name, action);

    let resolution = resolver::resolve(name, explicit, ctx.store.as_ref())?;
    report.resolution = Some(resolution);

    let source = match resolution {
        Resolution::Explicit(source) => source,
        Resolution::Recorded(source) => {
            output::verbose(&format!(
                "Using recorded source {} for '{}'",
                source.display_name(),
                name
            ));
            source
        }
        Resolution::RequiresPrompt => {
            let answer = ctx.prompt.choose_source(name);
            report.prompt_answer = answer.clone();
            match resolver::resolve_prompt_answer(answer.as_deref()) {
                Some(source) => source,
                None => {
                    report.advance(Step::Unresolved);
                    return Ok(report);
                }
            }
        }
    };
    report.source = Some(source);
    report.advance(Step::Resolved);

    let backend = ctx.backends.backend(source)?;
    let outcome = match action {
        Action::Install => backend.install(name, ctx.confirm.as_ref())?,
        Action::Update => backend.update(name, ctx.confirm.as_ref())?,
    };

    match &outcome {
        Outcome::Success {
            version,
            external_id,
        } => {
            report.advance(Step::Accepted);
            report.advance(Step::Succeeded);
            match record(ctx, action, name, source, version, external_id.clone()) {
                Ok(()) => report.record_written = true,
                Err(e) => report.store_warning = Some(e.to_string()),
            }
            report.advance(Step::Recorded);
        }
        Outcome::Failed { .. } => {
            report.advance(Step::Accepted);
            report.advance(Step::Failed);
        }
        Outcome::Cancelled => report.advance(Step::Declined),
        Outcome::NotFound => report.advance(Step::Failed),
    }

    report.outcome = Some(outcome);
    Ok(report)
}

/// Install replaces the record. Update merges into it and falls back to a
/// fresh record when none exists yet.
fn record(
    ctx: &AppContext,
    action: Action,
    name: &str,
    source: Source,
    version: &str,
    external_id: Option<String>,
) -> Result<()> {
    match action {
        Action::Install => ctx
            .store
            .upsert(InstallRecord::new(name, version, source).with_external_id(external_id)),
        Action::Update => {
            let patch = RecordPatch {
                version: Some(version.to_string()),
                source: Some(source),
                external_id: external_id.clone(),
                deleted: Some(false),
            };
            if ctx.store.merge(name, patch)? {
                Ok(())
            } else {
                ctx.store
                    .upsert(InstallRecord::new(name, version, source).with_external_id(external_id))
            }
        }
    }
}

/// CLI entry for `install` and `update`.
pub fn run(
    ctx: &AppContext,
    settings: &Settings,
    action: Action,
    name: &str,
    explicit: Option<&str>,
) -> Result<()> {
    let report = run_operation(ctx, action, name, explicit)?;

    if report.phase() == Phase::Aborted && report.source.is_none() {
        return Err(MeowError::UnknownSource(
            report.prompt_answer.unwrap_or_default(),
        ));
    }

    let source = report.source.unwrap_or(Source::Registry);
    match report.outcome.as_ref() {
        Some(Outcome::Success { version, .. }) => {
            output::success(&format!(
                "{} {} {} via {}",
                capitalize(action.past_tense()),
                name,
                version,
                source.display_name()
            ));
            if let Some(warning) = &report.store_warning {
                output::warning(&format!("Could not update install records: {}", warning));
            }
            action_log::log_action(&format!(
                "{} {} ({}) from {}",
                capitalize(action.past_tense()),
                name,
                version,
                source.token()
            ));

            if source == Source::Registry {
                offer_build(ctx, settings, name)?;
            }
            Ok(())
        }
        Some(Outcome::Cancelled) => {
            output::info(&format!("{} of {} cancelled", capitalize(&action.to_string()), name));
            Ok(())
        }
        Some(Outcome::Failed { diagnostic }) => {
            action_log::log_action(&format!("Failed to {} {} from {}", action, name, source.token()));
            Err(MeowError::BackendFailure {
                backend: source.display_name().to_string(),
                diagnostic: diagnostic.clone(),
            })
        }
        Some(Outcome::NotFound) | None => Err(MeowError::NotFound(format!(
            "{} ({})",
            name,
            source.display_name()
        ))),
    }
}

/// After a registry install, offer to install declared dependencies.
fn offer_build(ctx: &AppContext, settings: &Settings, name: &str) -> Result<()> {
    let backend = ctx.backends.backend(Source::Registry)?;
    let Some(dir) = backend.checkout_dir(name) else {
        return Ok(());
    };
    let Some(requirements) = build::find_requirements(&dir) else {
        return Ok(());
    };

    let question = format!(
        "{} declares dependencies in {}. Install them now?",
        name,
        requirements.display()
    );
    if !ctx.confirm.confirm(&question) {
        return Ok(());
    }

    let installer = build::SystemInstaller::new(&settings.aur_helper(), &dir);
    let summary = build::build_dir(&dir, &installer)?;
    build::report(&summary);
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
