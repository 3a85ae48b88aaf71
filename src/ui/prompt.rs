//! Terminal-backed implementations of the operator interaction traits.

use crate::core::types::Source;
use crate::traits::{Confirm, SourcePrompt};

/// Reads yes/no answers from stdin. With `assume_yes` every question is
/// answered affirmatively without touching the terminal.
pub struct StdinConfirm {
    pub assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            super::verbose(&format!("{} (assumed yes)", question));
            return true;
        }
        super::prompt_yes_no(question)
    }
}

/// Asks the operator which backend should provide a package.
pub struct StdinSourcePrompt;

impl SourcePrompt for StdinSourcePrompt {
    fn choose_source(&self, package: &str) -> Option<String> {
        let menu = Source::MENU
            .iter()
            .enumerate()
            .map(|(i, source)| format!("{}:{}", source.menu_label(), i + 1))
            .collect::<Vec<_>>()
            .join(" ");
        super::prompt_line(&format!(
            "Which source do you want to use for '{}'?\n  {}\n ",
            package, menu
        ))
    }
}
