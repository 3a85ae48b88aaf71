//! Source resolution: decide which backend provides a package.
//!
//! Order: explicit source token, then the install record store, then the
//! operator. The resolver itself never prompts and never guesses.

use crate::core::types::Source;
use crate::error::{MeowError, Result};
use crate::traits::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Given explicitly on the command line.
    Explicit(Source),
    /// Taken from an active install record.
    Recorded(Source),
    /// Nothing known; the caller must ask the operator.
    RequiresPrompt,
}

impl Resolution {
    pub fn source(&self) -> Option<Source> {
        match self {
            Resolution::Explicit(source) | Resolution::Recorded(source) => Some(*source),
            Resolution::RequiresPrompt => None,
        }
    }
}

pub fn resolve(name: &str, explicit: Option<&str>, store: &dyn RecordStore) -> Result<Resolution> {
    if let Some(token) = explicit {
        return Source::from_token(token)
            .map(Resolution::Explicit)
            .ok_or_else(|| MeowError::UnknownSource(token.to_string()));
    }

    match store.get(name) {
        Some(record) if !record.deleted => Ok(Resolution::Recorded(record.source)),
        _ => Ok(Resolution::RequiresPrompt),
    }
}

/// Map the operator's answer to the source prompt. `None` means the answer
/// was unusable and the operation must stop; there is no second prompt.
pub fn resolve_prompt_answer(answer: Option<&str>) -> Option<Source> {
    answer.and_then(Source::from_menu_choice)
}
