//! Quick-reply suggestions embedded in assistant text.
//!
//! The model is asked to close its reply with a block such as
//!
//! ```text
//! <suggestions>[{"label": "Plan", "text": "Plan the next sprint"}]</suggestions>
//! ```
//!
//! Extraction removes the block and turns each entry into a
//! [`SuggestedAction`]. A malformed block is left in place and yields no
//! actions.

use super::unwrap_fenced;
use crate::conversation::domain::SuggestedAction;
use serde::Deserialize;
use tracing::debug;

/// Opening delimiter of the suggestions block.
pub const SUGGESTIONS_OPEN: &str = "<suggestions>";
/// Closing delimiter of the suggestions block.
pub const SUGGESTIONS_CLOSE: &str = "</suggestions>";

/// Text with its suggestions block removed, plus the parsed actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionExtraction {
    /// User-visible content.
    pub content: String,
    /// Parsed suggestions, in block order.
    pub actions: Vec<SuggestedAction>,
}

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    #[serde(default)]
    label: Option<String>,
    text: String,
}

/// Splits a suggestions block out of `text`.
///
/// Never fails: text without a well-formed block comes back unchanged with
/// no actions, so running this on its own output is a no-op.
#[must_use]
pub fn extract_suggestions(text: &str) -> SuggestionExtraction {
    let unchanged = || SuggestionExtraction {
        content: text.to_owned(),
        actions: Vec::new(),
    };
    let Some((before, rest)) = text.split_once(SUGGESTIONS_OPEN) else {
        return unchanged();
    };
    let Some((payload, after)) = rest.split_once(SUGGESTIONS_CLOSE) else {
        return unchanged();
    };
    let raw: Vec<RawSuggestion> = match serde_json::from_str(unwrap_fenced(payload)) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!(error = %err, "ignoring malformed suggestions block");
            return unchanged();
        }
    };

    let actions = raw
        .into_iter()
        .filter(|entry| !entry.text.trim().is_empty())
        .map(|entry| {
            let label = entry
                .label
                .filter(|label| !label.trim().is_empty())
                .unwrap_or_else(|| entry.text.clone());
            SuggestedAction::chat(label, entry.text)
        })
        .collect();

    SuggestionExtraction {
        content: format!("{before}{after}").trim().to_owned(),
        actions,
    }
}
