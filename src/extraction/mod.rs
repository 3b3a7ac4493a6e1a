//! Defensive parsers for structured data embedded in model output.
//!
//! Nothing here raises on malformed input except [`parse_json_payload`],
//! whose callers decide whether a parse failure is fatal. The field
//! deserializers accept whatever shape a model chose for a field.

mod json;
mod lenient;
mod suggestions;

pub use json::{parse_json_payload, unwrap_fenced};
pub use lenient::{optional_text, string_list};
pub use suggestions::{
    SUGGESTIONS_CLOSE, SUGGESTIONS_OPEN, SuggestionExtraction, extract_suggestions,
};
