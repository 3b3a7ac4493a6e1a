//! JSON extraction from free-form model replies.

use serde::de::DeserializeOwned;

const FENCE: &str = "```";

/// Strips a surrounding Markdown code fence, if any, and trims whitespace.
///
/// An optional language tag on the opening fence is discarded.
#[must_use]
pub fn unwrap_fenced(text: &str) -> &str {
    let trimmed = text.trim();
    let Some((_, after_open)) = trimmed.split_once(FENCE) else {
        return trimmed;
    };
    let body = match after_open.split_once('\n') {
        Some((tag, rest)) if !looks_like_json(tag) => rest,
        _ => after_open,
    };
    body.split_once(FENCE)
        .map_or(body, |(inner, _)| inner)
        .trim()
}

fn looks_like_json(line: &str) -> bool {
    line.contains('{') || line.contains('[')
}

fn region(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}

/// Parses `T` from a model reply that may wrap JSON in prose or fences.
///
/// Tries the unwrapped text first, then the outermost object region, then
/// the outermost array region.
///
/// # Errors
///
/// Returns the error from parsing the unwrapped text when no candidate
/// parses.
pub fn parse_json_payload<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    let unwrapped = unwrap_fenced(text);
    let first_error = match serde_json::from_str(unwrapped) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };
    let candidates = [region(unwrapped, '{', '}'), region(unwrapped, '[', ']')];
    for candidate in candidates.into_iter().flatten() {
        if let Ok(value) = serde_json::from_str(candidate) {
            return Ok(value);
        }
    }
    Err(first_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case("```json\n{\"a\": 1}\n```", "{\"a\": 1}")]
    #[case("```\n[1, 2]\n```", "[1, 2]")]
    #[case("  {\"a\": 1}  ", "{\"a\": 1}")]
    #[case("```{\"a\": 1}\n```", "{\"a\": 1}")]
    fn strips_fences(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(unwrap_fenced(raw), expected);
    }

    #[rstest]
    fn finds_object_inside_prose() {
        let parsed: Value =
            parse_json_payload("Here you go: {\"intent\": \"plan\"} hope that helps")
                .expect("object region parses");

        assert_eq!(parsed, json!({ "intent": "plan" }));
    }

    #[rstest]
    fn reports_failure_when_nothing_parses() {
        let parsed: Result<Value, _> = parse_json_payload("no json here");

        assert!(parsed.is_err());
    }
}
