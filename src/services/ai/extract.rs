//! Locating the JSON object inside a free-text model reply.
//!
//! Models wrap their answer in markdown fences or surround it with prose, so
//! extraction runs in two stages: a fenced block tagged `json` wins, otherwise
//! the first balanced top-level `{...}` span that parses as a JSON object is
//! used. Spans that don't parse (a stray `{EUR}` in the prose) are skipped.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::PipelineError;

const FENCE: &str = "```";

pub fn extract_json_object(text: &str) -> Option<&str> {
    fenced_json_block(text).or_else(|| first_balanced_object(text))
}

/// Extracts, parses and deserializes the reply into `T`.
pub fn parse_json_reply<T: DeserializeOwned>(raw: &str) -> Result<T, PipelineError> {
    let Some(span) = extract_json_object(raw) else {
        return Err(PipelineError::response_parse("no JSON object found in reply", raw));
    };

    let value: Value = serde_json::from_str(span)
        .map_err(|e| PipelineError::response_parse(format!("malformed JSON: {e}"), raw))?;

    if !value.is_object() {
        return Err(PipelineError::response_parse(
            "reply JSON is not an object",
            raw,
        ));
    }

    T::deserialize(value).map_err(|e| {
        PipelineError::response_parse(format!("reply does not match the expected schema: {e}"), raw)
    })
}

fn fenced_json_block(text: &str) -> Option<&str> {
    let mut rest = text;
    while let Some(open) = rest.find(FENCE) {
        let after_fence = &rest[open + FENCE.len()..];
        let line_end = after_fence.find('\n').unwrap_or(after_fence.len());
        let tag = after_fence[..line_end].trim();

        if tag.eq_ignore_ascii_case("json") {
            let body = &after_fence[line_end..];
            let close = body.find(FENCE)?;
            return Some(body[..close].trim());
        }

        // Skip past this fence's closing marker so its body is never
        // mistaken for an opening tag.
        let close = after_fence[line_end..].find(FENCE)?;
        rest = &after_fence[line_end + close + FENCE.len()..];
    }
    None
}

fn first_balanced_object(text: &str) -> Option<&str> {
    let mut first_span = None;
    let mut from = 0;

    while let Some((start, end)) = balanced_span(text, from) {
        let span = &text[start..=end];
        if serde_json::from_str::<Value>(span).is_ok_and(|v| v.is_object()) {
            return Some(span);
        }
        // Nothing later parses: report the first span so the error reads
        // "malformed JSON" rather than "no JSON object".
        first_span.get_or_insert(span);
        from = end + 1;
    }

    first_span
}

/// Byte range of the next balanced `{...}` at or after `from`, closing brace
/// inclusive. Braces inside JSON strings don't count.
fn balanced_span(text: &str, from: usize) -> Option<(usize, usize)> {
    let start = from + text[from..].find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((start, start + offset));
                }
            }
            _ => {}
        }
    }

    None
}
