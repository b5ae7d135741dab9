use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::literal::parse_literal;
use super::ResolutionError;

/// A fenced block, optionally tagged with a format hint. Only the inner text is captured.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```[ \t]*(?:javascript|typescript|jsonc|json5|json|js|ts)?[ \t]*\r?\n?(.*?)```")
        .unwrap()
});

/// Best-effort extraction of one structured value from free-form text.
/// Returns `None` when nothing usable is found; never errors.
pub fn parse_lenient(text: &str) -> Option<Value> {
    match parse_response_text(text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, text_len = text.len(), "Lenient parse found no value");
            None
        }
    }
}

/// Same as [`parse_lenient`] but keeps the reason for failure.
///
/// 1. If the text contains a fenced block, only its content is used.
/// 2. Strict JSON is tried first, then the tolerant literal parser.
/// 3. Failing both, the span from the first `{` to the last `}` gets one more try.
pub fn parse_response_text(text: &str) -> Result<Value, ResolutionError> {
    let candidate = extract_fenced_block(text).unwrap_or(text).trim();
    if candidate.is_empty() {
        return Err(ResolutionError::Parse("response text is empty".into()));
    }

    let first_error = match parse_strict_then_literal(candidate) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(slice) = brace_slice(candidate).filter(|s| s.len() < candidate.len()) {
        if let Ok(value) = parse_strict_then_literal(slice) {
            tracing::debug!("Recovered object from surrounding prose");
            return Ok(value);
        }
    }

    Err(first_error)
}

/// Inner content of the first fenced block, if any.
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn parse_strict_then_literal(text: &str) -> Result<Value, ResolutionError> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(strict_err) => parse_literal(text).map_err(|literal_err| {
            ResolutionError::Parse(format!(
                "not JSON ({strict_err}) and not a data literal ({literal_err})"
            ))
        }),
    }
}

fn brace_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
