// Sanitize request text before it is embedded in the generative prompt.
// Removes invisible Unicode, role markers and instruction overrides,
// normalises whitespace, truncates, and escapes the quote the prompt uses.

/// Maximum request length embedded in the prompt (characters).
const MAX_REQUEST_LENGTH: usize = 2_000;

/// Sanitize request text for prompt embedding. Logs the number of removed
/// lines when injection patterns are found (never the text itself).
pub fn sanitize_request_text(raw: &str, request_id: Option<&str>) -> String {
    let cleaned = remove_invisible_chars(raw);
    let (no_injection, removed_count) = remove_injection_lines(&cleaned);

    if removed_count > 0 {
        let id = request_id.unwrap_or("unknown");
        tracing::warn!(
            request_id = %id,
            removed_lines = removed_count,
            "Injection patterns detected and removed from chart request"
        );
    }

    let normalized = normalize_whitespace(&no_injection);
    let truncated = truncate_chars(&normalized, MAX_REQUEST_LENGTH);
    truncated.replace('"', "\\\"")
}

/// Remove zero-width, bidi-override and control characters.
/// Keeps space, newline, tab and carriage return.
fn remove_invisible_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            if matches!(*c, ' ' | '\n' | '\t' | '\r') {
                return true;
            }
            if matches!(
                *c,
                '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
            ) {
                return false;
            }
            !c.is_control()
        })
        .collect()
}

fn is_role_marker(trimmed: &str) -> bool {
    const MARKERS: [&str; 9] = [
        "system:",
        "assistant:",
        "user:",
        "[system]",
        "[assistant]",
        "[inst]",
        "[/inst]",
        "<<sys>>",
        "instructions:",
    ];
    MARKERS.iter().any(|m| trimmed.starts_with(m))
}

fn is_override_attempt(text: &str) -> bool {
    const OVERRIDES: [&str; 8] = [
        "ignore previous instructions",
        "ignore all instructions",
        "ignore the above instructions",
        "disregard your instructions",
        "disregard all instructions",
        "forget your instructions",
        "new instructions:",
        "override:",
    ];
    OVERRIDES.iter().any(|p| text.contains(p))
}

/// Drop lines that look like prompt injection. Returns (text, removed_count).
fn remove_injection_lines(text: &str) -> (String, usize) {
    let mut kept = Vec::new();
    let mut removed = 0usize;

    for line in text.lines() {
        let lower = line.trim().to_lowercase();
        if is_role_marker(&lower) || is_override_attempt(&lower) {
            removed += 1;
        } else {
            kept.push(line);
        }
    }

    (kept.join("\n"), removed)
}

/// Collapse runs of whitespace to single spaces.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}…", &text[..byte_idx]),
        None => text.to_string(),
    }
}
