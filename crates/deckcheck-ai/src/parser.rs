//! Model output parsing and reason normalization

use serde_json::Value;

/// Longest reason kept verbatim, in characters
pub const MAX_REASON_CHARS: usize = 120;

/// Reasons kept per verdict
pub const MAX_REASONS: usize = 3;

/// Verdict as the model stated it, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawVerdict {
    pub pass: bool,
    pub reasons: Vec<Value>,
}

/// First balanced JSON object in `content`.
///
/// Models wrap JSON in prose or code fences; the first `{` that starts a
/// valid value wins.
pub fn extract_first_json_object(content: &str) -> Option<Value> {
    for (idx, ch) in content.char_indices() {
        if ch != '{' {
            continue;
        }
        let mut stream = serde_json::Deserializer::from_str(&content[idx..]).into_iter::<Value>();
        if let Some(Ok(value)) = stream.next() {
            if value.is_object() {
                return Some(value);
            }
        }
    }
    None
}

/// Parse a `{pass, reasons}` verdict, or `None` for unstructured output
pub fn parse_verdict(content: &str) -> Option<RawVerdict> {
    let value = extract_first_json_object(content.trim())?;
    let pass = truthy(value.get("pass").unwrap_or(&Value::Null));
    let reasons = match value.get("reasons") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    Some(RawVerdict { pass, reasons })
}

/// Loose truthiness: models sometimes answer "true" or 1 instead of true
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

/// Starts with an emoji-style marker (misc symbols, dingbats, pictographs)
fn has_marker(reason: &str) -> bool {
    reason.chars().next().is_some_and(|c| {
        matches!(c as u32, 0x2600..=0x27BF | 0x2B00..=0x2BFF | 0x1F300..=0x1FAFF)
    })
}

fn truncate_reason(reason: &str) -> String {
    if reason.chars().count() > MAX_REASON_CHARS {
        let kept: String = reason.chars().take(MAX_REASON_CHARS - 3).collect();
        format!("{}...", kept)
    } else {
        reason.to_string()
    }
}

/// Keep string reasons only: trimmed, length-capped, marked, at most
/// [`MAX_REASONS`]. An empty result gets one synthesized reason.
pub fn normalize_reasons(pass: bool, reasons: &[Value]) -> Vec<String> {
    let prefix = if pass { "✅ " } else { "⚠️ " };

    let mut normalized: Vec<String> = reasons
        .iter()
        .filter_map(Value::as_str)
        .map(|r| truncate_reason(r.trim()))
        .map(|r| if has_marker(&r) { r } else { format!("{}{}", prefix, r) })
        .take(MAX_REASONS)
        .collect();

    if normalized.is_empty() {
        normalized.push(if pass { "✅ Validation passed" } else { "⚠️ Validation failed" }.to_string());
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_from_prose_and_fences() {
        let text = "Sure! Here you go:\n```json\n{\"pass\": false, \"reasons\": [\"too dense\"]}\n```\nThanks";
        let value = extract_first_json_object(text).unwrap();
        assert_eq!(value["pass"], false);
    }

    #[test]
    fn test_extract_skips_invalid_braces() {
        let text = "{not json} then {\"pass\": true}";
        assert_eq!(extract_first_json_object(text).unwrap(), json!({"pass": true}));
    }

    #[test]
    fn test_unstructured_output() {
        assert!(parse_verdict("I think the deck looks fine.").is_none());
        assert!(parse_verdict("").is_none());
    }

    #[test]
    fn test_parse_verdict_loose_pass() {
        let verdict = parse_verdict(r#"{"pass": "true", "reasons": "not a list"}"#).unwrap();
        assert!(verdict.pass);
        assert!(verdict.reasons.is_empty());

        let verdict = parse_verdict(r#"{"reasons": ["x"]}"#).unwrap();
        assert!(!verdict.pass);
    }

    #[test]
    fn test_normalize_prefix_and_filter() {
        let reasons = vec![json!("  Clear title slide "), json!(42), json!("✅ Already marked")];
        let normalized = normalize_reasons(true, &reasons);

        assert_eq!(normalized, vec!["✅ Clear title slide", "✅ Already marked"]);
    }

    #[test]
    fn test_normalize_caps_length_and_count() {
        let long = "x".repeat(200);
        let reasons = vec![json!(long), json!("b"), json!("c"), json!("d")];
        let normalized = normalize_reasons(false, &reasons);

        assert_eq!(normalized.len(), MAX_REASONS);
        assert_eq!(normalized[0], format!("⚠️ {}...", "x".repeat(117)));
        assert_eq!(normalized[1], "⚠️ b");
    }

    #[test]
    fn test_normalize_defaults() {
        assert_eq!(normalize_reasons(true, &[]), vec!["✅ Validation passed"]);
        assert_eq!(normalize_reasons(false, &[json!(null)]), vec!["⚠️ Validation failed"]);
    }
}
