//! Tolerant JSON recovery from free-form model output.
//!
//! Models asked for "JSON only" still wrap answers in prose or markdown
//! fences. Recovery is two-step: parse the whole text, else parse the span
//! from the first `{` to the last `}`. Braces are not balanced, so text with
//! several JSON fragments (or a stray `}` in trailing prose) yields a span
//! that fails to parse. Pure functions, no I/O.

use serde::de::DeserializeOwned;
use serde_json::Value;

const RAW_PREVIEW_CHARS: usize = 200;

/// The text did not contain a recoverable JSON value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not parse JSON from model output: {reason} (raw: {:?})", self.preview())]
pub struct MalformedModelOutput {
    /// Original model text, untouched
    pub raw: String,
    pub reason: String,
}

impl MalformedModelOutput {
    fn new(raw: &str, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    /// First characters of the raw text, for log lines and error messages.
    pub fn preview(&self) -> String {
        self.raw.chars().take(RAW_PREVIEW_CHARS).collect()
    }
}

/// Greedy first-`{`-to-last-`}` span, if one exists.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Recover a JSON value from model output.
pub fn extract_json(text: &str) -> Result<Value, MalformedModelOutput> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    let span = brace_span(text)
        .ok_or_else(|| MalformedModelOutput::new(text, "no JSON structure found"))?;

    serde_json::from_str::<Value>(span)
        .map_err(|e| MalformedModelOutput::new(text, format!("invalid JSON span: {e}")))
}

/// Recover a JSON value and deserialize it into `T`.
pub fn extract_json_as<T: DeserializeOwned>(text: &str) -> Result<T, MalformedModelOutput> {
    let value = extract_json(text)?;
    serde_json::from_value(value)
        .map_err(|e| MalformedModelOutput::new(text, format!("unexpected shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn parses_bare_object() {
        assert_eq!(extract_json(r#"{"a":1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn parses_object_surrounded_by_prose() {
        assert_eq!(
            extract_json(r#"noise {"a":1} trailing"#).unwrap(),
            json!({"a": 1})
        );
    }

    #[test]
    fn rejects_plain_text() {
        let err = extract_json("not json at all").unwrap_err();
        assert_eq!(err.raw, "not json at all");
        assert_eq!(err.reason, "no JSON structure found");
    }

    #[test]
    fn parses_markdown_fenced_object() {
        let text = "Here you go:\n```json\n{\"isSpam\": false, \"reason\": \"genuine\"}\n```";
        assert_eq!(
            extract_json(text).unwrap(),
            json!({"isSpam": false, "reason": "genuine"})
        );
    }

    #[test]
    fn parses_nested_object_when_span_is_clean() {
        let text = r#"Result: {"outer": {"inner": [1, 2]}, "ok": true}"#;
        assert_eq!(
            extract_json(text).unwrap(),
            json!({"outer": {"inner": [1, 2]}, "ok": true})
        );
    }

    #[test]
    fn multiple_fragments_produce_unparseable_span() {
        let err = extract_json(r#"{"a":1} and also {"b":2}"#).unwrap_err();
        assert!(err.reason.starts_with("invalid JSON span"));
    }

    #[test]
    fn stray_brace_in_trailing_prose_breaks_span() {
        let err = extract_json(r#"{"a":1} (see note})"#).unwrap_err();
        assert!(err.reason.starts_with("invalid JSON span"));
    }

    #[test]
    fn closing_before_opening_is_not_a_span() {
        let err = extract_json("} backwards {").unwrap_err();
        assert_eq!(err.reason, "no JSON structure found");
    }

    #[test]
    fn unterminated_object_fails() {
        assert!(extract_json(r#"{"a": 1"#).is_err());
        assert!(extract_json("").is_err());
    }

    #[test]
    fn whole_text_scalars_parse_directly() {
        assert_eq!(extract_json("42").unwrap(), json!(42));
        assert_eq!(extract_json(r#""Positive""#).unwrap(), json!("Positive"));
    }

    #[test]
    fn multibyte_text_around_span() {
        assert_eq!(
            extract_json("résumé → {\"emoji\": \"🎉\"} ✓").unwrap(),
            json!({"emoji": "🎉"})
        );
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        #[serde(rename = "isSpam")]
        is_spam: bool,
    }

    #[test]
    fn typed_extraction() {
        let verdict: Verdict = extract_json_as("Sure! {\"isSpam\": true}").unwrap();
        assert_eq!(verdict, Verdict { is_spam: true });
    }

    #[test]
    fn typed_extraction_reports_wrong_shape() {
        let err = extract_json_as::<Verdict>(r#"{"isSpam": "maybe"}"#).unwrap_err();
        assert!(err.reason.starts_with("unexpected shape"));
        assert_eq!(err.raw, r#"{"isSpam": "maybe"}"#);
    }

    #[test]
    fn preview_is_bounded() {
        let long = "x".repeat(1_000);
        let err = extract_json(&long).unwrap_err();
        assert_eq!(err.preview().len(), RAW_PREVIEW_CHARS);
        assert_eq!(err.raw.len(), 1_000);
    }

    #[test]
    fn error_message_names_reason_and_raw_text() {
        let err = extract_json("no braces here").unwrap_err();

        assert_eq!(
            err.to_string(),
            r#"could not parse JSON from model output: no JSON structure found (raw: "no braces here")"#
        );
        let as_error: &dyn std::error::Error = &err;
        assert!(as_error.source().is_none());
    }
}
