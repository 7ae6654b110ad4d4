//! Structured-Extraction Layer: recovers one JSON object from free-form model text.
//!
//! Span rule: first `{` through last `}`. With no such span the whole text is
//! decoded as-is. Required fields are never defaulted; a missing one is an error.

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::Stage;

#[derive(Debug, Error)]
#[error("{stage} output could not be decoded: {reason}")]
pub struct ExtractionError {
    pub stage: Stage,
    pub reason: String,
}

/// The candidate JSON span of `raw`: from the first `{` to the last `}`
/// inclusive, or the whole trimmed text when no such pair exists.
pub fn json_span(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => &raw[start..=end],
        _ => raw.trim(),
    }
}

/// Decodes the model's reply for `stage` into `T`.
pub fn extract<T: DeserializeOwned>(raw: &str, stage: Stage) -> Result<T, ExtractionError> {
    let span = json_span(raw);
    serde_json::from_str::<T>(span).map_err(|e| ExtractionError {
        stage,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        name: String,
        tags: Vec<String>,
    }

    #[test]
    fn test_extract_tolerates_surrounding_noise() {
        let raw = r#"Sure! Here is the result: {"name": "x", "tags": ["a"]} Let me know."#;
        let probe: Probe = extract(raw, Stage::RequirementsExtraction).unwrap();
        assert_eq!(probe.name, "x");
        assert_eq!(probe.tags, vec!["a"]);
    }

    #[test]
    fn test_extract_tolerates_markdown_fences() {
        let raw = "```json\n{\"name\": \"x\", \"tags\": []}\n```";
        let probe: Probe = extract(raw, Stage::GapAnalysis).unwrap();
        assert_eq!(probe.name, "x");
    }

    #[test]
    fn test_extract_spans_nested_objects() {
        #[derive(Deserialize)]
        struct Outer {
            inner: Probe,
        }
        let raw = r#"note {"inner": {"name": "n", "tags": []}} trailing } brace"#;
        // Last `}` is in the trailing commentary, so the span is not valid JSON.
        assert!(extract::<Outer>(raw, Stage::ResumeRewrite).is_err());

        let raw = r#"note {"inner": {"name": "n", "tags": []}} done"#;
        let outer: Outer = extract(raw, Stage::ResumeRewrite).unwrap();
        assert_eq!(outer.inner.name, "n");
    }

    #[test]
    fn test_without_braces_whole_text_is_decoded() {
        // No braces at all: the full text is tried as JSON.
        let tags: Vec<String> = extract(r#" ["a", "b"] "#, Stage::GapAnalysis).unwrap();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_reversed_braces_fall_back_to_whole_text() {
        assert_eq!(json_span("} nothing {"), "} nothing {");
        let err = extract::<Probe>("} nothing {", Stage::GapAnalysis).unwrap_err();
        assert_eq!(err.stage, Stage::GapAnalysis);
    }

    #[test]
    fn test_missing_required_field_fails_with_stage() {
        let err = extract::<Probe>(r#"{"name": "x"}"#, Stage::ResumeRewrite).unwrap_err();
        assert_eq!(err.stage, Stage::ResumeRewrite);
        assert!(err.reason.contains("tags"));
        assert!(err.to_string().starts_with("resume_rewrite"));
    }

    #[test]
    fn test_plain_prose_fails() {
        let err = extract::<Probe>("I cannot help with that.", Stage::RequirementsExtraction)
            .unwrap_err();
        assert_eq!(err.stage, Stage::RequirementsExtraction);
    }
}
