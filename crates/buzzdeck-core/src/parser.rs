//! Extraction of question/answer pairs from raw model output.
//!
//! Models routinely wrap their JSON in commentary or code fences; this
//! module strips the wrapping, slices out the first well-formed array, and
//! validates its shape. Any failure yields an empty vec — the caller
//! treats that as "generation failed", never as "zero questions exist".

use serde_json::Value;

use crate::model::QaPair;

/// Extract a JSON array of `{question, answer}` objects from raw model
/// output.
///
/// Handles:
/// - ```` ```json ```` / ```` ``` ```` fences around the payload
/// - commentary before or after the array
/// - missing brackets, malformed JSON, or wrongly shaped items (empty vec)
pub fn extract_question_pairs(raw: &str) -> Vec<QaPair> {
    let stripped = strip_code_fences(raw);

    let Some(start) = stripped.find('[') else {
        tracing::warn!("no JSON array found in model output");
        return Vec::new();
    };
    let Some(end) = stripped.rfind(']') else {
        tracing::warn!("no JSON array found in model output");
        return Vec::new();
    };
    if end <= start {
        return Vec::new();
    }

    let slice = &stripped[start..=end];
    let parsed: Value = match serde_json::from_str(slice) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("failed to parse extracted JSON: {e}");
            return Vec::new();
        }
    };

    let Value::Array(items) = parsed else {
        return Vec::new();
    };

    let mut pairs = Vec::with_capacity(items.len());
    for item in &items {
        let (Some(question), Some(answer)) = (
            item.get("question").and_then(Value::as_str),
            item.get("answer").and_then(Value::as_str),
        ) else {
            tracing::warn!("model output item is not a {{question, answer}} object");
            return Vec::new();
        };

        let mut pair = QaPair::new(question, answer);
        pair.options = item.get("options").and_then(Value::as_array).map(|opts| {
            opts.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        });
        pair.correct_option = item
            .get("correct_option")
            .and_then(Value::as_u64)
            .map(|i| i as usize);
        pairs.push(pair);
    }

    pairs
}

fn strip_code_fences(raw: &str) -> String {
    let mut out = raw.trim().to_string();
    for fence in ["```json", "```JSON", "```"] {
        out = out.replace(fence, "");
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_array() {
        let raw = r#"[{"question": "Q1", "answer": "A1"}, {"question": "Q2", "answer": "A2"}]"#;
        let pairs = extract_question_pairs(raw);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].question, "Q1");
        assert_eq!(pairs[1].answer, "A2");
    }

    #[test]
    fn extracts_fenced_array() {
        let raw = "Here are your questions:\n```json\n[{\"question\": \"What is the capital of France?\", \"answer\": \"Paris\"}]\n```\nEnjoy!";
        let pairs = extract_question_pairs(raw);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].answer, "Paris");
    }

    #[test]
    fn extracts_array_wrapped_in_commentary() {
        let raw = "Sure! [{\"question\": \"Q\", \"answer\": \"A\"}] Let me know if you need more.";
        let pairs = extract_question_pairs(raw);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn no_brackets_yields_empty() {
        assert!(extract_question_pairs("I could not generate questions.").is_empty());
        assert!(extract_question_pairs("").is_empty());
    }

    #[test]
    fn malformed_json_yields_empty() {
        assert!(extract_question_pairs("[{\"question\": \"Q\", ").is_empty());
        assert!(extract_question_pairs("[{\"question\": \"Q\"}]").is_empty());
    }

    #[test]
    fn non_object_items_yield_empty() {
        assert!(extract_question_pairs("[1, 2, 3]").is_empty());
    }

    #[test]
    fn carries_multiple_choice_fields() {
        let raw = r#"[{"question": "Q", "answer": "B", "options": ["A", "B"], "correct_option": 1}]"#;
        let pairs = extract_question_pairs(raw);
        assert_eq!(pairs[0].options.as_deref(), Some(["A".to_string(), "B".to_string()].as_slice()));
        assert_eq!(pairs[0].correct_option, Some(1));
    }
}
