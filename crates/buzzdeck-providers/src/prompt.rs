//! Prompt templates shared by the chat-style providers.

use buzzdeck_core::traits::{GenerateRequest, SourceType};

/// Sampling temperature for answer judging. Kept low so verdicts stay
/// stable across retries of the same answer.
pub const JUDGE_TEMPERATURE: f64 = 0.1;

/// Build the question-generation prompt for a request.
pub fn generation_prompt(request: &GenerateRequest) -> String {
    match request.source_type {
        SourceType::Text => format!(
            "Based on the following study material, generate 10-15 question and answer pairs \
             suitable for a quiz. Questions should test understanding of the key facts and \
             concepts. Respond ONLY with a JSON array where each element is an object with \
             \"question\" and \"answer\" string fields. Do not include any other text.\n\n\
             Study material:\n{}",
            request.source
        ),
        SourceType::Topic => format!(
            "Generate 10-15 question and answer pairs about the topic \"{}\" suitable for a \
             quiz. Questions should range from fundamental to moderately challenging. Respond \
             ONLY with a JSON array where each element is an object with \"question\" and \
             \"answer\" string fields. Do not include any other text.",
            request.source
        ),
    }
}

/// Build the answer-judging prompt. The provider trusts only a bare
/// `true` verdict (after trim and lowercase); everything else is false.
pub fn judge_prompt(user_answer: &str, correct_answer: &str) -> String {
    format!(
        "You are grading a quiz answer. The correct answer is: \"{correct_answer}\". \
         The user answered: \"{user_answer}\". Is the user's answer correct or semantically \
         equivalent to the correct answer? Respond with only the word true or false."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_embed_the_source() {
        let request = GenerateRequest {
            source: "photosynthesis".into(),
            source_type: SourceType::Topic,
            model: "m".into(),
            temperature: 0.7,
        };
        let prompt = generation_prompt(&request);
        assert!(prompt.contains("photosynthesis"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn judge_prompt_embeds_both_answers() {
        let prompt = judge_prompt("mito", "mitochondria");
        assert!(prompt.contains("\"mito\""));
        assert!(prompt.contains("\"mitochondria\""));
    }
}
