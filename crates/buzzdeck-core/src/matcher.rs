//! Local answer matching.
//!
//! Two deterministic comparators: a normalized exact match used as the
//! fallback when the remote judge fails, and a fuzzy matcher (substring
//! containment plus word overlap) usable as a grading strategy on its own
//! for sessions without network access.

use async_trait::async_trait;

use crate::traits::SimilarityJudge;

/// Minimum share of the correct answer's words that must appear in the
/// user's answer for the fuzzy matcher to accept it.
pub const OVERLAP_THRESHOLD: f64 = 0.7;

const STRIPPED_PUNCTUATION: &str = ".,/#!$%^&*;:{}=-_`~()";

fn normalize_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if STRIPPED_PUNCTUATION.contains(c) { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Case- and whitespace-insensitive exact comparison.
pub fn exact_match(user_answer: &str, correct_answer: &str) -> bool {
    user_answer.trim().to_lowercase() == correct_answer.trim().to_lowercase()
}

/// Fuzzy comparison: normalized exact match, substring containment in
/// either direction, or at least [`OVERLAP_THRESHOLD`] of the correct
/// answer's words present in the user's answer.
pub fn fuzzy_match(user_answer: &str, correct_answer: &str) -> bool {
    let user_words = normalize_words(user_answer);
    let correct_words = normalize_words(correct_answer);

    if user_words.is_empty() || correct_words.is_empty() {
        return false;
    }

    let user_joined = user_words.join(" ");
    let correct_joined = correct_words.join(" ");

    if user_joined == correct_joined
        || user_joined.contains(&correct_joined)
        || correct_joined.contains(&user_joined)
    {
        return true;
    }

    let matching = correct_words
        .iter()
        .filter(|w| user_words.contains(w))
        .count();
    matching as f64 / correct_words.len() as f64 >= OVERLAP_THRESHOLD
}

/// [`SimilarityJudge`] over [`fuzzy_match`]; never fails, never blocks.
pub struct LocalJudge;

#[async_trait]
impl SimilarityJudge for LocalJudge {
    async fn judge(&self, user_answer: &str, correct_answer: &str) -> anyhow::Result<bool> {
        Ok(fuzzy_match(user_answer, correct_answer))
    }
}
