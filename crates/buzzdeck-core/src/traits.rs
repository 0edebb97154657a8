//! Trait seams between the engine and its external collaborators.
//!
//! Implemented by the `buzzdeck-providers` crate for real LLM backends and
//! by local stand-ins for tests and offline play.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::QaPair;

/// Decides whether a free-text answer matches the expected answer.
///
/// The engine treats this as a suspending call; implementations must
/// return rather than hang, and the engine degrades to a local exact
/// comparison on error.
#[async_trait]
pub trait SimilarityJudge: Send + Sync {
    async fn judge(&self, user_answer: &str, correct_answer: &str) -> anyhow::Result<bool>;
}

/// Turns notes or a topic into question/answer pairs.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Human-readable backend name (e.g. "openai").
    fn name(&self) -> &str;

    /// Generate 10-15 QA pairs from the request source. An empty vec means
    /// generation failed; callers must not treat it as "zero questions
    /// exist".
    async fn generate_questions(&self, request: &GenerateRequest) -> anyhow::Result<Vec<QaPair>>;
}

/// What the source string of a generation request is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Free text extracted from notes or an uploaded file.
    Text,
    /// A short topic phrase to generate questions about.
    Topic,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Text => write!(f, "text"),
            SourceType::Topic => write!(f, "topic"),
        }
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(SourceType::Text),
            "topic" => Ok(SourceType::Topic),
            other => Err(format!("unknown source type: {other}")),
        }
    }
}

/// Request to generate question pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Free text or topic phrase.
    pub source: String,
    pub source_type: SourceType,
    /// Model identifier (e.g. "llama3-70b-8192").
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_parse_and_display() {
        assert_eq!("text".parse::<SourceType>().unwrap(), SourceType::Text);
        assert_eq!("Topic".parse::<SourceType>().unwrap(), SourceType::Topic);
        assert!("pdf".parse::<SourceType>().is_err());
        assert_eq!(SourceType::Text.to_string(), "text");
    }
}
