//! Core data model types for buzzdeck.
//!
//! These are the fundamental types the entire system uses to represent
//! questions, study sets, per-question results, and session summaries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single playable question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within its study set.
    pub id: String,
    /// Full question text, revealed token by token during play.
    pub text: String,
    /// The expected answer.
    pub answer: String,
    /// Topic label, derived from the study set title.
    pub category: String,
    /// Not currently computed; defaults to medium.
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl Question {
    /// Question text split into reveal tokens (whitespace-separated,
    /// empties dropped).
    pub fn tokens(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

/// Question difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// A generated or authored question/answer pair, the unit the AI
/// collaborator produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
    /// Distractor options for multiple-choice play.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Index of the correct option, when `options` is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<usize>,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            options: None,
            correct_option: None,
        }
    }
}

/// How a study set came to exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetOrigin {
    /// Produced by the AI collaborator from notes or a topic.
    #[default]
    Generated,
    /// Built from an uploaded file.
    Upload,
    /// Entered by hand.
    Manual,
    /// Bundled sample content.
    Sample,
}

/// A named, user-owned ordered collection of question/answer pairs.
///
/// `question_count` must always equal `question_pairs.len()`; the store
/// recomputes it on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySet {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub question_pairs: Vec<QaPair>,
    pub question_count: usize,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub origin: SetOrigin,
    #[serde(default)]
    pub is_favorite: bool,
}

impl StudySet {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        question_pairs: Vec<QaPair>,
        origin: SetOrigin,
    ) -> Self {
        let question_count = question_pairs.len();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            question_pairs,
            question_count,
            created_at: Utc::now(),
            origin,
            is_favorite: false,
        }
    }

    /// Convert the stored pairs into playable questions. The category is
    /// the title prefix before " - ", or "General".
    pub fn questions(&self) -> Vec<Question> {
        let category = self
            .title
            .split(" - ")
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("General")
            .to_string();

        self.question_pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| Question {
                id: format!("{}-{}", self.id, i),
                text: pair.question.clone(),
                answer: pair.answer.clone(),
                category: category.clone(),
                difficulty: Difficulty::Medium,
            })
            .collect()
    }
}

/// Outcome of one question in one session. Append-only; produced exactly
/// once per question advanced past.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub correct: bool,
    pub user_answer: String,
    pub correct_answer: String,
    /// Whole seconds from reading start to grading.
    pub time_to_answer: u64,
    pub points_earned: i32,
    pub timed_out: bool,
}

/// Which quiz mode produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Reader,
    Trivia,
    Flashcards,
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::Reader => write!(f, "reader"),
            GameKind::Trivia => write!(f, "trivia"),
            GameKind::Flashcards => write!(f, "flashcards"),
        }
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reader" => Ok(GameKind::Reader),
            "trivia" => Ok(GameKind::Trivia),
            "flashcards" | "flashcard" => Ok(GameKind::Flashcards),
            other => Err(format!("unknown game kind: {other}")),
        }
    }
}

/// Session summary appended to the game history when a play-through
/// completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub kind: GameKind,
    pub score: i64,
    pub questions_answered: usize,
    pub correct_answers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_set_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_set_title: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub results: Vec<QuestionResult>,
}

/// One line in the activity feed, used for streak and recency display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_set_id: Option<String>,
}

/// Local user profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}
