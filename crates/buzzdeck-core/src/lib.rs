//! Core engine for buzzdeck: the timed reveal quiz state machine,
//! scoring and rating rules, answer matching, model-output parsing, and
//! the trait seams that LLM providers plug into.
//!
//! This crate is deliberately free of I/O. Persistence lives in
//! `buzzdeck-store`, network providers in `buzzdeck-providers`, and the
//! interactive driver in `buzzdeck-cli`.

pub mod clock;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod parser;
pub mod score;
pub mod stats;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{
    Advance, AnswerReport, BuzzTick, EngineConfig, GameState, GradingStrategy, RevealEngine,
    TimeBudget, TimerSet, BUZZ_WINDOW_SECS, NO_ANSWER,
};
pub use error::EngineError;
pub use model::{
    ActivityEntry, Difficulty, GameKind, GameRecord, QaPair, Question, QuestionResult, SetOrigin,
    StudySet, UserProfile,
};
pub use traits::{GenerateRequest, QuestionGenerator, SimilarityJudge, SourceType};
