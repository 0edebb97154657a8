//! The timed reveal quiz engine.
//!
//! A single-owner state machine: every transition happens on one logical
//! thread in response to a timer tick or a user action. Timers themselves
//! live in the driver (the CLI arms `tokio::time` intervals, tests call
//! the tick methods directly); the engine only says which tickers should
//! be armed via [`RevealEngine::timers`] and interprets each tick. The
//! `&mut self` receiver on every entry point makes the submit path atomic:
//! once grading starts, no buzz or second submit can race it.

use std::fmt;
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::EngineError;
use crate::matcher::{exact_match, fuzzy_match};
use crate::model::{GameKind, GameRecord, Question, QuestionResult, StudySet};
use crate::score;
use crate::traits::SimilarityJudge;

/// Sentinel recorded when a question is graded with no text entered.
pub const NO_ANSWER: &str = "(no answer)";

/// Seconds granted to type an answer after buzzing.
pub const BUZZ_WINDOW_SECS: u32 = 10;

/// Engine lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// No usable study set loaded.
    Setup,
    /// A question is queued, reading has not started.
    Ready,
    /// Tokens are revealing and the question countdown is running.
    Reading,
    /// Buzzed in; the answer window is counting down.
    Buzzed,
    /// The question has been graded; awaiting advance.
    Answered,
    /// Terminal for the session; restart creates a fresh session.
    Completed,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Setup => write!(f, "setup"),
            GameState::Ready => write!(f, "ready"),
            GameState::Reading => write!(f, "reading"),
            GameState::Buzzed => write!(f, "buzzed"),
            GameState::Answered => write!(f, "answered"),
            GameState::Completed => write!(f, "completed"),
        }
    }
}

/// Per-question time budget policy. Length-derived is the default;
/// the flat variant exists as an explicit configuration choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBudget {
    /// `ceil(word_count / 3)` seconds, clamped to 5..=45.
    LengthDerived,
    /// The same fixed budget for every question.
    Flat(u32),
}

impl TimeBudget {
    pub fn for_word_count(&self, words: usize) -> u32 {
        match self {
            TimeBudget::Flat(secs) => *secs,
            TimeBudget::LengthDerived => (words.div_ceil(3)).clamp(5, 45) as u32,
        }
    }
}

/// Which comparator grades answers. Fixed for the whole session; the two
/// strategies are never mixed mid-session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingStrategy {
    /// Remote similarity judge, degrading to normalized exact match on
    /// error.
    #[default]
    Semantic,
    /// Local fuzzy matcher only; no network.
    Local,
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Milliseconds between token reveals (user-configurable 100-500).
    pub reveal_interval_ms: u64,
    pub time_budget: TimeBudget,
    pub grading: GradingStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reveal_interval_ms: 300,
            time_budget: TimeBudget::LengthDerived,
            grading: GradingStrategy::Semantic,
        }
    }
}

/// Which tickers the driver should have armed right now. At most one of
/// each is ever live; a transition that invalidates a ticker drops it from
/// this set before the next arm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSet {
    /// Reveal ticker (`reveal_interval_ms` period).
    pub reveal: bool,
    /// Question countdown (1 s period).
    pub countdown: bool,
    /// Buzz answer countdown (1 s period).
    pub buzz: bool,
}

/// Result of a buzz-countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzTick {
    /// Seconds remaining in the answer window.
    Counting(u32),
    /// Window exhausted; the driver must submit whatever is entered.
    Expired,
}

/// What grading one question produced.
#[derive(Debug, Clone)]
pub struct AnswerReport {
    pub result: QuestionResult,
    pub rating_delta: i32,
    /// Rating after the clamped delta.
    pub rating: i32,
}

/// Outcome of advancing past an answered question.
#[derive(Debug, Clone)]
pub enum Advance {
    /// More questions remain; the engine is `Ready` on the next index.
    NextQuestion,
    /// Session finished; persist this summary.
    Completed(GameRecord),
}

/// The timed reveal quiz engine.
pub struct RevealEngine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    judge: Arc<dyn SimilarityJudge>,

    questions: Vec<Question>,
    set_id: Option<String>,
    set_title: Option<String>,

    state: GameState,
    index: usize,
    revealed: usize,
    user_answer: String,
    score: i64,
    correct: u32,
    incorrect: u32,
    results: Vec<QuestionResult>,
    rating: i32,

    question_time_left: u32,
    buzz_time_left: u32,
    question_started_ms: u64,
    paused: bool,
    /// Post-answer reveal of the rest of an incorrectly answered question;
    /// no second result is ever recorded for it.
    reviewing: bool,
}

impl RevealEngine {
    pub fn new(
        config: EngineConfig,
        clock: Arc<dyn Clock>,
        judge: Arc<dyn SimilarityJudge>,
        rating: i32,
    ) -> Self {
        Self {
            config,
            clock,
            judge,
            questions: Vec::new(),
            set_id: None,
            set_title: None,
            state: GameState::Setup,
            index: 0,
            revealed: 0,
            user_answer: String::new(),
            score: 0,
            correct: 0,
            incorrect: 0,
            results: Vec::new(),
            rating,
            question_time_left: 0,
            buzz_time_left: 0,
            question_started_ms: 0,
            paused: false,
            reviewing: false,
        }
    }

    /// Load a study set, leaving `Setup`. Refuses an empty set.
    pub fn load_set(&mut self, set: &StudySet) -> Result<(), EngineError> {
        let questions = set.questions();
        if questions.is_empty() {
            return Err(EngineError::EmptySet);
        }
        self.questions = questions;
        self.set_id = Some(set.id.clone());
        self.set_title = Some(set.title.clone());
        self.reset_session();
        Ok(())
    }

    /// Reset the entire session: index 0, score 0, empty results, all
    /// timers conceptually disarmed. Persisted rating is untouched.
    pub fn restart(&mut self) -> Result<(), EngineError> {
        if self.questions.is_empty() {
            return Err(EngineError::EmptySet);
        }
        self.reset_session();
        Ok(())
    }

    fn reset_session(&mut self) {
        self.state = GameState::Ready;
        self.index = 0;
        self.score = 0;
        self.correct = 0;
        self.incorrect = 0;
        self.results.clear();
        self.paused = false;
        self.reset_question_transients();
    }

    fn reset_question_transients(&mut self) {
        self.revealed = 0;
        self.user_answer.clear();
        self.question_time_left = 0;
        self.buzz_time_left = 0;
        self.question_started_ms = 0;
        self.reviewing = false;
    }

    /// `Ready -> Reading`: reveal the first token, arm the reveal ticker
    /// and the question countdown, record the start time.
    pub fn begin_reading(&mut self) -> Result<(), EngineError> {
        self.expect_state(GameState::Ready, "begin reading")?;

        let words = self.current_question().tokens().len();
        self.revealed = 1.min(words);
        self.question_time_left = self.config.time_budget.for_word_count(words);
        self.buzz_time_left = 0;
        self.question_started_ms = self.clock.now_ms();
        self.user_answer.clear();
        self.state = GameState::Reading;
        Ok(())
    }

    /// One reveal-ticker tick: append the next token. Returns `true` while
    /// tokens remain unrevealed afterwards. Exhausting the tokens does not
    /// end the question; the countdown keeps running.
    pub fn reveal_tick(&mut self) -> bool {
        let revealing = !self.paused
            && (self.state == GameState::Reading
                || (self.state == GameState::Answered && self.reviewing));
        if revealing && self.revealed < self.token_count() {
            self.revealed += 1;
        }
        revealing && self.revealed < self.token_count()
    }

    /// One question-countdown tick. Reaching zero is fatal to the
    /// question: all timers are dropped and a timeout result is recorded.
    pub fn countdown_tick(&mut self) -> Option<AnswerReport> {
        if self.state != GameState::Reading || self.paused {
            return None;
        }
        self.question_time_left = self.question_time_left.saturating_sub(1);
        if self.question_time_left > 0 {
            return None;
        }
        Some(self.time_up())
    }

    fn time_up(&mut self) -> AnswerReport {
        let question = &self.questions[self.index];
        let user_answer = if self.user_answer.trim().is_empty() {
            NO_ANSWER.to_string()
        } else {
            self.user_answer.trim().to_string()
        };
        let result = QuestionResult {
            question_id: question.id.clone(),
            correct: false,
            user_answer,
            correct_answer: question.answer.clone(),
            time_to_answer: self.elapsed_secs(),
            points_earned: score::TIMEOUT_POINTS,
            timed_out: true,
        };

        self.score += i64::from(score::TIMEOUT_POINTS);
        self.incorrect += 1;
        let rating_delta = score::RATING_TIMEOUT_DELTA;
        self.rating = score::apply_rating_delta(self.rating, rating_delta);
        self.results.push(result.clone());
        self.state = GameState::Answered;

        AnswerReport {
            result,
            rating_delta,
            rating: self.rating,
        }
    }

    /// `Reading -> Buzzed`: freeze the reveal, drop the question
    /// countdown, arm the fixed answer window.
    pub fn buzz(&mut self) -> Result<(), EngineError> {
        if self.paused {
            return Err(EngineError::Paused);
        }
        self.expect_state(GameState::Reading, "buzz")?;
        self.state = GameState::Buzzed;
        self.buzz_time_left = BUZZ_WINDOW_SECS;
        Ok(())
    }

    /// One buzz-countdown tick. On expiry the driver must call
    /// [`RevealEngine::submit`] with whatever text is entered.
    pub fn buzz_tick(&mut self) -> BuzzTick {
        if self.state != GameState::Buzzed || self.paused {
            return BuzzTick::Counting(self.buzz_time_left);
        }
        self.buzz_time_left = self.buzz_time_left.saturating_sub(1);
        if self.buzz_time_left == 0 {
            BuzzTick::Expired
        } else {
            BuzzTick::Counting(self.buzz_time_left)
        }
    }

    /// Replace the in-progress answer text.
    pub fn set_answer(&mut self, text: &str) {
        self.user_answer = text.to_string();
    }

    /// `Buzzed -> Answered`: grade the entered answer and score it.
    ///
    /// Suspends on the similarity judge; judge failure degrades to a
    /// normalized exact match rather than blocking the session.
    pub async fn submit(&mut self) -> Result<AnswerReport, EngineError> {
        if self.paused {
            return Err(EngineError::Paused);
        }
        self.expect_state(GameState::Buzzed, "submit")?;

        self.buzz_time_left = 0;
        let time_to_answer = self.elapsed_secs();
        let question = self.questions[self.index].clone();
        let entered = self.user_answer.trim().to_string();

        let correct = match self.config.grading {
            GradingStrategy::Local => fuzzy_match(&entered, &question.answer),
            GradingStrategy::Semantic => {
                match self.judge.judge(&entered, &question.answer).await {
                    Ok(verdict) => verdict,
                    Err(e) => {
                        tracing::warn!("similarity judge failed, falling back to exact match: {e:#}");
                        exact_match(&entered, &question.answer)
                    }
                }
            }
        };

        let points_earned = if correct {
            score::points_for_correct(self.revealed, self.token_count())
        } else {
            score::WRONG_ANSWER_POINTS
        };
        let rating_delta = if correct {
            score::RATING_CORRECT_DELTA
        } else {
            score::RATING_INCORRECT_DELTA
        };

        let result = QuestionResult {
            question_id: question.id.clone(),
            correct,
            user_answer: if entered.is_empty() {
                NO_ANSWER.to_string()
            } else {
                entered
            },
            correct_answer: question.answer.clone(),
            time_to_answer,
            points_earned,
            timed_out: false,
        };

        self.score += i64::from(points_earned);
        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.rating = score::apply_rating_delta(self.rating, rating_delta);
        self.results.push(result.clone());
        self.state = GameState::Answered;

        Ok(AnswerReport {
            result,
            rating_delta,
            rating: self.rating,
        })
    }

    /// After an incorrect buzz, let the rest of the question reveal for
    /// review. The question keeps its single recorded result; only the
    /// reveal ticker re-arms.
    pub fn continue_reading(&mut self) -> Result<(), EngineError> {
        self.expect_state(GameState::Answered, "continue reading")?;
        let reviewable = self
            .results
            .last()
            .is_some_and(|r| !r.correct && !r.timed_out);
        if !reviewable || self.revealed >= self.token_count() {
            return Err(EngineError::InvalidAction {
                action: "continue reading",
                state: self.state,
            });
        }
        self.reviewing = true;
        Ok(())
    }

    /// `Answered -> Ready | Completed`.
    pub fn advance(&mut self) -> Result<Advance, EngineError> {
        self.expect_state(GameState::Answered, "advance")?;

        if self.index + 1 < self.questions.len() {
            self.index += 1;
            self.reset_question_transients();
            self.state = GameState::Ready;
            Ok(Advance::NextQuestion)
        } else {
            self.state = GameState::Completed;
            Ok(Advance::Completed(self.summary()))
        }
    }

    /// Suspend all ticking without altering counters or revealed tokens.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        match self.state {
            GameState::Reading | GameState::Buzzed => {
                self.paused = true;
                Ok(())
            }
            state => Err(EngineError::InvalidAction {
                action: "pause",
                state,
            }),
        }
    }

    /// Re-arm exactly the timers appropriate to the current state,
    /// continuing from where they left off.
    pub fn resume(&mut self) -> Result<(), EngineError> {
        if !self.paused {
            return Err(EngineError::InvalidAction {
                action: "resume",
                state: self.state,
            });
        }
        self.paused = false;
        Ok(())
    }

    /// Session summary for the history log.
    fn summary(&self) -> GameRecord {
        GameRecord {
            kind: GameKind::Reader,
            score: self.score,
            questions_answered: self.results.len(),
            correct_answers: self.correct,
            study_set_id: self.set_id.clone(),
            study_set_title: self.set_title.clone(),
            timestamp: chrono::Utc::now(),
            results: self.results.clone(),
        }
    }

    /// Which tickers the driver should have armed right now.
    pub fn timers(&self) -> TimerSet {
        if self.paused {
            return TimerSet::default();
        }
        match self.state {
            GameState::Reading => TimerSet {
                reveal: self.revealed < self.token_count(),
                countdown: true,
                buzz: false,
            },
            GameState::Buzzed => TimerSet {
                reveal: false,
                countdown: false,
                buzz: true,
            },
            GameState::Answered if self.reviewing => TimerSet {
                reveal: self.revealed < self.token_count(),
                countdown: false,
                buzz: false,
            },
            _ => TimerSet::default(),
        }
    }

    fn expect_state(&self, expected: GameState, action: &'static str) -> Result<(), EngineError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidAction {
                action,
                state: self.state,
            })
        }
    }

    fn elapsed_secs(&self) -> u64 {
        (self.clock.now_ms().saturating_sub(self.question_started_ms)) / 1000
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.index]
    }

    pub fn question_index(&self) -> usize {
        self.index
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn token_count(&self) -> usize {
        self.questions[self.index].tokens().len()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// The currently revealed prefix of the question text.
    pub fn revealed_text(&self) -> String {
        self.questions[self.index].tokens()[..self.revealed].join(" ")
    }

    pub fn percent_revealed(&self) -> u32 {
        let total = self.token_count();
        if total == 0 {
            return 0;
        }
        ((self.revealed as f64 / total as f64) * 100.0).floor() as u32
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    pub fn incorrect_count(&self) -> u32 {
        self.incorrect
    }

    pub fn results(&self) -> &[QuestionResult] {
        &self.results
    }

    pub fn question_time_left(&self) -> u32 {
        self.question_time_left
    }

    pub fn buzz_time_left(&self) -> u32 {
        self.buzz_time_left
    }

    pub fn reveal_interval_ms(&self) -> u64 {
        self.config.reveal_interval_ms
    }
}
