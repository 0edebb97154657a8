//! The `buzzdeck play` command: the interactive timed reveal session.
//!
//! The engine owns all quiz state; this module owns the terminal and the
//! three tickers (reveal, question countdown, buzz countdown). Each
//! ticker fires only while the engine says it should be armed, so a tick
//! that arrives after a transition is a no-op inside the engine.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::MissedTickBehavior;

use buzzdeck_core::clock::SystemClock;
use buzzdeck_core::engine::{
    Advance, AnswerReport, BuzzTick, GameState, GradingStrategy, RevealEngine,
};
use buzzdeck_core::matcher::LocalJudge;
use buzzdeck_core::traits::SimilarityJudge;
use buzzdeck_providers::{create_default_provider, load_config_from};
use buzzdeck_store::Store;

use crate::commands::{open_store, resolve_set};

pub async fn execute(
    set_id: String,
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = open_store(&config, data_dir);
    let set = resolve_set(&store, &set_id)?;

    let judge: Arc<dyn SimilarityJudge> = match config.grading {
        GradingStrategy::Local => Arc::new(LocalJudge),
        GradingStrategy::Semantic => create_default_provider(&config)
            .context("semantic grading needs a configured provider; or set grading = \"local\"")?
            .judge,
    };

    let mut engine = RevealEngine::new(
        config.engine_config(),
        Arc::new(SystemClock::new()),
        judge,
        store.rating()?,
    );
    engine.load_set(&set)?;

    println!("Playing \"{}\" ({} questions)", set.title, engine.question_count());
    println!("Rating: {}", engine.rating());
    println!("Press Enter while a question is revealing to buzz in.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match engine.state() {
            GameState::Ready => {
                println!(
                    "--- Question {} of {} ---",
                    engine.question_index() + 1,
                    engine.question_count()
                );
                print!("Press Enter to start reading... ");
                std::io::stdout().flush()?;
                lines.next_line().await?;
                engine.begin_reading()?;
                redraw(&engine);
            }
            GameState::Reading => {
                if let Some(report) = reading_phase(&mut engine, &mut lines).await? {
                    finish_question(&mut engine, &store, &report, &mut lines).await?;
                }
            }
            GameState::Buzzed => {
                let report = buzz_phase(&mut engine, &mut lines).await?;
                finish_question(&mut engine, &store, &report, &mut lines).await?;
            }
            GameState::Answered => {
                // finish_question advances; reaching here means a question
                // was answered without it (should not happen).
                engine.advance()?;
            }
            GameState::Completed => break,
            GameState::Setup => unreachable!("set was loaded before the loop"),
        }
    }

    println!("\nSession complete!");
    println!(
        "Score: {}   Correct: {}/{}   Rating: {}",
        engine.score(),
        engine.correct_count(),
        engine.results().len(),
        engine.rating()
    );

    Ok(())
}

/// Run the reveal/countdown loop until the player buzzes or time runs
/// out. Returns a report only on timeout.
async fn reading_phase(
    engine: &mut RevealEngine,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<Option<AnswerReport>> {
    let mut reveal = tokio::time::interval(Duration::from_millis(engine.reveal_interval_ms()));
    let mut countdown = tokio::time::interval(Duration::from_secs(1));
    // No catch-up bursts after a pause.
    reveal.set_missed_tick_behavior(MissedTickBehavior::Skip);
    countdown.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick of a tokio interval fires immediately.
    reveal.tick().await;
    countdown.tick().await;

    loop {
        tokio::select! {
            _ = reveal.tick(), if engine.timers().reveal => {
                engine.reveal_tick();
                redraw(engine);
            }
            _ = countdown.tick(), if engine.timers().countdown => {
                if let Some(report) = engine.countdown_tick() {
                    println!("\nTime's up!");
                    return Ok(Some(report));
                }
            }
            line = lines.next_line() => {
                let line = line?.unwrap_or_default();
                if line.trim() == "p" {
                    if engine.is_paused() {
                        engine.resume()?;
                        println!("(resumed)");
                    } else {
                        engine.pause()?;
                        println!("(paused; enter 'p' to resume)");
                    }
                } else if !engine.is_paused() {
                    engine.buzz()?;
                    return Ok(None);
                }
            }
        }
    }
}

/// Collect the answer inside the buzz window and grade it.
async fn buzz_phase(
    engine: &mut RevealEngine,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<AnswerReport> {
    print!("\nAnswer ({}s): ", engine.buzz_time_left());
    std::io::stdout().flush()?;

    let mut window = tokio::time::interval(Duration::from_secs(1));
    window.set_missed_tick_behavior(MissedTickBehavior::Skip);
    window.tick().await;

    loop {
        tokio::select! {
            _ = window.tick(), if engine.timers().buzz => {
                if let BuzzTick::Expired = engine.buzz_tick() {
                    println!("\nAnswer window expired.");
                    break;
                }
            }
            line = lines.next_line() => {
                let line = line?.unwrap_or_default();
                engine.set_answer(&line);
                break;
            }
        }
    }

    Ok(engine.submit().await?)
}

/// Report the outcome, persist the rating, offer post-answer review, and
/// advance.
async fn finish_question(
    engine: &mut RevealEngine,
    store: &Store,
    report: &AnswerReport,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<()> {
    let result = &report.result;
    if result.correct {
        println!("Correct! +{} points ({}s)", result.points_earned, result.time_to_answer);
    } else if result.timed_out {
        println!(
            "The answer was \"{}\". {} points",
            result.correct_answer, result.points_earned
        );
    } else {
        println!(
            "Incorrect. You said \"{}\"; the answer was \"{}\". {} points",
            result.user_answer, result.correct_answer, result.points_earned
        );
    }
    println!(
        "Rating: {} ({}{})",
        report.rating,
        if report.rating_delta >= 0 { "+" } else { "" },
        report.rating_delta
    );
    store.set_rating(report.rating)?;

    // After a wrong buzz the rest of the question can be revealed for
    // review before moving on.
    if !result.correct && !result.timed_out && engine.revealed_count() < engine.token_count() {
        print!("Press Enter for the next question, or 'r' to reveal the rest... ");
        std::io::stdout().flush()?;
        let line = lines.next_line().await?.unwrap_or_default();
        if line.trim() == "r" {
            engine.continue_reading()?;
            let mut reveal =
                tokio::time::interval(Duration::from_millis(engine.reveal_interval_ms()));
            reveal.tick().await;
            loop {
                reveal.tick().await;
                let more = engine.reveal_tick();
                redraw(engine);
                if !more {
                    break;
                }
            }
            println!();
        }
    }

    match engine.advance()? {
        Advance::NextQuestion => println!(),
        Advance::Completed(record) => {
            store.log_game_result(record)?;
        }
    }
    Ok(())
}

fn redraw(engine: &RevealEngine) {
    print!(
        "\r[{:>3}s] {}",
        engine.question_time_left(),
        engine.revealed_text()
    );
    let _ = std::io::stdout().flush();
}
