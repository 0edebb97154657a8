//! The `buzzdeck stats` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use buzzdeck_core::stats::{accuracy_percent, current_streak_days};
use buzzdeck_providers::load_config_from;

use crate::commands::open_store;

pub fn rating(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = open_store(&config, data_dir);
    println!("Rating: {}", store.rating()?);
    Ok(())
}

pub fn execute(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = open_store(&config, data_dir);

    let history = store.game_history()?;
    let activity = store.activity_log()?;

    let answered: usize = history.iter().map(|r| r.questions_answered).sum();
    let correct: u32 = history.iter().map(|r| r.correct_answers).sum();
    let streak = current_streak_days(&activity, Utc::now().date_naive());

    println!("Rating:        {}", store.rating()?);
    println!("Games played:  {}", history.len());
    println!(
        "Accuracy:      {}% ({}/{} questions)",
        accuracy_percent(correct, answered),
        correct,
        answered
    );
    println!("Study streak:  {} day(s)", streak);

    Ok(())
}
