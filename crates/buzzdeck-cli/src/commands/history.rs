//! The `buzzdeck history` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use buzzdeck_core::stats::accuracy_percent;
use buzzdeck_providers::load_config_from;

use crate::commands::open_store;

pub fn execute(
    limit: usize,
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = open_store(&config, data_dir);

    let history = store.game_history()?;
    if history.is_empty() {
        println!("No games played yet. Start one with: buzzdeck play <set-id>");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["When", "Mode", "Study set", "Score", "Accuracy"]);
    for record in history.iter().take(limit) {
        let accuracy = accuracy_percent(record.correct_answers, record.questions_answered);
        table.add_row(vec![
            Cell::new(record.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(record.kind),
            Cell::new(record.study_set_title.as_deref().unwrap_or("-")),
            Cell::new(record.score),
            Cell::new(format!(
                "{}% ({}/{})",
                accuracy, record.correct_answers, record.questions_answered
            )),
        ]);
    }
    println!("{table}");

    Ok(())
}
