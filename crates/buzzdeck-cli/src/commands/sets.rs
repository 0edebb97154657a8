//! The `buzzdeck sets` command family.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use buzzdeck_core::model::{ActivityEntry, QaPair, SetOrigin, StudySet};
use buzzdeck_providers::load_config_from;

use crate::commands::{open_store, resolve_set, short_id};

#[derive(Subcommand)]
pub enum SetsAction {
    /// List all study sets
    List,

    /// Show one study set with its questions
    Show {
        /// Study set id or id prefix
        set_id: String,
    },

    /// Add a study set from a JSON file of {question, answer} pairs
    Add {
        /// Title for the new study set
        #[arg(long)]
        title: String,

        /// Description for the new study set
        #[arg(long, default_value = "")]
        description: String,

        /// JSON file containing an array of {"question", "answer"} objects
        #[arg(long)]
        pairs: PathBuf,
    },

    /// Delete a study set
    Delete {
        /// Study set id or id prefix
        set_id: String,
    },

    /// Toggle a study set's favorite flag
    Favorite {
        /// Study set id or id prefix
        set_id: String,
    },
}

pub fn execute(
    action: SetsAction,
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = open_store(&config, data_dir);

    match action {
        SetsAction::List => {
            let sets = store.list_sets()?;
            if sets.is_empty() {
                println!("No study sets yet. Create one with: buzzdeck generate");
                return Ok(());
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "Title", "Questions", "Origin", "Fav", "Created"]);
            for set in &sets {
                table.add_row(vec![
                    Cell::new(short_id(&set.id)),
                    Cell::new(&set.title),
                    Cell::new(set.question_count),
                    Cell::new(format!("{:?}", set.origin).to_lowercase()),
                    Cell::new(if set.is_favorite { "*" } else { "" }),
                    Cell::new(set.created_at.format("%Y-%m-%d")),
                ]);
            }
            println!("{table}");
        }

        SetsAction::Show { set_id } => {
            let set = resolve_set(&store, &set_id)?;
            println!("{} ({})", set.title, short_id(&set.id));
            if !set.description.is_empty() {
                println!("{}", set.description);
            }
            println!();

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "Question", "Answer"]);
            for (i, pair) in set.question_pairs.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(i + 1),
                    Cell::new(&pair.question),
                    Cell::new(&pair.answer),
                ]);
            }
            println!("{table}");
        }

        SetsAction::Add {
            title,
            description,
            pairs,
        } => {
            let title = title.trim().to_string();
            if title.is_empty() {
                bail!("--title must not be empty");
            }
            let raw = std::fs::read_to_string(&pairs)
                .with_context(|| format!("failed to read {}", pairs.display()))?;
            let pairs: Vec<QaPair> = serde_json::from_str(&raw)
                .with_context(|| "expected a JSON array of {question, answer} objects")?;
            if pairs.is_empty() {
                bail!("the pairs file contains no questions");
            }

            let set = StudySet::new(&title, description, pairs, SetOrigin::Manual);
            store.save_set(set.clone())?;
            store.log_activity(ActivityEntry {
                timestamp: Utc::now(),
                description: format!(
                    "Added study set \"{}\" with {} questions",
                    set.title, set.question_count
                ),
                kind: "sets".into(),
                score: None,
                study_set_id: Some(set.id.clone()),
            })?;
            println!(
                "Added study set \"{}\" with {} questions (id: {})",
                set.title,
                set.question_count,
                short_id(&set.id)
            );
        }

        SetsAction::Delete { set_id } => {
            let set = resolve_set(&store, &set_id)?;
            store.delete_set(&set.id)?;
            println!("Deleted study set \"{}\"", set.title);
        }

        SetsAction::Favorite { set_id } => {
            let set = resolve_set(&store, &set_id)?;
            let favorite = store.toggle_favorite(&set.id)?;
            if favorite {
                println!("Marked \"{}\" as a favorite", set.title);
            } else {
                println!("Removed \"{}\" from favorites", set.title);
            }
        }
    }

    Ok(())
}
