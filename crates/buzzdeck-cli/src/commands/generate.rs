//! The `buzzdeck generate` command: turn notes or a topic into a
//! persisted study set.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;

use buzzdeck_core::model::{ActivityEntry, SetOrigin, StudySet};
use buzzdeck_core::traits::{GenerateRequest, SourceType};
use buzzdeck_providers::{create_default_provider, load_config_from};

use crate::commands::{open_store, short_id};

pub async fn execute(
    file: Option<PathBuf>,
    topic: Option<String>,
    title: String,
    description: String,
    model: Option<String>,
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let title = title.trim().to_string();
    if title.is_empty() {
        bail!("--title must not be empty");
    }

    let (source, source_type, origin) = match (file, topic) {
        (Some(path), None) => {
            let text = buzzdeck_ingest::read_source(&path)
                .with_context(|| format!("failed to ingest {}", path.display()))?;
            (text, SourceType::Text, SetOrigin::Upload)
        }
        (None, Some(topic)) if !topic.trim().is_empty() => {
            (topic.trim().to_string(), SourceType::Topic, SetOrigin::Generated)
        }
        _ => bail!("provide exactly one of --file or --topic"),
    };

    let config = load_config_from(config_path.as_deref())?;
    let provider = create_default_provider(&config)?;
    let request = GenerateRequest {
        source,
        source_type,
        model: model.unwrap_or_else(|| config.default_model.clone()),
        temperature: config.generation_temperature,
    };

    println!(
        "Generating questions with {} ({})...",
        provider.generator.name(),
        request.model
    );
    let pairs = provider.generator.generate_questions(&request).await?;
    if pairs.is_empty() {
        bail!(
            "the model returned no usable question pairs; nothing was saved. \
             Try again, or use a longer source text"
        );
    }

    let set = StudySet::new(&title, description, pairs, origin);
    let store = open_store(&config, data_dir);
    store.save_set(set.clone())?;
    store.log_activity(ActivityEntry {
        timestamp: Utc::now(),
        description: format!(
            "Generated study set \"{}\" with {} questions",
            set.title, set.question_count
        ),
        kind: "generate".into(),
        score: None,
        study_set_id: Some(set.id.clone()),
    })?;

    println!(
        "Created study set \"{}\" with {} questions (id: {})",
        set.title,
        set.question_count,
        short_id(&set.id)
    );
    println!("Play it with: buzzdeck play {}", short_id(&set.id));

    Ok(())
}
