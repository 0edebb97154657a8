pub mod generate;
pub mod history;
pub mod init;
pub mod play;
pub mod profile;
pub mod sets;
pub mod stats;

use std::path::PathBuf;

use buzzdeck_providers::BuzzdeckConfig;
use buzzdeck_store::{JsonFileBackend, Store};

/// Open the store in the configured data directory, honoring the
/// `--data-dir` override.
pub(crate) fn open_store(config: &BuzzdeckConfig, data_dir: Option<PathBuf>) -> Store {
    let dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
    Store::new(Box::new(JsonFileBackend::new(dir)))
}

/// Shorten a UUID for table display.
pub(crate) fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

/// Look up a study set by full id or unique id prefix.
pub(crate) fn resolve_set(
    store: &Store,
    id_or_prefix: &str,
) -> anyhow::Result<buzzdeck_core::model::StudySet> {
    let sets = store.list_sets()?;
    if let Some(set) = sets.iter().find(|s| s.id == id_or_prefix) {
        return Ok(set.clone());
    }
    let matches: Vec<_> = sets.iter().filter(|s| s.id.starts_with(id_or_prefix)).collect();
    match matches.as_slice() {
        [set] => Ok((*set).clone()),
        [] => anyhow::bail!(
            "no study set matches '{id_or_prefix}'; run `buzzdeck sets list` to see ids"
        ),
        _ => anyhow::bail!("'{id_or_prefix}' matches more than one study set; use a longer prefix"),
    }
}
