//! Typed repositories over the key-value backend.
//!
//! Five well-known keys hold the whole persisted state: `studySets`,
//! `gameHistory`, `activityLog`, `userRating`, and `userProfile`. Each
//! value is a JSON document; a missing key reads as the type's default.

use buzzdeck_core::model::{ActivityEntry, GameRecord, StudySet, UserProfile};
use buzzdeck_core::score::DEFAULT_RATING;
use buzzdeck_core::stats::accuracy_percent;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::KvBackend;
use crate::error::StoreError;

const KEY_STUDY_SETS: &str = "studySets";
const KEY_GAME_HISTORY: &str = "gameHistory";
const KEY_ACTIVITY_LOG: &str = "activityLog";
const KEY_USER_RATING: &str = "userRating";
const KEY_USER_PROFILE: &str = "userProfile";

/// Cap on retained history and activity entries; oldest are dropped.
const MAX_LOG_ENTRIES: usize = 500;

pub struct Store {
    backend: Box<dyn KvBackend>,
}

impl Store {
    pub fn new(backend: Box<dyn KvBackend>) -> Self {
        Self { backend }
    }

    fn get_json<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match self.backend.get(key)? {
            None => Ok(T::default()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(value).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        self.backend.put(key, &raw)
    }

    // ------------------------------------------------------------------
    // Study sets
    // ------------------------------------------------------------------

    pub fn list_sets(&self) -> Result<Vec<StudySet>, StoreError> {
        self.get_json(KEY_STUDY_SETS)
    }

    pub fn get_set(&self, id: &str) -> Result<StudySet, StoreError> {
        self.list_sets()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::SetNotFound(id.to_string()))
    }

    /// Insert or replace a set by id. `question_count` is recomputed from
    /// the pairs on every write, never trusted from the caller.
    pub fn save_set(&self, mut set: StudySet) -> Result<(), StoreError> {
        set.question_count = set.question_pairs.len();
        let mut sets = self.list_sets()?;
        match sets.iter_mut().find(|s| s.id == set.id) {
            Some(existing) => *existing = set,
            None => sets.push(set),
        }
        self.put_json(KEY_STUDY_SETS, &sets)
    }

    pub fn delete_set(&self, id: &str) -> Result<(), StoreError> {
        let mut sets = self.list_sets()?;
        let before = sets.len();
        sets.retain(|s| s.id != id);
        if sets.len() == before {
            return Err(StoreError::SetNotFound(id.to_string()));
        }
        self.put_json(KEY_STUDY_SETS, &sets)
    }

    /// Flip the favorite flag, returning the new value.
    pub fn toggle_favorite(&self, id: &str) -> Result<bool, StoreError> {
        let mut sets = self.list_sets()?;
        let set = sets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::SetNotFound(id.to_string()))?;
        set.is_favorite = !set.is_favorite;
        let favorite = set.is_favorite;
        self.put_json(KEY_STUDY_SETS, &sets)?;
        Ok(favorite)
    }

    // ------------------------------------------------------------------
    // Game history and activity feed
    // ------------------------------------------------------------------

    /// Completed sessions, newest first.
    pub fn game_history(&self) -> Result<Vec<GameRecord>, StoreError> {
        let mut history: Vec<GameRecord> = self.get_json(KEY_GAME_HISTORY)?;
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(history)
    }

    /// Activity feed entries, newest first.
    pub fn activity_log(&self) -> Result<Vec<ActivityEntry>, StoreError> {
        let mut log: Vec<ActivityEntry> = self.get_json(KEY_ACTIVITY_LOG)?;
        log.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(log)
    }

    pub fn log_activity(&self, entry: ActivityEntry) -> Result<(), StoreError> {
        let mut log: Vec<ActivityEntry> = self.get_json(KEY_ACTIVITY_LOG)?;
        log.push(entry);
        if log.len() > MAX_LOG_ENTRIES {
            let drop = log.len() - MAX_LOG_ENTRIES;
            log.drain(..drop);
        }
        self.put_json(KEY_ACTIVITY_LOG, &log)
    }

    /// Record a finished session: append it to the game history and write
    /// a matching activity feed line.
    pub fn log_game_result(&self, record: GameRecord) -> Result<(), StoreError> {
        let accuracy = accuracy_percent(record.correct_answers, record.questions_answered);
        let title = record.study_set_title.as_deref().unwrap_or("a study set");
        let description = format!(
            "Played {} on \"{}\": {} points, {}% accuracy",
            record.kind, title, record.score, accuracy
        );
        tracing::info!(kind = %record.kind, score = record.score, accuracy, "logging game result");

        self.log_activity(ActivityEntry {
            timestamp: record.timestamp,
            description,
            kind: record.kind.to_string(),
            score: Some(record.score),
            study_set_id: record.study_set_id.clone(),
        })?;

        let mut history: Vec<GameRecord> = self.get_json(KEY_GAME_HISTORY)?;
        history.push(record);
        if history.len() > MAX_LOG_ENTRIES {
            let drop = history.len() - MAX_LOG_ENTRIES;
            history.drain(..drop);
        }
        self.put_json(KEY_GAME_HISTORY, &history)
    }

    // ------------------------------------------------------------------
    // Rating and profile
    // ------------------------------------------------------------------

    pub fn rating(&self) -> Result<i32, StoreError> {
        match self.backend.get(KEY_USER_RATING)? {
            None => Ok(DEFAULT_RATING),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: KEY_USER_RATING.to_string(),
                source,
            }),
        }
    }

    pub fn set_rating(&self, rating: i32) -> Result<(), StoreError> {
        tracing::debug!(rating, "updating user rating");
        self.backend.put(KEY_USER_RATING, &rating.to_string())
    }

    pub fn profile(&self) -> Result<UserProfile, StoreError> {
        self.get_json(KEY_USER_PROFILE)
    }

    pub fn set_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.put_json(KEY_USER_PROFILE, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{JsonFileBackend, MemoryBackend};
    use buzzdeck_core::model::{GameKind, QaPair, SetOrigin};
    use chrono::{Duration, Utc};

    fn memory_store() -> Store {
        Store::new(Box::new(MemoryBackend::new()))
    }

    fn sample_set(title: &str, pairs: usize) -> StudySet {
        let pairs = (0..pairs)
            .map(|i| QaPair::new(format!("question {i}"), format!("answer {i}")))
            .collect();
        StudySet::new(title, "", pairs, SetOrigin::Manual)
    }

    fn sample_record(score: i64) -> GameRecord {
        GameRecord {
            kind: GameKind::Reader,
            score,
            questions_answered: 4,
            correct_answers: 3,
            study_set_id: Some("set-1".into()),
            study_set_title: Some("Biology - Cells".into()),
            timestamp: Utc::now(),
            results: vec![],
        }
    }

    #[test]
    fn set_crud_round_trip() {
        let store = memory_store();
        assert!(store.list_sets().unwrap().is_empty());

        let set = sample_set("Chemistry - Bonds", 3);
        let id = set.id.clone();
        store.save_set(set).unwrap();

        let loaded = store.get_set(&id).unwrap();
        assert_eq!(loaded.title, "Chemistry - Bonds");
        assert_eq!(loaded.question_count, 3);

        store.delete_set(&id).unwrap();
        assert!(matches!(
            store.get_set(&id),
            Err(StoreError::SetNotFound(_))
        ));
    }

    #[test]
    fn save_recomputes_question_count() {
        let store = memory_store();
        let mut set = sample_set("History", 2);
        let id = set.id.clone();
        set.question_pairs.push(QaPair::new("extra", "pair"));
        set.question_count = 99; // stale on purpose
        store.save_set(set).unwrap();
        assert_eq!(store.get_set(&id).unwrap().question_count, 3);
    }

    #[test]
    fn save_replaces_by_id() {
        let store = memory_store();
        let mut set = sample_set("Draft", 1);
        let id = set.id.clone();
        store.save_set(set.clone()).unwrap();
        set.title = "Final".into();
        store.save_set(set).unwrap();
        let sets = store.list_sets().unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].title, "Final");
        assert_eq!(sets[0].id, id);
    }

    #[test]
    fn favorite_toggles_and_missing_set_errors() {
        let store = memory_store();
        let set = sample_set("Physics", 1);
        let id = set.id.clone();
        store.save_set(set).unwrap();

        assert!(store.toggle_favorite(&id).unwrap());
        assert!(!store.toggle_favorite(&id).unwrap());
        assert!(matches!(
            store.toggle_favorite("nope"),
            Err(StoreError::SetNotFound(_))
        ));
    }

    #[test]
    fn history_is_newest_first() {
        let store = memory_store();
        let mut old = sample_record(10);
        old.timestamp = Utc::now() - Duration::hours(2);
        let new = sample_record(90);
        store.log_game_result(old).unwrap();
        store.log_game_result(new).unwrap();

        let history = store.game_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].score, 90);
    }

    #[test]
    fn game_result_writes_activity_with_accuracy() {
        let store = memory_store();
        store.log_game_result(sample_record(120)).unwrap();

        let log = store.activity_log().unwrap();
        assert_eq!(log.len(), 1);
        assert!(log[0].description.contains("75% accuracy"));
        assert!(log[0].description.contains("Biology - Cells"));
        assert_eq!(log[0].score, Some(120));
    }

    #[test]
    fn rating_defaults_and_persists() {
        let store = memory_store();
        assert_eq!(store.rating().unwrap(), 1000);
        store.set_rating(1025).unwrap();
        assert_eq!(store.rating().unwrap(), 1025);
    }

    #[test]
    fn profile_defaults_and_persists() {
        let store = memory_store();
        assert_eq!(store.profile().unwrap().name, "");
        store
            .set_profile(&UserProfile {
                name: "Ada".into(),
                email: "ada@example.com".into(),
            })
            .unwrap();
        assert_eq!(store.profile().unwrap().name, "Ada");
    }

    #[test]
    fn file_backend_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let set_id;
        {
            let store = Store::new(Box::new(JsonFileBackend::new(dir.path())));
            let set = sample_set("Geography - Capitals", 5);
            set_id = set.id.clone();
            store.save_set(set).unwrap();
            store.set_rating(985).unwrap();
        }
        let store = Store::new(Box::new(JsonFileBackend::new(dir.path())));
        let loaded = store.get_set(&set_id).unwrap();
        assert_eq!(loaded.question_count, 5);
        assert_eq!(store.rating().unwrap(), 985);
    }

    #[test]
    fn corrupt_payload_is_reported_not_defaulted() {
        let backend = MemoryBackend::new();
        backend.put("studySets", "{not json").unwrap();
        let store = Store::new(Box::new(backend));
        assert!(matches!(
            store.list_sets(),
            Err(StoreError::Corrupt { .. })
        ));
    }
}
