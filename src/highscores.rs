//! High score leaderboard system
//!
//! Persisted as a JSON array under one key, tracks the top 5 scores.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;
use crate::persistence::{KeyValueStore, StorageError};

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's display name
    pub name: String,
    /// Final score
    pub score: u64,
}

/// High score leaderboard, sorted descending by score.
///
/// Serialized as a plain JSON array; deserializing always sorts and caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "Vec<HighScoreEntry>", into = "Vec<HighScoreEntry>")]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
}

impl From<Vec<HighScoreEntry>> for HighScores {
    fn from(entries: Vec<HighScoreEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<HighScores> for Vec<HighScoreEntry> {
    fn from(scores: HighScores) -> Self {
        scores.entries
    }
}

/// Pick the name to record: trimmed input, or `default_name` when the input is
/// missing (cancelled) or blank.
pub fn resolve_name(name: Option<&str>, default_name: &str) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => default_name.to_string(),
    }
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "highScores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a leaderboard from arbitrary entries, sorting and capping them
    pub fn from_entries(mut entries: Vec<HighScoreEntry>) -> Self {
        // Stable sort keeps the earlier entry ahead on ties
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Parse persisted JSON; anything malformed yields an empty leaderboard
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<HighScores>(json) {
            Ok(scores) => scores,
            Err(e) => {
                log::warn!("Ignoring malformed high scores: {e}");
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Check if a score would stay on the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest entry; ties lose to the older entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add an entry, keeping the list sorted and capped.
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        // Find insertion point (sorted descending by score)
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Load the leaderboard; absent or malformed data yields an empty one
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => {
                let scores = Self::from_json(&json);
                log::info!("Loaded {} high scores", scores.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json = self.to_json()?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Add an entry and persist immediately. Save failures are logged and
    /// otherwise ignored.
    pub fn record(&mut self, entry: HighScoreEntry, store: &mut impl KeyValueStore) -> Option<usize> {
        let rank = self.add(entry);
        if let Err(e) = self.save(store) {
            log::warn!("Failed to save high scores: {e}");
        }
        rank
    }

    /// HUD lines, e.g. `1. Ada - 120`
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {} - {}", i + 1, e.name, e.score))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn entry(name: &str, score: u64) -> HighScoreEntry {
        HighScoreEntry {
            name: name.to_string(),
            score,
        }
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Rejected {
                key: key.to_string(),
            })
        }
    }

    #[test]
    fn test_add_sorted_and_capped() {
        let mut scores = HighScores::new();
        for (i, s) in [30, 10, 50, 20, 40, 60].into_iter().enumerate() {
            scores.add(entry(&format!("p{i}"), s));
        }
        let got: Vec<u64> = scores.entries().iter().map(|e| e.score).collect();
        assert_eq!(got, vec![60, 50, 40, 30, 20]);
    }

    #[test]
    fn test_add_rank() {
        let mut scores = HighScores::from_entries(vec![
            entry("a", 50),
            entry("b", 40),
            entry("c", 30),
            entry("d", 20),
            entry("e", 10),
        ]);
        assert_eq!(scores.add(entry("f", 45)), Some(2));
        assert_eq!(scores.add(entry("g", 5)), None);
        assert_eq!(scores.len(), 5);
        assert_eq!(scores.entries()[4].name, "d");
    }

    #[test]
    fn test_ties_keep_older_first() {
        let mut scores = HighScores::new();
        scores.add(entry("first", 30));
        assert_eq!(scores.add(entry("second", 30)), Some(2));
        assert_eq!(scores.entries()[0].name, "first");
    }

    #[test]
    fn test_zero_score_recorded() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(entry("Player", 0)), Some(1));
        assert_eq!(scores.top_score(), Some(0));
    }

    #[test]
    fn test_qualifies_and_potential_rank() {
        let scores = HighScores::from_entries(vec![
            entry("a", 50),
            entry("b", 40),
            entry("c", 30),
            entry("d", 20),
            entry("e", 10),
        ]);
        assert!(!scores.qualifies(10));
        assert!(scores.qualifies(11));
        assert_eq!(scores.potential_rank(60), Some(1));
        assert_eq!(scores.potential_rank(35), Some(3));
        assert_eq!(scores.potential_rank(1), None);
        assert_eq!(HighScores::new().potential_rank(0), Some(1));
    }

    #[test]
    fn test_from_json_stored_format() {
        let json = r#"[{"name":"Ada","score":40},{"name":"Bob","score":90}]"#;
        let scores = HighScores::from_json(json);
        assert_eq!(scores.entries(), &[entry("Bob", 90), entry("Ada", 40)]);
    }

    #[test]
    fn test_direct_deserialize_sorts_and_caps() {
        let list: Vec<HighScoreEntry> = (0..8).map(|i| entry("x", i * 10)).collect();
        let json = serde_json::to_string(&list).unwrap();
        let scores: HighScores = serde_json::from_str(&json).unwrap();
        assert_eq!(scores.len(), 5);
        let values: Vec<u64> = scores.entries().iter().map(|e| e.score).collect();
        assert_eq!(values, vec![70, 60, 50, 40, 30]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut scores = HighScores::new();
        scores.add(entry("Ada", 40));
        assert_eq!(scores.to_json().unwrap(), r#"[{"name":"Ada","score":40}]"#);
    }

    #[test]
    fn test_from_json_truncates() {
        let list: Vec<HighScoreEntry> = (0..8).map(|i| entry("x", i * 10)).collect();
        let json = serde_json::to_string(&list).unwrap();
        let scores = HighScores::from_json(&json);
        assert_eq!(scores.len(), 5);
        assert_eq!(scores.top_score(), Some(70));
    }

    #[test]
    fn test_malformed_json_is_empty() {
        for bad in [
            "",
            "not json",
            "{}",
            r#"[{"name":"Ada"}]"#,
            r#"[{"name":"Ada","score":-5}]"#,
            r#"{"entries":[]}"#,
        ] {
            assert!(HighScores::from_json(bad).is_empty(), "{bad:?}");
        }
    }

    #[test]
    fn test_save_load_through_store() {
        let mut store = MemoryStore::new();
        assert!(HighScores::load(&store).is_empty());

        let mut scores = HighScores::new();
        assert_eq!(scores.record(entry("Ada", 40), &mut store), Some(1));
        assert_eq!(
            store.get(HighScores::STORAGE_KEY).as_deref(),
            Some(r#"[{"name":"Ada","score":40}]"#)
        );
        assert_eq!(HighScores::load(&store), scores);
    }

    #[test]
    fn test_record_survives_failed_save() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(entry("Ada", 40), &mut FailingStore), Some(1));
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn test_resolve_name() {
        assert_eq!(resolve_name(Some("Ada"), "Player"), "Ada");
        assert_eq!(resolve_name(Some("  Ada "), "Player"), "Ada");
        assert_eq!(resolve_name(Some(""), "Player"), "Player");
        assert_eq!(resolve_name(Some("   "), "Player"), "Player");
        assert_eq!(resolve_name(None, "Player"), "Player");
    }

    #[test]
    fn test_lines() {
        let scores = HighScores::from_entries(vec![entry("Ada", 40), entry("Bob", 90)]);
        assert_eq!(scores.lines(), vec!["1. Bob - 90", "2. Ada - 40"]);
    }

    proptest! {
        #[test]
        fn always_sorted_and_capped(scores in prop::collection::vec(0u64..1000, 0..40)) {
            let mut board = HighScores::new();
            for s in scores {
                board.add(entry("p", s));
                prop_assert!(board.len() <= MAX_HIGH_SCORES);
                prop_assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
            }
        }

        #[test]
        fn add_matches_push_sort_truncate(scores in prop::collection::vec(0u64..50, 0..20)) {
            let mut board = HighScores::new();
            let mut reference: Vec<HighScoreEntry> = Vec::new();
            for (i, s) in scores.into_iter().enumerate() {
                let e = entry(&i.to_string(), s);
                board.add(e.clone());
                reference.push(e);
                reference.sort_by(|a, b| b.score.cmp(&a.score));
                reference.truncate(MAX_HIGH_SCORES);
                prop_assert_eq!(board.entries(), reference.as_slice());
            }
        }
    }
}
