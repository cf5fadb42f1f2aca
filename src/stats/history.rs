use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::counts::BatchStats;
use crate::core::{Error, Result};

/// Record of one analysis call. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisEntry {
    pub platform: String,
    pub locator: String,
    pub timestamp: DateTime<Utc>,
    pub stats: BatchStats,
}

/// Append-only, ordered log of analysis entries
#[derive(Debug, Clone, Default)]
pub struct AnalysisHistory {
    entries: Vec<AnalysisEntry>,
}

impl AnalysisHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its analysis id (position in the log)
    pub fn append(&mut self, entry: AnalysisEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// The `limit` most recent entries, newest first.
    ///
    /// A limit beyond the history size returns everything.
    pub fn recent(&self, limit: usize) -> Result<Vec<AnalysisEntry>> {
        if limit == 0 {
            return Err(Error::invalid_input("history limit must be positive"));
        }
        Ok(self.entries.iter().rev().take(limit).cloned().collect())
    }

    pub fn for_platform<'a>(
        &'a self,
        platform: &'a str,
    ) -> impl Iterator<Item = &'a AnalysisEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.platform == platform)
    }

    pub fn entries(&self) -> &[AnalysisEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(platform: &str, locator: &str) -> AnalysisEntry {
        AnalysisEntry {
            platform: platform.to_string(),
            locator: locator.to_string(),
            timestamp: Utc::now(),
            stats: BatchStats::default(),
        }
    }

    #[test]
    fn test_append_returns_sequential_ids() {
        let mut history = AnalysisHistory::new();
        assert_eq!(history.append(entry("youtube", "a")), 0);
        assert_eq!(history.append(entry("reddit", "b")), 1);
        assert_eq!(history.entries()[1].locator, "b");
    }

    #[test]
    fn test_recent_is_newest_first_and_capped() {
        let mut history = AnalysisHistory::new();
        for locator in ["one", "two", "three"] {
            history.append(entry("youtube", locator));
        }

        let all = history.recent(5).unwrap();
        let locators: Vec<&str> = all.iter().map(|e| e.locator.as_str()).collect();
        assert_eq!(locators, vec!["three", "two", "one"]);

        let latest = history.recent(1).unwrap();
        assert_eq!(latest[0].locator, "three");
    }

    #[test]
    fn test_recent_rejects_zero_limit() {
        let history = AnalysisHistory::new();
        assert!(history.recent(0).is_err());
        assert!(history.recent(3).unwrap().is_empty());
    }

    #[test]
    fn test_for_platform_filters() {
        let mut history = AnalysisHistory::new();
        history.append(entry("youtube", "a"));
        history.append(entry("reddit", "b"));
        history.append(entry("youtube", "c"));
        assert_eq!(history.for_platform("youtube").count(), 2);
        assert_eq!(history.for_platform("twitch").count(), 0);
    }

    #[test]
    fn test_entry_timestamp_serializes_as_iso8601() {
        let mut e = entry("youtube", "a");
        e.timestamp = "2024-03-01T12:30:00Z".parse().unwrap();
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["timestamp"], "2024-03-01T12:30:00Z");
        assert_eq!(json["stats"]["sentiment"]["positive"], 0);
    }
}
