use serde::Serialize;
use std::collections::BTreeMap;

use super::counts::{normalize, zeroed, LabelCounts, Percentages};
use super::history::AnalysisEntry;
use crate::core::{EmotionLabel, Label, SentimentLabel};

/// Counters folded from every history entry of one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformRollup {
    pub platform: String,
    pub total_analyses: u64,
    pub total_comments: u64,
    pub sentiment: LabelCounts<SentimentLabel>,
    pub emotion: LabelCounts<EmotionLabel>,
}

/// Rollup with label counters turned into percentages of `total_comments`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformStats {
    pub platform: String,
    pub total_analyses: u64,
    pub total_comments: u64,
    pub sentiment: Percentages<SentimentLabel>,
    pub emotion: Percentages<EmotionLabel>,
}

/// A value of the flattened platform view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Count(u64),
    Percent(f64),
}

impl PlatformRollup {
    pub fn empty(platform: &str) -> Self {
        Self {
            platform: platform.to_string(),
            total_analyses: 0,
            total_comments: 0,
            sentiment: zeroed(),
            emotion: zeroed(),
        }
    }

    /// Fold the entries belonging to `platform`; others are skipped
    pub fn fold<'a>(platform: &str, entries: impl IntoIterator<Item = &'a AnalysisEntry>) -> Self {
        entries
            .into_iter()
            .filter(|entry| entry.platform == platform)
            .fold(Self::empty(platform), |mut rollup, entry| {
                rollup.total_analyses += 1;
                rollup.total_comments += entry.stats.total_comments;
                add_counts(&mut rollup.sentiment, &entry.stats.sentiment);
                add_counts(&mut rollup.emotion, &entry.stats.emotion);
                rollup
            })
    }

    pub fn percentages(&self) -> PlatformStats {
        PlatformStats {
            platform: self.platform.clone(),
            total_analyses: self.total_analyses,
            total_comments: self.total_comments,
            sentiment: normalize(&self.sentiment, self.total_comments),
            emotion: normalize(&self.emotion, self.total_comments),
        }
    }
}

fn add_counts<L: Label>(into: &mut LabelCounts<L>, from: &LabelCounts<L>) {
    for (label, count) in from {
        *into.entry(*label).or_insert(0) += count;
    }
}

impl PlatformStats {
    /// Flat view keyed `total_analyses`, `total_comments`, `sentiment_<label>`, `emotion_<label>`
    pub fn flatten(&self) -> BTreeMap<String, StatValue> {
        let mut flat = BTreeMap::new();
        flat.insert(
            "total_analyses".to_string(),
            StatValue::Count(self.total_analyses),
        );
        flat.insert(
            "total_comments".to_string(),
            StatValue::Count(self.total_comments),
        );
        for (label, value) in &self.sentiment {
            flat.insert(format!("sentiment_{}", label.as_str()), StatValue::Percent(*value));
        }
        for (label, value) in &self.emotion {
            flat.insert(format!("emotion_{}", label.as_str()), StatValue::Percent(*value));
        }
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::counts::BatchStats;
    use chrono::Utc;

    fn entry(platform: &str, total: u64, positive: u64, joy: u64) -> AnalysisEntry {
        let mut stats = BatchStats {
            total_comments: total,
            ..Default::default()
        };
        stats.sentiment.insert(SentimentLabel::Positive, positive);
        stats.sentiment.insert(SentimentLabel::Neutral, total - positive);
        stats.emotion.insert(EmotionLabel::Joy, joy);
        stats.emotion.insert(EmotionLabel::Neutral, total - joy);
        AnalysisEntry {
            platform: platform.to_string(),
            locator: "loc".to_string(),
            timestamp: Utc::now(),
            stats,
        }
    }

    #[test]
    fn test_fold_sums_matching_platform_only() {
        let entries = vec![
            entry("youtube", 10, 3, 1),
            entry("reddit", 7, 7, 7),
            entry("youtube", 20, 8, 4),
        ];
        let rollup = PlatformRollup::fold("youtube", &entries);
        assert_eq!(rollup.total_analyses, 2);
        assert_eq!(rollup.total_comments, 30);
        assert_eq!(rollup.sentiment[&SentimentLabel::Positive], 11);
        assert_eq!(rollup.emotion[&EmotionLabel::Joy], 5);
    }

    #[test]
    fn test_percentages_over_platform_total() {
        let entries = vec![entry("youtube", 10, 3, 1), entry("youtube", 20, 8, 4)];
        let stats = PlatformRollup::fold("youtube", &entries).percentages();
        assert_eq!(stats.sentiment[&SentimentLabel::Positive], 36.7);
        assert_eq!(stats.emotion[&EmotionLabel::Joy], 16.7);
        assert_eq!(stats.total_comments, 30);
    }

    #[test]
    fn test_flatten_keeps_counts_raw() {
        let entries = vec![entry("youtube", 10, 3, 1), entry("youtube", 20, 8, 4)];
        let flat = PlatformRollup::fold("youtube", &entries).percentages().flatten();
        assert_eq!(flat["total_analyses"], StatValue::Count(2));
        assert_eq!(flat["total_comments"], StatValue::Count(30));
        assert_eq!(flat["sentiment_positive"], StatValue::Percent(36.7));
        assert_eq!(flat["emotion_surprise"], StatValue::Percent(0.0));
        assert_eq!(flat.len(), 2 + 3 + 7);
    }

    #[test]
    fn test_zero_comments_yield_zero_percentages() {
        let entries = vec![entry("reddit", 0, 0, 0)];
        let stats = PlatformRollup::fold("reddit", &entries).percentages();
        assert_eq!(stats.total_analyses, 1);
        assert!(stats.sentiment.values().all(|v| *v == 0.0));
    }

    #[test]
    fn test_stat_value_serializes_untagged() {
        assert_eq!(serde_json::to_string(&StatValue::Count(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&StatValue::Percent(36.7)).unwrap(), "36.7");
    }
}
