use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::{round_to, ClassificationRecord, EmotionLabel, Label, SentimentLabel};

/// Occurrences per label. Every label of the axis is present.
pub type LabelCounts<L> = BTreeMap<L, u64>;

/// Percentages per key, one decimal place
pub type Percentages<K> = BTreeMap<K, f64>;

/// Zeroed counter for every label of an axis
pub fn zeroed<L: Label>() -> LabelCounts<L> {
    L::ALL.iter().map(|label| (*label, 0)).collect()
}

pub fn count_labels<L: Label>(labels: impl IntoIterator<Item = L>) -> LabelCounts<L> {
    let mut counts = zeroed::<L>();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

/// `round(count / total * 100, 1)`, or 0.0 when `total` is zero
pub fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(count as f64 / total as f64 * 100.0, 1)
}

/// Convert counts to percentages of `total`; every key maps to 0.0 when `total` is zero
pub fn normalize<K: Ord + Clone>(counts: &BTreeMap<K, u64>, total: u64) -> Percentages<K> {
    counts
        .iter()
        .map(|(key, count)| (key.clone(), percent(*count, total)))
        .collect()
}

/// Label counts for one analyzed batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_comments: u64,
    pub sentiment: LabelCounts<SentimentLabel>,
    pub emotion: LabelCounts<EmotionLabel>,
}

impl Default for BatchStats {
    fn default() -> Self {
        Self {
            total_comments: 0,
            sentiment: zeroed(),
            emotion: zeroed(),
        }
    }
}

impl BatchStats {
    pub fn from_records(records: &[Arc<ClassificationRecord>]) -> Self {
        Self {
            total_comments: records.len() as u64,
            sentiment: count_labels(records.iter().map(|r| r.sentiment.label)),
            emotion: count_labels(records.iter().map(|r| r.emotion.label)),
        }
    }

    pub fn sentiment_percentages(&self) -> Percentages<SentimentLabel> {
        normalize(&self.sentiment, self.total_comments)
    }

    pub fn emotion_percentages(&self) -> Percentages<EmotionLabel> {
        normalize(&self.emotion, self.total_comments)
    }
}
