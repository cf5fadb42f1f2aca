//! Per-analysis summary handed back to callers after a run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::builder::CommentFailure;
use crate::core::{ClassificationRecord, EmotionLabel, Label, SentimentLabel};
use crate::resolver::ConfidenceBand;
use crate::stats::{AnalysisEntry, Percentages};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledScore<L> {
    pub label: L,
    pub score: f64,
    pub confidence: ConfidenceBand,
}

impl<L: Label> LabeledScore<L> {
    fn new(label: L, score: f64) -> Self {
        Self {
            label,
            score,
            confidence: ConfidenceBand::from_score(score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleComment {
    pub text: String,
    pub sentiment: LabeledScore<SentimentLabel>,
    pub emotion: LabeledScore<EmotionLabel>,
}

impl From<&ClassificationRecord> for SampleComment {
    fn from(record: &ClassificationRecord) -> Self {
        Self {
            text: record.text.clone(),
            sentiment: LabeledScore::new(record.sentiment.label, record.sentiment.score),
            emotion: LabeledScore::new(record.emotion.label, record.emotion.score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: usize,
    /// Platform name for display, e.g. "Youtube"
    pub platform: String,
    pub locator: String,
    pub timestamp: DateTime<Utc>,
    pub comments_analyzed: u64,
    pub comments_skipped: usize,
    pub sentiment_stats: Percentages<SentimentLabel>,
    pub emotion_stats: Percentages<EmotionLabel>,
    pub sample_comments: Vec<SampleComment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<CommentFailure>,
}

impl AnalysisReport {
    pub fn new<'a>(
        analysis_id: usize,
        entry: &AnalysisEntry,
        records: impl IntoIterator<Item = &'a ClassificationRecord>,
        failures: &[CommentFailure],
        sample_size: usize,
    ) -> Self {
        Self {
            analysis_id,
            platform: capitalize(&entry.platform),
            locator: entry.locator.clone(),
            timestamp: entry.timestamp,
            comments_analyzed: entry.stats.total_comments,
            comments_skipped: failures.len(),
            sentiment_stats: entry.stats.sentiment_percentages(),
            emotion_stats: entry.stats.emotion_percentages(),
            sample_comments: records
                .into_iter()
                .take(sample_size)
                .map(SampleComment::from)
                .collect(),
            skipped: failures.to_vec(),
        }
    }
}

/// Upper-case the first character, lower-case the rest
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
