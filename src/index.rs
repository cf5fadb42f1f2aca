//! Label index over one batch.
//!
//! Every label of both axes has a bucket, so a lookup by any valid label
//! finds a (possibly empty) sequence rather than a missing key. Buckets share
//! the batch's records instead of copying them.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::{Axis, ClassificationRecord, EmotionLabel, Error, Label, Result, SentimentLabel};

pub type Bucket = Vec<Arc<ClassificationRecord>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategorizedIndex {
    pub sentiment: BTreeMap<SentimentLabel, Bucket>,
    pub emotion: BTreeMap<EmotionLabel, Bucket>,
}

fn empty_buckets<L: Label>() -> BTreeMap<L, Bucket> {
    L::ALL.iter().map(|label| (*label, Vec::new())).collect()
}

impl CategorizedIndex {
    /// Partition records by final label, keeping batch order inside each bucket
    pub fn build(records: &[Arc<ClassificationRecord>]) -> Self {
        let mut sentiment = empty_buckets::<SentimentLabel>();
        let mut emotion = empty_buckets::<EmotionLabel>();

        for record in records {
            sentiment
                .entry(record.sentiment.label)
                .or_default()
                .push(Arc::clone(record));
            emotion
                .entry(record.emotion.label)
                .or_default()
                .push(Arc::clone(record));
        }

        Self { sentiment, emotion }
    }

    /// Full bucket for a label name, or `None` when the name is not a label of the axis
    pub fn bucket(&self, axis: Axis, label: &str) -> Option<&Bucket> {
        match axis {
            Axis::Sentiment => SentimentLabel::parse(label).and_then(|l| self.sentiment.get(&l)),
            Axis::Emotion => EmotionLabel::parse(label).and_then(|l| self.emotion.get(&l)),
        }
    }

    /// First `limit` records carrying `label` on `axis`.
    ///
    /// Unrecognized labels yield an empty result; a non-positive limit is
    /// rejected.
    pub fn lookup(
        &self,
        axis: Axis,
        label: &str,
        limit: i64,
    ) -> Result<Vec<Arc<ClassificationRecord>>> {
        let limit = validate_limit(limit)?;
        Ok(self
            .bucket(axis, label)
            .map(|bucket| bucket.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

pub(crate) fn validate_limit(limit: i64) -> Result<usize> {
    if limit <= 0 {
        return Err(Error::invalid_input(format!(
            "limit must be positive, got {}",
            limit
        )));
    }
    Ok(usize::try_from(limit).unwrap_or(usize::MAX))
}
