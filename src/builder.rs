//! Batch construction: classify, resolve and assemble records.
//!
//! Comments are independent, so classification can fan out across rayon
//! workers. `collect` on an indexed parallel iterator keeps input order, which
//! is the batch order every later stage relies on.

use rayon::prelude::*;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, debug_span, warn};

use crate::classifier::Classifier;
use crate::core::{ClassificationRecord, Error, Result};
use crate::observability::{
    enter_guarded, extract_panic_message, increment_processed, set_comment_index, set_phase,
    set_progress, AnalysisPhase,
};
use crate::resolver::{resolve, ResolverThresholds};

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub thresholds: ResolverThresholds,
    pub parallel: bool,
}

/// A comment that was dropped from the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentFailure {
    /// Position in the submitted batch
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Resolved records in batch order
    pub records: Vec<Arc<ClassificationRecord>>,
    pub failures: Vec<CommentFailure>,
}

/// Classify and resolve every comment of a batch.
///
/// A failing comment is dropped and reported in `failures`; the rest of the
/// batch still completes. Fails with `InvalidInput` on an empty batch and with
/// `UpstreamFailure` when no comment could be resolved.
pub fn build_batch<C>(
    classifier: &C,
    comments: &[String],
    options: &BatchOptions,
) -> Result<BatchOutcome>
where
    C: Classifier + ?Sized,
{
    if comments.is_empty() {
        return Err(Error::invalid_input("batch contains no comments"));
    }

    let _span = debug_span!("build_batch", comments = comments.len()).entered();
    let _phase = set_phase(AnalysisPhase::Classification);
    set_progress(0, comments.len());

    let classify = |(index, raw): (usize, &String)| {
        let result = classify_one(classifier, index, raw, &options.thresholds);
        increment_processed();
        (index, result)
    };

    let results: Vec<(usize, Result<ClassificationRecord>)> = if options.parallel {
        comments.par_iter().enumerate().map(classify).collect()
    } else {
        comments.iter().enumerate().map(classify).collect()
    };

    let mut outcome = BatchOutcome::default();
    for (index, result) in results {
        match result {
            Ok(record) => outcome.records.push(Arc::new(record)),
            Err(e) => {
                warn!(index, error = %e, "Dropping comment from batch");
                outcome.failures.push(CommentFailure {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    if outcome.records.is_empty() {
        return Err(Error::upstream(
            format!("all {} comments failed classification", comments.len()),
            comments.len(),
        ));
    }

    debug!(
        resolved = outcome.records.len(),
        dropped = outcome.failures.len(),
        "Batch built"
    );
    Ok(outcome)
}

fn classify_one<C>(
    classifier: &C,
    index: usize,
    raw: &str,
    thresholds: &ResolverThresholds,
) -> Result<ClassificationRecord>
where
    C: Classifier + ?Sized,
{
    let _comment = set_comment_index(index);
    let text = raw.trim();
    if text.is_empty() {
        return Err(Error::invalid_input("comment text is empty"));
    }

    let verdicts = {
        let _guarded = enter_guarded();
        catch_unwind(AssertUnwindSafe(|| classifier.classify_pair(text)))
    }
    .map_err(|payload| {
        warn!(
            index,
            panic = %extract_panic_message(payload.as_ref()),
            "Classifier panicked"
        );
        Error::upstream("classifier panicked", 1)
    })??;

    resolve(text, &verdicts, thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Axis, ClassifierVerdict, EmotionLabel, SentimentLabel};

    /// Answers by keyword so tests can steer individual comments
    struct ScriptedClassifier;

    impl Classifier for ScriptedClassifier {
        fn classify(&self, text: &str, axis: Axis) -> Result<ClassifierVerdict> {
            if text.contains("offline") {
                return Err(Error::upstream("model offline", 1));
            }
            if text.contains("explode") {
                panic!("tensor shape mismatch");
            }
            if text.contains("weird") {
                return Ok(ClassifierVerdict::new("joy", 7.0));
            }
            Ok(match axis {
                Axis::Sentiment => ClassifierVerdict::new("4 stars", 0.9),
                Axis::Emotion => ClassifierVerdict::new("joy", 0.9),
            })
        }
    }

    fn batch(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn options(parallel: bool) -> BatchOptions {
        BatchOptions {
            parallel,
            ..Default::default()
        }
    }

    #[test]
    fn test_preserves_batch_order_in_parallel() {
        let comments: Vec<String> = (0..64).map(|i| format!("comment number {}", i)).collect();
        let outcome = build_batch(&ScriptedClassifier, &comments, &options(true)).unwrap();
        let texts: Vec<&str> = outcome.records.iter().map(|r| r.text.as_str()).collect();
        let expected: Vec<&str> = comments.iter().map(String::as_str).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn test_no_deduplication() {
        let outcome =
            build_batch(&ScriptedClassifier, &batch(&["same", "same"]), &options(false)).unwrap();
        assert_eq!(outcome.records.len(), 2);
    }

    #[test]
    fn test_trims_comments() {
        let outcome =
            build_batch(&ScriptedClassifier, &batch(&["  padded \n"]), &options(false)).unwrap();
        assert_eq!(outcome.records[0].text, "padded");
        assert_eq!(outcome.records[0].sentiment.label, SentimentLabel::Positive);
        assert_eq!(outcome.records[0].emotion.label, EmotionLabel::Joy);
    }

    #[test]
    fn test_failures_are_isolated() {
        let comments = batch(&["fine", "offline now", "   ", "explode", "weird", "also fine"]);
        let outcome = build_batch(&ScriptedClassifier, &comments, &options(true)).unwrap();

        let texts: Vec<&str> = outcome.records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["fine", "also fine"]);

        let failed: Vec<usize> = outcome.failures.iter().map(|f| f.index).collect();
        assert_eq!(failed, vec![1, 2, 3, 4]);
        assert_eq!(outcome.failures[2].reason, "Upstream failure: classifier panicked");
    }

    #[test]
    fn test_empty_batch_is_invalid() {
        let err = build_batch(&ScriptedClassifier, &[], &options(false)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_all_failed_is_batch_level_upstream_failure() {
        let comments = batch(&["offline", "offline too"]);
        let err = build_batch(&ScriptedClassifier, &comments, &options(false)).unwrap_err();
        match err {
            Error::UpstreamFailure { failed, .. } => assert_eq!(failed, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
