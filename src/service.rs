//! The operations exposed to the surrounding service layer.
//!
//! `AnalysisService` wires the classifier, the batch builder, the index and
//! the statistics together and owns nothing global: the store is injected so
//! several services (or request handlers) can share one history.

use chrono::Utc;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, info, info_span};

use crate::builder::{build_batch, BatchOptions, CommentFailure};
use crate::classifier::Classifier;
use crate::config::SentimapConfig;
use crate::core::{Axis, ClassificationRecord, Error, Result};
use crate::index::{validate_limit, CategorizedIndex};
use crate::observability::{
    enter_guarded, extract_panic_message, get_current_context, set_phase, set_platform,
    AnalysisPhase,
};
use crate::report::AnalysisReport;
use crate::source::CommentSource;
use crate::stats::{AnalysisEntry, BatchStats, StatValue};
use crate::store::AnalysisStore;

/// Everything produced by one analysis call
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analysis_id: usize,
    pub records: Vec<Arc<ClassificationRecord>>,
    pub index: Arc<CategorizedIndex>,
    pub entry: AnalysisEntry,
    /// Comments dropped from the batch
    pub failures: Vec<CommentFailure>,
}

impl AnalysisOutcome {
    pub fn report(&self, sample_size: usize) -> AnalysisReport {
        AnalysisReport::new(
            self.analysis_id,
            &self.entry,
            self.records.iter().map(|r| r.as_ref()),
            &self.failures,
            sample_size,
        )
    }
}

pub struct AnalysisService {
    classifier: Arc<dyn Classifier>,
    store: Arc<AnalysisStore>,
    config: SentimapConfig,
}

impl AnalysisService {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        store: Arc<AnalysisStore>,
        config: SentimapConfig,
    ) -> Self {
        Self {
            classifier,
            store,
            config,
        }
    }

    pub fn store(&self) -> &Arc<AnalysisStore> {
        &self.store
    }

    pub fn config(&self) -> &SentimapConfig {
        &self.config
    }

    /// Classify a batch, index it, and record it in the history.
    pub fn run_analysis(
        &self,
        batch: &[String],
        platform: &str,
        locator: &str,
    ) -> Result<AnalysisOutcome> {
        let platform = self.normalize_platform(platform)?;
        if batch.is_empty() {
            return Err(Error::invalid_input("batch contains no comments"));
        }

        let _span =
            info_span!("run_analysis", platform = %platform, comments = batch.len()).entered();
        let _platform = set_platform(platform.as_str());

        let options = BatchOptions {
            thresholds: self.config.thresholds(),
            parallel: self.config.analysis().parallel,
        };

        let pipeline = {
            let _guarded = enter_guarded();
            catch_unwind(AssertUnwindSafe(|| {
                let outcome = build_batch(self.classifier.as_ref(), batch, &options)?;

                let index = {
                    let _phase = set_phase(AnalysisPhase::Indexing);
                    Arc::new(CategorizedIndex::build(&outcome.records))
                };

                let _phase = set_phase(AnalysisPhase::Aggregation);
                let entry = AnalysisEntry {
                    platform: platform.clone(),
                    locator: locator.trim().to_string(),
                    timestamp: Utc::now(),
                    stats: BatchStats::from_records(&outcome.records),
                };
                Ok::<_, Error>((outcome, index, entry))
            }))
            .map_err(|payload| (payload, get_current_context()))
        };

        let (outcome, index, entry) = match pipeline {
            Ok(result) => result?,
            Err((payload, context)) => {
                error!(
                    platform = %platform,
                    locator,
                    phase = ?context.phase,
                    comment = ?context.comment_index,
                    panic = %extract_panic_message(payload.as_ref()),
                    "Analysis aborted by an unexpected fault"
                );
                return Err(Error::Internal("analysis failed unexpectedly".to_string()));
            }
        };

        let analysis_id = self.store.commit(Arc::clone(&index), entry.clone());
        info!(
            analysis_id,
            analyzed = outcome.records.len(),
            skipped = outcome.failures.len(),
            "Analysis recorded"
        );

        Ok(AnalysisOutcome {
            analysis_id,
            records: outcome.records,
            index,
            entry,
            failures: outcome.failures,
        })
    }

    /// Fetch comments from `source` and analyze them.
    ///
    /// `max` defaults to the configured `max_comments`.
    pub fn analyze_source(
        &self,
        source: &dyn CommentSource,
        platform: &str,
        locator: &str,
        max: Option<usize>,
    ) -> Result<AnalysisOutcome> {
        self.analyze_source_as(source, platform, locator, locator, max)
    }

    /// Fetch from `fetch_locator` but record `recorded_locator` in the history.
    ///
    /// The platform and `max` are validated before the source is touched.
    pub fn analyze_source_as(
        &self,
        source: &dyn CommentSource,
        platform: &str,
        fetch_locator: &str,
        recorded_locator: &str,
        max: Option<usize>,
    ) -> Result<AnalysisOutcome> {
        let platform = self.normalize_platform(platform)?;
        let max = max.unwrap_or(self.config.analysis().max_comments);
        if max == 0 {
            return Err(Error::invalid_input("max comments must be positive"));
        }

        let comments = {
            let _phase = set_phase(AnalysisPhase::Fetching);
            source.fetch(&platform, fetch_locator, max).map_err(|e| match e {
                Error::UpstreamFailure { .. } => e,
                other => Error::upstream(format!("comment fetch failed: {}", other), 0),
            })?
        };

        if comments.is_empty() {
            return Err(Error::no_data(format!(
                "no comments found for {} at {}",
                platform, fetch_locator
            )));
        }

        self.run_analysis(&comments, &platform, recorded_locator)
    }

    /// First `limit` records of the latest analysis carrying `label` on `axis`
    pub fn lookup(
        &self,
        axis: &str,
        label: &str,
        limit: i64,
    ) -> Result<Vec<Arc<ClassificationRecord>>> {
        validate_limit(limit)?;
        let axis: Axis = axis.parse()?;
        let index = self
            .store
            .current_index()
            .ok_or_else(|| Error::no_data("no analysis has been run yet"))?;
        index.lookup(axis, label, limit)
    }

    /// Most recent history entries, newest first
    pub fn history(&self, limit: Option<usize>) -> Result<Vec<AnalysisEntry>> {
        let limit = limit.unwrap_or(self.config.history().default_limit);
        self.store.recent(limit)
    }

    /// Flattened rollup for one platform
    pub fn platform_stats(&self, platform: &str) -> Result<BTreeMap<String, StatValue>> {
        let platform = platform.trim().to_lowercase();
        if platform.is_empty() {
            return Err(Error::invalid_input("platform is empty"));
        }
        let rollup = self.store.rollup(&platform);
        if rollup.total_analyses == 0 {
            return Err(Error::no_data(format!(
                "no analyses recorded for platform '{}'",
                platform
            )));
        }
        Ok(rollup.percentages().flatten())
    }

    /// Flattened rollups for every supported platform and every platform seen so far.
    ///
    /// Platforms without analyses report zeroed values.
    pub fn all_platform_stats(&self) -> BTreeMap<String, BTreeMap<String, StatValue>> {
        let mut platforms = self.store.platforms();
        platforms.extend(self.config.supported_platforms());
        platforms
            .into_iter()
            .map(|platform| {
                let flat = self.store.rollup(&platform).percentages().flatten();
                (platform, flat)
            })
            .collect()
    }

    fn normalize_platform(&self, platform: &str) -> Result<String> {
        let platform = platform.trim().to_lowercase();
        if platform.is_empty() {
            return Err(Error::invalid_input("platform is empty"));
        }
        let supported = self.config.supported_platforms();
        if !supported.is_empty() && !supported.contains(&platform) {
            return Err(Error::invalid_input(format!(
                "unsupported platform '{}'",
                platform
            )));
        }
        Ok(platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClassifierVerdict, EmotionLabel, SentimentLabel};

    struct FixedClassifier;

    impl Classifier for FixedClassifier {
        fn classify(&self, _text: &str, axis: Axis) -> Result<ClassifierVerdict> {
            Ok(match axis {
                Axis::Sentiment => ClassifierVerdict::new("5 stars", 0.9),
                Axis::Emotion => ClassifierVerdict::new("joy", 0.9),
            })
        }
    }

    struct TimeoutClassifier;

    impl Classifier for TimeoutClassifier {
        fn classify(&self, _text: &str, _axis: Axis) -> Result<ClassifierVerdict> {
            Err(Error::upstream("timeout", 1))
        }
    }

    /// Counts fetches and serves a fixed list
    struct CountingSource {
        comments: Vec<String>,
        fetches: std::sync::atomic::AtomicUsize,
    }

    impl CountingSource {
        fn new(comments: &[&str]) -> Self {
            Self {
                comments: comments.iter().map(|s| s.to_string()).collect(),
                fetches: std::sync::atomic::AtomicUsize::new(0),
            }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    impl CommentSource for CountingSource {
        fn fetch(&self, _platform: &str, _locator: &str, max: usize) -> Result<Vec<String>> {
            self.fetches.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(self.comments.iter().take(max).cloned().collect())
        }
    }

    fn service() -> AnalysisService {
        AnalysisService::new(
            Arc::new(FixedClassifier),
            Arc::new(AnalysisStore::new()),
            SentimapConfig::default(),
        )
    }

    fn comments(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_run_analysis_records_entry() {
        let service = service();
        let outcome = service
            .run_analysis(&comments(&["great stuff", "this sucks"]), " YouTube ", "abc")
            .unwrap();

        assert_eq!(outcome.analysis_id, 0);
        assert_eq!(outcome.entry.platform, "youtube");
        assert_eq!(outcome.entry.stats.total_comments, 2);
        assert_eq!(outcome.entry.stats.sentiment[&SentimentLabel::Negative], 1);
        assert_eq!(outcome.entry.stats.emotion[&EmotionLabel::Joy], 2);
        assert_eq!(service.store().len(), 1);
    }

    #[test]
    fn test_rejects_unsupported_platform_before_work() {
        let service = service();
        let err = service
            .run_analysis(&comments(&["hi"]), "myspace", "x")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(service.store().is_empty());
    }

    #[test]
    fn test_rejects_empty_batch() {
        let err = service().run_analysis(&[], "youtube", "x").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_failed_batch_is_not_recorded() {
        let service = AnalysisService::new(
            Arc::new(TimeoutClassifier),
            Arc::new(AnalysisStore::new()),
            SentimapConfig::default(),
        );
        let err = service.run_analysis(&comments(&["a", "b"]), "reddit", "x").unwrap_err();
        assert!(matches!(err, Error::UpstreamFailure { failed: 2, .. }));
        assert!(service.store().is_empty());
        assert!(matches!(
            service.lookup("sentiment", "positive", 5),
            Err(Error::NoDataAvailable(_))
        ));
    }

    #[test]
    fn test_lookup_validation_order() {
        let service = service();
        assert!(matches!(service.lookup("sentiment", "positive", 0), Err(Error::InvalidInput(_))));
        assert!(matches!(service.lookup("tone", "positive", 5), Err(Error::InvalidInput(_))));
        assert!(matches!(service.lookup("emotion", "joy", 5), Err(Error::NoDataAvailable(_))));
    }

    #[test]
    fn test_platform_stats_without_data() {
        let service = service();
        assert!(matches!(service.platform_stats("reddit"), Err(Error::NoDataAvailable(_))));
        assert!(matches!(service.platform_stats("  "), Err(Error::InvalidInput(_))));

        let all = service.all_platform_stats();
        assert_eq!(all.len(), 2);
        assert_eq!(all["reddit"]["total_analyses"], StatValue::Count(0));
        assert_eq!(all["youtube"]["sentiment_positive"], StatValue::Percent(0.0));
    }

    #[test]
    fn test_history_uses_configured_default_limit() {
        let service = service();
        for i in 0..7 {
            service
                .run_analysis(&comments(&["ok"]), "reddit", &format!("thread-{}", i))
                .unwrap();
        }
        let history = service.history(None).unwrap();
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].locator, "thread-6");
        assert!(service.history(Some(0)).is_err());
    }

    #[test]
    fn test_analyze_source_rejects_platform_before_fetching() {
        let service = service();
        let source = CountingSource::new(&["great"]);

        let err = service
            .analyze_source_as(&source, "myspace", "comments.txt", "abc", None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(source.fetches(), 0);
    }

    #[test]
    fn test_analyze_source_records_separate_locator() {
        let service = service();
        let source = CountingSource::new(&["great", "sucks", "fine"]);

        let outcome = service
            .analyze_source_as(&source, "reddit", "thread.txt", "t3_abc", Some(2))
            .unwrap();
        assert_eq!(outcome.entry.locator, "t3_abc");
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(source.fetches(), 1);
    }

    #[test]
    fn test_analyze_source_empty_fetch_is_no_data() {
        let source = CountingSource::new(&[]);
        let err = service()
            .analyze_source(&source, "youtube", "abc", None)
            .unwrap_err();
        assert!(matches!(err, Error::NoDataAvailable(_)));
    }
}
