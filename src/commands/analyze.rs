use crate::classifier::PrescoredClassifier;
use crate::config::{self, AnalysisSettings, SentimapConfig};
use crate::core::Axis;
use crate::index::validate_limit;
use crate::io::output::{create_writer, LabelLookup, SessionReport};
use crate::observability::{set_phase, AnalysisPhase};
use crate::service::{AnalysisOutcome, AnalysisService};
use crate::source::{CommentSource, FileCommentSource};
use crate::store::AnalysisStore;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub struct AnalyzeConfig {
    pub comments: Vec<PathBuf>,
    pub verdicts: PathBuf,
    pub platform: String,
    pub locator: Option<String>,
    pub format: crate::cli::OutputFormat,
    pub output: Option<PathBuf>,
    pub filter: Option<LabelFilter>,
    pub history: Option<usize>,
    pub config: Option<PathBuf>,
    pub parallel: bool,
}

/// Label lookup requested on the latest analysis
pub struct LabelFilter {
    pub axis: String,
    pub label: String,
    pub limit: i64,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let settings = load_settings(config.config.as_deref(), config.parallel)?;
    let sample_size = settings.analysis().sample_size;

    let classifier = PrescoredClassifier::from_jsonl_file(&config.verdicts)
        .with_context(|| format!("Failed to load verdicts from {}", config.verdicts.display()))?;
    info!(verdicts = classifier.len(), "Loaded pre-scored verdicts");

    let service = AnalysisService::new(
        Arc::new(classifier),
        Arc::new(AnalysisStore::new()),
        settings,
    );
    let source = FileCommentSource::new();

    let mut session = SessionReport::default();
    for path in &config.comments {
        let outcome = analyze_file(&service, &source, path, &config)
            .with_context(|| format!("Failed to analyze {}", path.display()))?;
        session.analyses.push(outcome.report(sample_size));
    }

    if let Some(filter) = &config.filter {
        session.lookup = Some(run_lookup(&service, filter)?);
    }
    session.history = service.history(config.history)?;
    session.platform_stats = service.all_platform_stats();

    let _phase = set_phase(AnalysisPhase::OutputGeneration);
    let mut writer = create_writer(config.format.into(), config.output.as_deref())?;
    writer.write_session(&session)?;

    Ok(())
}

fn load_settings(path: Option<&Path>, parallel: bool) -> Result<SentimapConfig> {
    let mut settings = match path {
        Some(path) => config::load_config_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => config::load_config(),
    };
    if !parallel {
        settings.analysis = Some(AnalysisSettings {
            parallel: false,
            ..settings.analysis()
        });
    }
    Ok(settings)
}

fn analyze_file(
    service: &AnalysisService,
    source: &dyn CommentSource,
    path: &Path,
    config: &AnalyzeConfig,
) -> crate::core::Result<AnalysisOutcome> {
    let path_str = path.to_string_lossy().into_owned();
    let recorded = config.locator.as_deref().unwrap_or(path_str.as_str());
    service.analyze_source_as(source, &config.platform, &path_str, recorded, None)
}

fn run_lookup(service: &AnalysisService, filter: &LabelFilter) -> Result<LabelLookup> {
    let records = service.lookup(&filter.axis, &filter.label, filter.limit)?;
    let axis: Axis = filter.axis.parse()?;
    Ok(LabelLookup {
        axis,
        label: filter.label.trim().to_lowercase(),
        limit: validate_limit(filter.limit)?,
        records,
    })
}
