// Export modules for library usage
pub mod builder;
pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod index;
pub mod io;
pub mod observability;
pub mod report;
pub mod resolver;
pub mod service;
pub mod source;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    Axis, AxisResult, ClassificationRecord, ClassifierVerdict, EmotionLabel, Error, Label,
    Result, SentimentLabel, VerdictPair,
};

pub use crate::builder::{build_batch, BatchOptions, BatchOutcome, CommentFailure};
pub use crate::classifier::{Classifier, PrescoredClassifier};
pub use crate::config::{load_config, SentimapConfig};
pub use crate::index::CategorizedIndex;
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::report::AnalysisReport;
pub use crate::resolver::{resolve, ResolverThresholds};
pub use crate::service::{AnalysisOutcome, AnalysisService};
pub use crate::source::{CommentSource, FileCommentSource};
pub use crate::stats::{AnalysisEntry, BatchStats, PlatformRollup, PlatformStats, StatValue};
pub use crate::store::AnalysisStore;
