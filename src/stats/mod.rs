//! Label statistics: per-batch counts, the analysis history and
//! per-platform rollups over that history.

pub mod counts;
pub mod history;
pub mod rollup;

pub use counts::{count_labels, normalize, percent, BatchStats, LabelCounts, Percentages};
pub use history::{AnalysisEntry, AnalysisHistory};
pub use rollup::{PlatformRollup, PlatformStats, StatValue};
