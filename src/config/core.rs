use serde::{Deserialize, Serialize};

use crate::resolver::ResolverThresholds;

/// Root configuration structure for sentimap
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SentimapConfig {
    /// Confidence floors used by the resolver
    #[serde(default)]
    pub thresholds: Option<ResolverThresholds>,

    /// History retrieval configuration
    #[serde(default)]
    pub history: Option<HistoryConfig>,

    /// Batch analysis settings
    #[serde(default)]
    pub analysis: Option<AnalysisSettings>,

    /// Accepted source platforms
    #[serde(default)]
    pub platforms: Option<PlatformsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    /// Entries returned when the caller gives no limit
    #[serde(default = "default_history_limit")]
    pub default_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_history_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSettings {
    /// Classify comments of a batch on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Upper bound on comments pulled from a source per analysis
    #[serde(default = "default_max_comments")]
    pub max_comments: usize,

    /// Records shown as samples in an analysis report
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            max_comments: default_max_comments(),
            sample_size: default_sample_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformsConfig {
    /// Lower-case platform keys; empty accepts any platform
    #[serde(default = "default_supported_platforms")]
    pub supported: Vec<String>,
}

impl Default for PlatformsConfig {
    fn default() -> Self {
        Self {
            supported: default_supported_platforms(),
        }
    }
}

pub fn default_history_limit() -> usize {
    5
}

pub fn default_parallel() -> bool {
    true
}

pub fn default_max_comments() -> usize {
    100
}

pub fn default_sample_size() -> usize {
    10
}

pub fn default_supported_platforms() -> Vec<String> {
    vec!["youtube".to_string(), "reddit".to_string()]
}

impl SentimapConfig {
    pub fn thresholds(&self) -> ResolverThresholds {
        self.thresholds.unwrap_or_default()
    }

    pub fn history(&self) -> HistoryConfig {
        self.history.clone().unwrap_or_default()
    }

    pub fn analysis(&self) -> AnalysisSettings {
        self.analysis.clone().unwrap_or_default()
    }

    /// Supported platforms, normalized to lower case
    pub fn supported_platforms(&self) -> Vec<String> {
        self.platforms
            .clone()
            .unwrap_or_default()
            .supported
            .iter()
            .map(|p| p.trim().to_lowercase())
            .collect()
    }

    /// Check every section, returning one message per problem
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Some(thresholds) = &self.thresholds {
            if let Err(e) = thresholds.validate() {
                problems.push(format!("[thresholds] {}", e));
            }
        }
        if let Some(history) = &self.history {
            if history.default_limit == 0 {
                problems.push("[history] default_limit must be positive".to_string());
            }
        }
        if let Some(analysis) = &self.analysis {
            if analysis.max_comments == 0 {
                problems.push("[analysis] max_comments must be positive".to_string());
            }
        }
        problems
    }
}
