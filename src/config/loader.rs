use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::core::{AnalysisSettings, HistoryConfig, SentimapConfig};
use crate::core::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".sentimap.toml";

/// Parse config from a TOML string, replacing invalid sections with defaults
pub fn parse_and_validate_config(contents: &str) -> Result<SentimapConfig> {
    let mut config = toml::from_str::<SentimapConfig>(contents)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e)))?;

    for problem in config.validate() {
        warn!("Invalid configuration: {}. Using defaults for that section.", problem);
    }
    if let Some(thresholds) = &config.thresholds {
        if thresholds.validate().is_err() {
            config.thresholds = None;
        }
    }
    if matches!(&config.history, Some(HistoryConfig { default_limit: 0 })) {
        config.history = None;
    }
    if matches!(&config.analysis, Some(AnalysisSettings { max_comments: 0, .. })) {
        config.analysis = None;
    }

    Ok(config)
}

/// Load a config file the user pointed at explicitly. Errors are fatal.
pub fn load_config_from_path(path: &Path) -> Result<SentimapConfig> {
    let contents = fs::read_to_string(path)?;
    let config = parse_and_validate_config(&contents)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<SentimapConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read config file {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Directories from `start` upward, at most `max_depth` of them
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.sentimap.toml`
pub fn load_config_from(start: PathBuf) -> SentimapConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            SentimapConfig::default()
        })
}

pub fn load_config() -> SentimapConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            warn!("Failed to get current directory: {}. Using default config.", e);
            SentimapConfig::default()
        }
    }
}
