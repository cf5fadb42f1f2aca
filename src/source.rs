//! Comment source seam.
//!
//! Platform fetchers (video comments, forum threads) are external. This crate
//! only needs an ordered list of raw comment strings for a locator.

use std::path::Path;

use crate::core::{Error, Result};

pub trait CommentSource: Send + Sync {
    /// Fetch up to `max` raw comments for `locator` on `platform`, in source order.
    ///
    /// May return fewer than `max`, or none.
    fn fetch(&self, platform: &str, locator: &str, max: usize) -> Result<Vec<String>>;
}

/// Reads comments from a local text file, one comment per non-blank line.
///
/// The locator is the file path; the platform is only used for logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCommentSource;

impl FileCommentSource {
    pub fn new() -> Self {
        Self
    }
}

impl CommentSource for FileCommentSource {
    fn fetch(&self, platform: &str, locator: &str, max: usize) -> Result<Vec<String>> {
        let contents = std::fs::read_to_string(Path::new(locator)).map_err(|e| {
            Error::upstream(format!("cannot read {} comments from {}: {}", platform, locator, e), 0)
        })?;
        Ok(split_comments(&contents, max))
    }
}

/// Non-blank lines, in order, capped at `max`
pub fn split_comments(contents: &str, max: usize) -> Vec<String> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}
