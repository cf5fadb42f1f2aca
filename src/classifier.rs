//! Classifier seam.
//!
//! The models themselves live outside this crate. Anything that can answer
//! "given text, return a verdict for this axis" plugs in here.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::core::{Axis, ClassifierVerdict, Error, Result, VerdictPair};

/// External text classifier
pub trait Classifier: Send + Sync {
    /// Classify `text` on one axis
    fn classify(&self, text: &str, axis: Axis) -> Result<ClassifierVerdict>;

    /// Classify `text` on both axes
    fn classify_pair(&self, text: &str) -> Result<VerdictPair> {
        Ok(VerdictPair {
            sentiment: self.classify(text, Axis::Sentiment)?,
            emotion: self.classify(text, Axis::Emotion)?,
        })
    }
}

/// One line of a pre-scored verdict file
#[derive(Debug, Clone, Deserialize)]
struct PrescoredLine {
    text: String,
    sentiment: ClassifierVerdict,
    emotion: ClassifierVerdict,
}

/// Classifier backed by verdicts computed ahead of time.
///
/// Reads JSON Lines where every line carries a text and one verdict per axis.
/// Lookups use the trimmed text; a text without a stored verdict is an error.
#[derive(Debug, Clone, Default)]
pub struct PrescoredClassifier {
    verdicts: HashMap<String, VerdictPair>,
    order: Vec<String>,
}

impl PrescoredClassifier {
    pub fn from_jsonl_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_jsonl(&contents)
    }

    pub fn from_jsonl(contents: &str) -> Result<Self> {
        let mut classifier = Self::default();
        for (number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let parsed: PrescoredLine = serde_json::from_str(line).map_err(|e| {
                Error::invalid_input(format!("verdict line {}: {}", number + 1, e))
            })?;
            classifier.insert(
                &parsed.text,
                VerdictPair {
                    sentiment: parsed.sentiment,
                    emotion: parsed.emotion,
                },
            );
        }
        Ok(classifier)
    }

    /// Store (or replace) the verdicts for a text
    pub fn insert(&mut self, text: &str, verdicts: VerdictPair) {
        let key = text.trim().to_string();
        if self.verdicts.insert(key.clone(), verdicts).is_none() {
            self.order.push(key);
        }
    }

    /// Texts in first-seen order
    pub fn texts(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Classifier for PrescoredClassifier {
    fn classify(&self, text: &str, axis: Axis) -> Result<ClassifierVerdict> {
        let pair = self.verdicts.get(text.trim()).ok_or_else(|| {
            Error::upstream(format!("no {} verdict for comment", axis), 1)
        })?;
        Ok(match axis {
            Axis::Sentiment => pair.sentiment.clone(),
            Axis::Emotion => pair.emotion.clone(),
        })
    }
}
