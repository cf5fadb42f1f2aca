//! Label resolution for classified comments.
//!
//! Turns a raw classifier verdict into the final label for each axis by
//! combining a fixed label table, a confidence floor and ordered keyword
//! overrides.
//!
//! ## Rule order
//!
//! The two axes deliberately apply their rules in different orders:
//!
//! - **Sentiment**: map label → confidence floor → keyword override.
//!   A keyword match always wins, even on a low-confidence verdict.
//! - **Emotion**: map label → key override → confidence floor.
//!   A low-confidence verdict is Neutral even when an override key matched.
//!
//! - **rules.rs**: the ordered keyword and override tables
//! - **confidence.rs**: display banding of scores

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    round_to, AxisResult, ClassificationRecord, ClassifierVerdict, EmotionLabel, Error, Result,
    SentimentLabel, VerdictPair,
};

pub mod confidence;
pub mod rules;

pub use confidence::ConfidenceBand;

/// Decimal places kept on record scores
const SCORE_PLACES: i32 = 4;

/// Confidence floors below which a verdict is forced to Neutral
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolverThresholds {
    #[serde(default = "default_sentiment_floor")]
    pub sentiment_floor: f64,

    #[serde(default = "default_emotion_floor")]
    pub emotion_floor: f64,
}

pub fn default_sentiment_floor() -> f64 {
    0.4
}

pub fn default_emotion_floor() -> f64 {
    0.5
}

impl Default for ResolverThresholds {
    fn default() -> Self {
        Self {
            sentiment_floor: default_sentiment_floor(),
            emotion_floor: default_emotion_floor(),
        }
    }
}

impl ResolverThresholds {
    /// Check that both floors are probabilities
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, value) in [
            ("sentiment_floor", self.sentiment_floor),
            ("emotion_floor", self.emotion_floor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within [0, 1], got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Resolve both axes of one comment into a record.
///
/// The text is trimmed first. Resolution is pure: the same text and verdicts
/// always produce an identical record.
pub fn resolve(
    text: &str,
    verdicts: &VerdictPair,
    thresholds: &ResolverThresholds,
) -> Result<ClassificationRecord> {
    let text = text.trim();
    validate_text(text)?;

    Ok(ClassificationRecord {
        text: text.to_string(),
        sentiment: resolve_sentiment(text, &verdicts.sentiment, thresholds)?,
        emotion: resolve_emotion(text, &verdicts.emotion, thresholds)?,
    })
}

pub fn resolve_sentiment(
    text: &str,
    verdict: &ClassifierVerdict,
    thresholds: &ResolverThresholds,
) -> Result<AxisResult<SentimentLabel>> {
    validate_score(verdict.score)?;

    let original_label = SentimentLabel::from_classifier(&verdict.label);
    let mut label = if verdict.score < thresholds.sentiment_floor {
        SentimentLabel::Neutral
    } else {
        original_label
    };

    if let Some((keyword_label, keyword)) = rules::first_keyword_match(&text.to_lowercase()) {
        debug!(keyword, label = %keyword_label, "Sentiment keyword override");
        label = keyword_label;
    }

    Ok(AxisResult {
        label,
        score: round_to(verdict.score, SCORE_PLACES),
        original_label,
    })
}

pub fn resolve_emotion(
    text: &str,
    verdict: &ClassifierVerdict,
    thresholds: &ResolverThresholds,
) -> Result<AxisResult<EmotionLabel>> {
    validate_score(verdict.score)?;

    let original_label = EmotionLabel::from_classifier(&verdict.label);
    let mut label = original_label;

    if let Some(rule) = rules::first_emotion_override(text, &text.to_lowercase()) {
        debug!(key = rule.key, label = %rule.emotion, "Emotion key override");
        label = rule.emotion;
    }

    // Applied last, so it can discard the override above
    if verdict.score < thresholds.emotion_floor {
        label = EmotionLabel::Neutral;
    }

    Ok(AxisResult {
        label,
        score: round_to(verdict.score, SCORE_PLACES),
        original_label,
    })
}

fn validate_text(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(Error::invalid_input("comment text is empty"));
    }
    Ok(())
}

fn validate_score(score: f64) -> Result<()> {
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err(Error::invalid_input(format!(
            "classifier score {} is outside [0, 1]",
            score
        )));
    }
    Ok(())
}
