use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use super::errors::Error;

/// Classification dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Sentiment,
    Emotion,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Sentiment, Axis::Emotion];

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Sentiment => "sentiment",
            Axis::Emotion => "emotion",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Axis::ALL
            .into_iter()
            .find(|axis| axis.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_input(format!("unknown axis '{}'", s)))
    }
}

/// A fixed label set for one axis.
///
/// `ALL` lists members in declaration order, which is also their `Ord` order.
pub trait Label:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    const ALL: &'static [Self];
    const AXIS: Axis;

    /// Lower-case key used in maps and serialized output
    fn as_str(self) -> &'static str;

    /// Capitalized form for display
    fn display_name(self) -> &'static str;

    /// Case-insensitive lookup by name
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|label| label.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Map a raw classifier label onto the sentiment set.
    ///
    /// Accepts the star-rating labels of the review model as well as plain
    /// polarity names. Anything else is Neutral.
    pub fn from_classifier(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "1 star" | "2 stars" => SentimentLabel::Negative,
            "3 stars" => SentimentLabel::Neutral,
            "4 stars" | "5 stars" => SentimentLabel::Positive,
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }
}

impl Label for SentimentLabel {
    const ALL: &'static [Self] = &[
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];
    const AXIS: Axis = Axis::Sentiment;

    fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Anger,
    Disgust,
    Fear,
    Joy,
    Neutral,
    Sadness,
    Surprise,
}

impl EmotionLabel {
    /// Map a raw classifier label onto the emotion set, Neutral when unknown
    pub fn from_classifier(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(EmotionLabel::Neutral)
    }
}

impl Label for EmotionLabel {
    const ALL: &'static [Self] = &[
        EmotionLabel::Anger,
        EmotionLabel::Disgust,
        EmotionLabel::Fear,
        EmotionLabel::Joy,
        EmotionLabel::Neutral,
        EmotionLabel::Sadness,
        EmotionLabel::Surprise,
    ];
    const AXIS: Axis = Axis::Emotion;

    fn as_str(self) -> &'static str {
        match self {
            EmotionLabel::Anger => "anger",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Joy => "joy",
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Sadness => "sadness",
            EmotionLabel::Surprise => "surprise",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            EmotionLabel::Anger => "Anger",
            EmotionLabel::Disgust => "Disgust",
            EmotionLabel::Fear => "Fear",
            EmotionLabel::Joy => "Joy",
            EmotionLabel::Neutral => "Neutral",
            EmotionLabel::Sadness => "Sadness",
            EmotionLabel::Surprise => "Surprise",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Raw classifier output for one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierVerdict {
    pub label: String,
    pub score: f64,
}

impl ClassifierVerdict {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Verdicts for both axes of one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictPair {
    pub sentiment: ClassifierVerdict,
    pub emotion: ClassifierVerdict,
}

/// Final decision for one axis of one comment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisResult<L> {
    pub label: L,
    /// Classifier confidence rounded to 4 decimals
    pub score: f64,
    /// Label mapped from the classifier before any override
    pub original_label: L,
}

/// One resolved comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub text: String,
    pub sentiment: AxisResult<SentimentLabel>,
    pub emotion: AxisResult<EmotionLabel>,
}

impl ClassificationRecord {
    /// Final label name on the given axis, lower-case
    pub fn label_on(&self, axis: Axis) -> &'static str {
        match axis {
            Axis::Sentiment => self.sentiment.label.as_str(),
            Axis::Emotion => self.emotion.label.as_str(),
        }
    }
}

/// Round to a fixed number of decimal places, exact halves to the even digit
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
