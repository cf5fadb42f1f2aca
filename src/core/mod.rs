//! Core domain types shared by every stage of the analysis.

pub mod errors;
pub mod types;

pub use errors::{Error, Result};
pub use types::{
    round_to, Axis, AxisResult, ClassificationRecord, ClassifierVerdict, EmotionLabel, Label,
    SentimentLabel, VerdictPair,
};
