//! Ordered override rules.
//!
//! Both tables are slices, not maps: declaration order is the tie-break when
//! a text matches more than one rule, and the first match wins.

use crate::core::{EmotionLabel, SentimentLabel};

/// Literal substrings that force a sentiment label
#[derive(Debug, Clone, Copy)]
pub struct KeywordGroup {
    pub label: SentimentLabel,
    pub keywords: &'static [&'static str],
}

/// A literal key (word fragment, emoticon or emoji) that forces an emotion
#[derive(Debug, Clone, Copy)]
pub struct EmotionOverride {
    pub key: &'static str,
    pub emotion: EmotionLabel,
}

pub const SENTIMENT_KEYWORD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        label: SentimentLabel::Positive,
        keywords: &["recommend", "love", "best", "helping", "awesome", "great"],
    },
    KeywordGroup {
        label: SentimentLabel::Negative,
        // "crao" and "blikn" are recurring typos of "crap" and "blink"
        keywords: &[
            "crao",
            "blikn",
            "fearmongering",
            "hot garbage",
            "sucks",
            "worst",
        ],
    },
    KeywordGroup {
        label: SentimentLabel::Neutral,
        keywords: &["maybe", "perhaps", "consider", "possibly"],
    },
];

pub const EMOTION_OVERRIDES: &[EmotionOverride] = &[
    EmotionOverride {
        key: ":(",
        emotion: EmotionLabel::Sadness,
    },
    EmotionOverride {
        key: "💢",
        emotion: EmotionLabel::Anger,
    },
    EmotionOverride {
        key: "😡",
        emotion: EmotionLabel::Anger,
    },
    EmotionOverride {
        key: "😍",
        emotion: EmotionLabel::Joy,
    },
    EmotionOverride {
        key: "💔",
        emotion: EmotionLabel::Sadness,
    },
    EmotionOverride {
        key: "crao",
        emotion: EmotionLabel::Anger,
    },
    EmotionOverride {
        key: "crap",
        emotion: EmotionLabel::Anger,
    },
    EmotionOverride {
        key: "blikn",
        emotion: EmotionLabel::Anger,
    },
];

/// First keyword group with any keyword contained in `text_lower`.
///
/// Returns the group's label and the keyword that matched.
pub fn first_keyword_match(text_lower: &str) -> Option<(SentimentLabel, &'static str)> {
    SENTIMENT_KEYWORD_GROUPS.iter().find_map(|group| {
        group
            .keywords
            .iter()
            .find(|keyword| text_lower.contains(*keyword))
            .map(|keyword| (group.label, *keyword))
    })
}

/// First override key found in either the lower-cased or the raw text
pub fn first_emotion_override(text: &str, text_lower: &str) -> Option<&'static EmotionOverride> {
    EMOTION_OVERRIDES
        .iter()
        .find(|rule| text_lower.contains(rule.key) || text.contains(rule.key))
}
