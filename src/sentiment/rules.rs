//! Keyword override rules.
//!
//! Short colloquial or regionally inflected phrases ("fine only", "theek hai",
//! "worn out") are routinely misread by a generic polarity model. A
//! [`KeywordRuleSet`] is a small, human-auditable list of patterns per label
//! that is consulted before the model and always wins when it fires.
//!
//! Matching is substring containment anchored at a word start: a pattern may
//! end mid-word (so `stress` catches "stressful"), but it must begin where a
//! word begins (so `ill` does not fire inside "will").

use super::SentimentLabel;
use serde::{Deserialize, Serialize};

/// Ordered keyword rules plus the narrow negation exception.
///
/// Evaluation order is fixed: negative, then neutral, then positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordRuleSet {
    /// Patterns that force NEGATIVE.
    pub negative: Vec<String>,
    /// Patterns that force NEUTRAL.
    pub neutral: Vec<String>,
    /// Patterns that force POSITIVE.
    pub positive: Vec<String>,
    /// Words that negate the emotion word directly after them.
    pub negation_markers: Vec<String>,
    /// Emotion words whose negation turns a negative hit into NEUTRAL.
    pub negated_emotions: Vec<String>,
}

/// A keyword rule that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleHit<'a> {
    /// Label forced by the rule.
    pub label: SentimentLabel,
    /// The pattern that matched.
    pub pattern: &'a str,
    /// Whether a negative hit was downgraded by the negation exception.
    pub negated: bool,
}

const NEGATIVE_PATTERNS: &[&str] = &[
    // tiredness
    "tired",
    "exhausted",
    "drained",
    "worn out",
    "fatigued",
    "sleepy",
    "burnout",
    "burnt out",
    // hunger
    "hungry",
    "starving",
    "starved",
    "famished",
    // low mood
    "not feeling great",
    "not great",
    "not okay",
    "not fine",
    "i am not okay",
    "i'm not okay",
    "not really fine",
    "sad",
    "upset",
    "angry",
    "frustrated",
    "annoyed",
    "disappointed",
    "disappointing",
    "terrible",
    "awful",
    "horrible",
    "worst",
    "hate",
    "dislike",
    // stress
    "stress",
    "stressed",
    "anxious",
    "worried",
    "nervous",
    "overwhelmed",
    "tense",
    "panic",
    // discomfort
    "hurt",
    "pain",
    "painful",
    "sick",
    "ill",
    "unwell",
];

const NEUTRAL_PATTERNS: &[&str] = &[
    "fine only",
    "fine yaar",
    "thik thak",
    "theek thak",
    "thik hai",
    "theek hai",
    "ok only",
    "okay only",
    "acha hai",
    "badhiya",
    "chalta hai",
    "just fine",
    "just ok",
    "just okay",
    "it's fine",
    "could be better",
    "not bad",
    "so-so",
    "alright",
    "decent",
    "average",
    "okay i guess",
];

const POSITIVE_PATTERNS: &[&str] = &[
    "amazing",
    "awesome",
    "fantastic",
    "excellent",
    "wonderful",
    "brilliant",
    "superb",
    "outstanding",
    "perfect",
    "love",
    "loving",
    "loved",
    "so good",
    "very good",
    "great",
    "feel great",
    "feel good",
    "happy",
    "very happy",
    "super happy",
    "excited",
    "thrilled",
    "delighted",
    "glad",
    "pleased",
    "birthday",
    "celebration",
    "celebrate",
    "congratulations",
    "yay",
    "hooray",
    "finally",
    "at last",
];

const NEGATION_MARKERS: &[&str] = &["not", "ain't", "no longer"];

const NEGATED_EMOTIONS: &[&str] = &[
    "tired", "stressed", "sad", "upset", "angry", "anxious", "worried", "hungry",
];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for KeywordRuleSet {
    fn default() -> Self {
        Self {
            negative: owned(NEGATIVE_PATTERNS),
            neutral: owned(NEUTRAL_PATTERNS),
            positive: owned(POSITIVE_PATTERNS),
            negation_markers: owned(NEGATION_MARKERS),
            negated_emotions: owned(NEGATED_EMOTIONS),
        }
    }
}

impl KeywordRuleSet {
    /// Evaluate the rules against already-normalized text.
    ///
    /// Returns `None` when no rule fires and the model must decide.
    pub fn evaluate<'a>(&'a self, normalized: &str) -> Option<RuleHit<'a>> {
        if let Some(pattern) = first_match(&self.negative, normalized) {
            let negated = self.has_negated_emotion(normalized);
            let label = if negated {
                SentimentLabel::Neutral
            } else {
                SentimentLabel::Negative
            };
            return Some(RuleHit {
                label,
                pattern,
                negated,
            });
        }

        if let Some(pattern) = first_match(&self.neutral, normalized) {
            return Some(RuleHit {
                label: SentimentLabel::Neutral,
                pattern,
                negated: false,
            });
        }

        first_match(&self.positive, normalized).map(|pattern| RuleHit {
            label: SentimentLabel::Positive,
            pattern,
            negated: false,
        })
    }

    /// Whether any listed emotion word appears directly after a negation
    /// marker, as in "not tired" or "no longer sad".
    pub fn has_negated_emotion(&self, normalized: &str) -> bool {
        self.negated_emotions.iter().any(|emotion| {
            occurrences(normalized, emotion).any(|idx| self.negated_before(&normalized[..idx]))
        })
    }

    /// Whether `pattern` occurs at least once without a negation marker in
    /// front of it.
    pub fn contains_unnegated(&self, normalized: &str, pattern: &str) -> bool {
        occurrences(normalized, pattern).any(|idx| !self.negated_before(&normalized[..idx]))
    }

    fn negated_before(&self, prefix: &str) -> bool {
        if !prefix.ends_with(char::is_whitespace) {
            return false;
        }
        let prefix = prefix.trim_end();
        self.negation_markers.iter().any(|marker| {
            !marker.is_empty()
                && prefix.ends_with(marker.as_str())
                && starts_word(prefix, prefix.len() - marker.len())
        })
    }
}

/// Lowercase, unify typographic apostrophes, and collapse whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace(['\u{2019}', '\u{2018}'], "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `pattern` occurs in `text` starting at a word boundary.
pub fn contains_at_word_start(text: &str, pattern: &str) -> bool {
    occurrences(text, pattern).next().is_some()
}

fn first_match<'a>(patterns: &'a [String], text: &str) -> Option<&'a str> {
    patterns
        .iter()
        .map(String::as_str)
        .find(|p| contains_at_word_start(text, p))
}

fn occurrences<'t>(text: &'t str, pattern: &'t str) -> impl Iterator<Item = usize> + 't {
    let pattern = if pattern.is_empty() { None } else { Some(pattern) };
    pattern
        .into_iter()
        .flat_map(move |p| text.match_indices(p))
        .map(|(idx, _)| idx)
        .filter(move |&idx| starts_word(text, idx))
}

fn starts_word(text: &str, idx: usize) -> bool {
    text[..idx]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_alphanumeric())
}
