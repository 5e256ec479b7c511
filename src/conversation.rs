//! Conversation history and end-of-conversation sentiment summary.
//!
//! A [`Conversation`] is append-only: each submitted [`Utterance`] is stored
//! together with the label it was resolved to. At the end of a conversation
//! the [`ConversationAggregator`] reduces the labels to an overall label and a
//! [`TrendJudgment`] comparing the first and last thirds.

use crate::config::ConversationConfig;
use crate::sentiment::SentimentLabel;
use serde::{Deserialize, Serialize};

/// One submitted turn of user text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    text: String,
    index: usize,
}

impl Utterance {
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            index,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Zero-based position in the conversation.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Ordered utterances and their resolved labels.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    utterances: Vec<Utterance>,
    labels: Vec<SentimentLabel>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the utterance for the next turn without recording it.
    pub fn next_utterance(&self, text: impl Into<String>) -> Utterance {
        Utterance::new(text, self.utterances.len())
    }

    /// Record a classified turn.
    pub fn push(&mut self, utterance: Utterance, label: SentimentLabel) {
        self.utterances.push(utterance);
        self.labels.push(label);
    }

    /// The last `n` utterances, oldest first.
    pub fn recent(&self, n: usize) -> &[Utterance] {
        let start = self.utterances.len().saturating_sub(n);
        &self.utterances[start..]
    }

    pub fn utterances(&self) -> &[Utterance] {
        &self.utterances
    }

    pub fn labels(&self) -> &[SentimentLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }
}

/// How sentiment moved between the first and last thirds of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendJudgment {
    NoMessages,
    TooShort,
    ImprovedSignificantly,
    ImprovedSlightly,
    WorsenedSignificantly,
    WorsenedSlightly,
    Stable,
}

impl TrendJudgment {
    pub fn description(self) -> &'static str {
        match self {
            Self::NoMessages => "No messages",
            Self::TooShort => "Conversation too short to detect trend",
            Self::ImprovedSignificantly => "Mood improved significantly",
            Self::ImprovedSlightly => "Mood improved slightly",
            Self::WorsenedSignificantly => "Mood worsened significantly",
            Self::WorsenedSlightly => "Mood worsened slightly",
            Self::Stable => "Mood remained stable",
        }
    }
}

impl std::fmt::Display for TrendJudgment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of summarizing a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub overall: SentimentLabel,
    pub trend: TrendJudgment,
    /// Arithmetic mean of the label scores (`0.0` for an empty conversation).
    pub mean_score: f32,
    /// Per-utterance labels in conversation order.
    pub labels: Vec<SentimentLabel>,
}

/// Reduces per-utterance labels to an overall label and trend.
#[derive(Debug, Clone)]
pub struct ConversationAggregator {
    overall_threshold: f32,
    significant_delta: f32,
}

/// Minimum number of labels before a trend is attempted.
pub const MIN_TREND_LEN: usize = 3;

impl ConversationAggregator {
    pub fn new(config: &ConversationConfig) -> Self {
        Self {
            overall_threshold: config.overall_threshold,
            significant_delta: config.significant_trend_delta,
        }
    }

    /// Summarize `labels`; never mutates them.
    pub fn summarize(&self, labels: &[SentimentLabel]) -> ConversationSummary {
        if labels.is_empty() {
            return ConversationSummary {
                overall: SentimentLabel::Neutral,
                trend: TrendJudgment::NoMessages,
                mean_score: 0.0,
                labels: Vec::new(),
            };
        }

        let scores: Vec<i32> = labels.iter().map(|l| l.score()).collect();
        let mean = scores.iter().sum::<i32>() as f32 / scores.len() as f32;

        let overall = if mean > self.overall_threshold {
            SentimentLabel::Positive
        } else if mean < -self.overall_threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };

        ConversationSummary {
            overall,
            trend: self.trend(&scores),
            mean_score: mean,
            labels: labels.to_vec(),
        }
    }

    fn trend(&self, scores: &[i32]) -> TrendJudgment {
        if scores.len() < MIN_TREND_LEN {
            return TrendJudgment::TooShort;
        }

        let third = scores.len() / 3;
        let first: i32 = scores[..third].iter().sum();
        let last: i32 = scores[scores.len() - third..].iter().sum();
        let diff = (last - first) as f32;

        if diff > self.significant_delta {
            TrendJudgment::ImprovedSignificantly
        } else if diff > 0.0 {
            TrendJudgment::ImprovedSlightly
        } else if diff < -self.significant_delta {
            TrendJudgment::WorsenedSignificantly
        } else if diff < 0.0 {
            TrendJudgment::WorsenedSlightly
        } else {
            TrendJudgment::Stable
        }
    }
}

impl Default for ConversationAggregator {
    fn default() -> Self {
        Self::new(&ConversationConfig::default())
    }
}
