//! Probabilistic three-class polarity model capability.

use super::SentimentLabel;
use crate::error::Result;

/// A pretrained three-way polarity classifier.
///
/// Implementations are expensive to construct and are shared for the lifetime
/// of the process, so the trait takes `&self` and requires `Send + Sync`.
/// Callers bound the input length before calling [`predict`](Self::predict).
pub trait SentimentModel: Send + Sync {
    /// Return the probability distribution over the three labels.
    fn predict(&self, text: &str) -> Result<Polarity>;
}

/// Probability per label. Components sum to 1 when produced by [`Polarity::from_logits`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polarity {
    pub negative: f32,
    pub neutral: f32,
    pub positive: f32,
}

impl Polarity {
    pub fn new(negative: f32, neutral: f32, positive: f32) -> Self {
        Self {
            negative,
            neutral,
            positive,
        }
    }

    /// Softmax over raw `[negative, neutral, positive]` logits.
    pub fn from_logits(logits: [f32; 3]) -> Self {
        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps = logits.map(|l| (l - max).exp());
        let sum: f32 = exps.iter().sum();
        if !sum.is_finite() || sum <= 0.0 {
            return Self::new(0.0, 1.0, 0.0);
        }
        Self::new(exps[0] / sum, exps[1] / sum, exps[2] / sum)
    }

    /// Probability assigned to `label`.
    pub fn get(&self, label: SentimentLabel) -> f32 {
        match label {
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Positive => self.positive,
        }
    }

    /// Highest-probability label; ties resolve in `NEGATIVE, NEUTRAL, POSITIVE` order.
    pub fn argmax(&self) -> SentimentLabel {
        let mut best = SentimentLabel::Negative;
        for label in [SentimentLabel::Neutral, SentimentLabel::Positive] {
            if self.get(label) > self.get(best) {
                best = label;
            }
        }
        best
    }

    /// Pick a label, refusing a low-confidence NEUTRAL.
    ///
    /// When NEUTRAL wins with probability below `neutral_threshold`, the more
    /// likely of NEGATIVE and POSITIVE is returned instead.
    pub fn decide(&self, neutral_threshold: f32) -> SentimentLabel {
        match self.argmax() {
            SentimentLabel::Neutral if self.neutral < neutral_threshold => {
                if self.negative > self.positive {
                    SentimentLabel::Negative
                } else {
                    SentimentLabel::Positive
                }
            }
            label => label,
        }
    }
}
