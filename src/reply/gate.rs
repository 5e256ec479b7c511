//! Accept/reject decision for sanitized replies.

use super::sanitize::CleanedReply;
use crate::config::GateConfig;

/// Why a reply was accepted or rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateVerdict {
    Accepted,
    Empty,
    TooShort { chars: usize },
    Filler { phrase: String },
}

impl GateVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Rejects empty, too-short, and non-answer replies.
#[derive(Debug, Clone)]
pub struct UsabilityGate {
    min_chars: usize,
    filler_phrases: Vec<String>,
}

impl UsabilityGate {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            min_chars: config.min_chars,
            filler_phrases: config
                .filler_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn is_usable(&self, cleaned: &CleanedReply) -> bool {
        self.evaluate(cleaned).is_accepted()
    }

    pub fn evaluate(&self, cleaned: &CleanedReply) -> GateVerdict {
        let text = cleaned.as_str().trim();
        if text.is_empty() {
            return GateVerdict::Empty;
        }

        let chars = text.chars().count();
        if chars < self.min_chars {
            return GateVerdict::TooShort { chars };
        }

        let lower = text.to_lowercase();
        if let Some(phrase) = self.filler_phrases.iter().find(|p| lower.contains(p.as_str())) {
            return GateVerdict::Filler {
                phrase: phrase.clone(),
            };
        }

        GateVerdict::Accepted
    }
}

impl Default for UsabilityGate {
    fn default() -> Self {
        Self::new(&GateConfig::default())
    }
}
