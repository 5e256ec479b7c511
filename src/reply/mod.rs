//! Constrained reply pipeline.
//!
//! Turns a raw, possibly unreliable generator output into a short on-topic
//! reply, or substitutes a curated one:
//!
//! ```text
//! PromptBuilder → generator → ReplySanitizer → UsabilityGate ─┬─ accepted reply
//!                                                             └─ FallbackSelector
//! ```

pub mod fallback;
pub mod gate;
pub mod pipeline;
pub mod prompt;
pub mod sanitize;

use serde::{Deserialize, Serialize};

/// Which curated path produced a fallback reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "topic", rename_all = "snake_case")]
pub enum FallbackKind {
    /// A topic keyword in the utterance (tiredness, hunger, ...).
    Keyword(String),
    /// The user said a negative feeling no longer applies.
    Negation,
    /// Random template for the utterance's sentiment label.
    Template,
    /// The utterance was empty.
    EmptyInput,
}

/// Where a delivered reply came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyOrigin {
    Generated,
    Fallback(FallbackKind),
}

/// Final reply for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyResult {
    pub text: String,
    pub origin: ReplyOrigin,
}

impl ReplyResult {
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: ReplyOrigin::Generated,
        }
    }

    pub fn fallback(text: impl Into<String>, kind: FallbackKind) -> Self {
        Self {
            text: text.into(),
            origin: ReplyOrigin::Fallback(kind),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, ReplyOrigin::Fallback(_))
    }
}

impl std::fmt::Display for ReplyResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// States a turn passes through in [`pipeline::ReplyPipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Classified,
    Prompted,
    Generated,
    Sanitized,
    Accepted,
    Rejected,
    Fallback,
    Delivered,
}
