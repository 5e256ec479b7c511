//! Prompt construction for the external generator.
//!
//! The prompt is assembled from four parts:
//!
//! 1. **Persona** line from [`PromptConfig::persona`].
//! 2. **Tone** instruction picked from the [`ToneProfile`] by sentiment label.
//! 3. **Rules** ([`REPLY_RULES`]): fixed output constraints.
//! 4. **Context**: up to `history_window` prior utterances, then the current one.

use crate::config::PromptConfig;
use crate::conversation::Utterance;
use crate::sentiment::SentimentLabel;
use serde::{Deserialize, Serialize};

/// Fixed behavioural directive appended to every prompt.
pub const REPLY_RULES: &str = "\
RULES:\n\
- Reply in 1-3 short sentences.\n\
- Stay on the topic of the user's current message only.\n\
- Never say you are an AI, a language model, or an assistant.\n\
- Do not explain your reasoning.\n\
- Do not write lists, stories, or step-by-step instructions.";

/// Tone instruction per sentiment label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneProfile {
    pub negative: String,
    pub neutral: String,
    pub positive: String,
}

impl Default for ToneProfile {
    fn default() -> Self {
        Self {
            negative: "The user seems to be having a hard time. Respond with warmth and empathy, \
                       and gently acknowledge how they feel."
                .to_owned(),
            neutral: "Respond in a calm, friendly, conversational tone.".to_owned(),
            positive: "The user is in a good mood. Share their enthusiasm and respond cheerfully."
                .to_owned(),
        }
    }
}

impl ToneProfile {
    /// Instruction for `label`; an empty entry falls back to the neutral one.
    pub fn instruction(&self, label: SentimentLabel) -> &str {
        let chosen = match label {
            SentimentLabel::Negative => &self.negative,
            SentimentLabel::Neutral => &self.neutral,
            SentimentLabel::Positive => &self.positive,
        };
        if chosen.trim().is_empty() {
            &self.neutral
        } else {
            chosen
        }
    }
}

/// Builds generator prompts. Pure; performs no I/O.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    persona: String,
    tone: ToneProfile,
    history_window: usize,
}

impl PromptBuilder {
    pub fn new(config: &PromptConfig) -> Self {
        Self {
            persona: config.persona.clone(),
            tone: config.tone.clone(),
            history_window: config.history_window,
        }
    }

    /// Build the prompt for `utterance`.
    ///
    /// `history` holds prior utterances oldest first; only the last
    /// `history_window` are used.
    pub fn build(&self, utterance: &Utterance, label: SentimentLabel, history: &[Utterance]) -> String {
        let mut prompt = String::new();
        if !self.persona.trim().is_empty() {
            prompt.push_str(self.persona.trim());
            prompt.push('\n');
        }
        prompt.push_str("Tone: ");
        prompt.push_str(self.tone.instruction(label).trim());
        prompt.push_str("\n\n");
        prompt.push_str(REPLY_RULES);
        prompt.push_str("\n\n");

        let start = history.len().saturating_sub(self.history_window);
        let context: Vec<String> = history[start..]
            .iter()
            .map(|u| single_line(u.text()))
            .filter(|line| !line.is_empty())
            .collect();
        if !context.is_empty() {
            prompt.push_str("Earlier in the conversation:\n");
            for line in context {
                prompt.push_str("User: ");
                prompt.push_str(&line);
                prompt.push('\n');
            }
            prompt.push('\n');
        }

        prompt.push_str("User: ");
        prompt.push_str(&single_line(utterance.text()));
        prompt.push_str("\nAssistant:");
        prompt
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(&PromptConfig::default())
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
