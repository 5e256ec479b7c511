//! One-turn reply orchestration.

use super::fallback::FallbackSelector;
use super::gate::{GateVerdict, UsabilityGate};
use super::prompt::PromptBuilder;
use super::sanitize::ReplySanitizer;
use super::{ReplyResult, TurnStage};
use crate::config::ChatConfig;
use crate::conversation::Utterance;
use crate::generation::ReplyGenerator;
use crate::sentiment::SentimentLabel;
use std::sync::Arc;
use tracing::{debug, warn};

/// Prompt → generate → sanitize → gate, with a curated fallback.
///
/// A turn always yields a non-empty reply. The generator is asked once per
/// turn; a rejected reply goes straight to the fallback.
pub struct ReplyPipeline {
    prompts: PromptBuilder,
    generator: Arc<dyn ReplyGenerator>,
    sanitizer: ReplySanitizer,
    gate: UsabilityGate,
    fallback: FallbackSelector,
}

impl std::fmt::Debug for ReplyPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyPipeline")
            .field("prompts", &self.prompts)
            .field("sanitizer", &self.sanitizer)
            .field("gate", &self.gate)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl ReplyPipeline {
    pub fn new(
        config: &ChatConfig,
        generator: Arc<dyn ReplyGenerator>,
        fallback: FallbackSelector,
    ) -> Self {
        Self {
            prompts: PromptBuilder::new(&config.prompt),
            generator,
            sanitizer: ReplySanitizer::new(&config.sanitizer),
            gate: UsabilityGate::new(&config.gate),
            fallback,
        }
    }

    /// Produce the reply for `utterance`, already classified as `label`.
    ///
    /// `history` holds earlier utterances, oldest first, excluding `utterance`.
    pub fn respond(
        &mut self,
        utterance: &Utterance,
        label: SentimentLabel,
        history: &[Utterance],
    ) -> ReplyResult {
        let turn = utterance.index();
        stage(turn, TurnStage::Classified);

        if utterance.text().trim().is_empty() {
            return self.deliver_fallback(turn, utterance, label);
        }

        let prompt = self.prompts.build(utterance, label, history);
        stage(turn, TurnStage::Prompted);

        let raw = match self.generator.generate(&prompt) {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!(turn, error = %e, "reply generation failed");
                None
            }
        };
        stage(turn, TurnStage::Generated);

        let cleaned = self.sanitizer.clean(raw.as_deref());
        debug!(
            turn,
            sentences = cleaned.sentence_count(),
            truncated = cleaned.was_truncated(),
            "reply sanitized"
        );
        stage(turn, TurnStage::Sanitized);

        match self.gate.evaluate(&cleaned) {
            GateVerdict::Accepted => {
                stage(turn, TurnStage::Accepted);
                stage(turn, TurnStage::Delivered);
                ReplyResult::generated(cleaned.into_text())
            }
            verdict => {
                warn!(turn, ?verdict, "generated reply rejected");
                stage(turn, TurnStage::Rejected);
                self.deliver_fallback(turn, utterance, label)
            }
        }
    }

    fn deliver_fallback(
        &mut self,
        turn: usize,
        utterance: &Utterance,
        label: SentimentLabel,
    ) -> ReplyResult {
        let reply = self.fallback.select(utterance.text(), label);
        stage(turn, TurnStage::Fallback);
        stage(turn, TurnStage::Delivered);
        reply
    }
}

fn stage(turn: usize, stage: TurnStage) {
    debug!(turn, ?stage, "turn stage");
}
