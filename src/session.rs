//! Conversation session: ties classification, replies, and history together.

use crate::config::ChatConfig;
use crate::conversation::{Conversation, ConversationAggregator, ConversationSummary, Utterance};
use crate::error::Result;
use crate::generation::{CommandGenerator, ReplyGenerator};
use crate::reply::ReplyResult;
use crate::reply::fallback::FallbackSelector;
use crate::reply::pipeline::ReplyPipeline;
use crate::sentiment::model::SentimentModel;
use crate::sentiment::onnx::OnnxSentimentModel;
use crate::sentiment::{SentimentClassifier, SentimentLabel};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Everything produced for one submitted utterance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub utterance: Utterance,
    pub label: SentimentLabel,
    pub reply: ReplyResult,
}

/// A single sequential conversation.
///
/// Each utterance is classified once; the same label drives the reply and is
/// recorded in the history used for the final summary.
#[derive(Debug)]
pub struct ChatSession {
    classifier: Arc<SentimentClassifier>,
    pipeline: ReplyPipeline,
    conversation: Conversation,
    aggregator: ConversationAggregator,
    exit_keywords: Vec<String>,
}

impl ChatSession {
    /// Assemble a session from injected collaborators.
    pub fn new(
        config: &ChatConfig,
        model: Arc<dyn SentimentModel>,
        generator: Arc<dyn ReplyGenerator>,
        fallback: FallbackSelector,
    ) -> Self {
        Self {
            classifier: Arc::new(SentimentClassifier::new(model, &config.sentiment)),
            pipeline: ReplyPipeline::new(config, generator, fallback),
            conversation: Conversation::new(),
            aggregator: ConversationAggregator::new(&config.conversation),
            exit_keywords: config
                .conversation
                .exit_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Download and load the sentiment model, and use the configured
    /// generator command.
    ///
    /// # Errors
    ///
    /// Returns an error if the sentiment model cannot be fetched or loaded.
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let model = OnnxSentimentModel::download_and_load(&config.sentiment)?;
        let generator = CommandGenerator::from_config(&config.generation);
        info!(
            generator = config.generation.program.as_str(),
            timeout_secs = config.generation.timeout_secs,
            "chat session ready"
        );
        let fallback = FallbackSelector::new(&config.fallback, &config.sentiment.rules);
        Ok(Self::new(
            config,
            Arc::new(model),
            Arc::new(generator),
            fallback,
        ))
    }

    /// Shared handle to the classifier, e.g. for batch classification.
    pub fn classifier(&self) -> Arc<SentimentClassifier> {
        Arc::clone(&self.classifier)
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Whether `text` is one of the exit keywords (trimmed, case-insensitive).
    pub fn is_exit(&self, text: &str) -> bool {
        let text = text.trim().to_lowercase();
        self.exit_keywords.iter().any(|k| *k == text)
    }

    /// Process one utterance and record it.
    pub fn submit(&mut self, text: &str) -> TurnOutcome {
        let utterance = self.conversation.next_utterance(text);
        let label = self.classifier.classify(text);
        let reply = self
            .pipeline
            .respond(&utterance, label, self.conversation.utterances());
        self.conversation.push(utterance.clone(), label);
        TurnOutcome {
            utterance,
            label,
            reply,
        }
    }

    /// Summarize the conversation so far.
    pub fn finish(&self) -> ConversationSummary {
        self.aggregator.summarize(self.conversation.labels())
    }
}
