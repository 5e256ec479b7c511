//! Shared fakes for integration tests.

use moodchat::generation::{GenerationError, ReplyGenerator};
use moodchat::reply::fallback::FallbackSelector;
use moodchat::sentiment::model::{Polarity, SentimentModel};
use moodchat::{ChatConfig, ChatSession};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};

/// Sentiment model returning one fixed distribution and counting calls.
pub(crate) struct StaticModel {
    polarity: Polarity,
    pub calls: Mutex<usize>,
}

impl StaticModel {
    pub(crate) fn neutral() -> Self {
        Self::new(0.1, 0.8, 0.1)
    }

    pub(crate) fn new(negative: f32, neutral: f32, positive: f32) -> Self {
        Self {
            polarity: Polarity::new(negative, neutral, positive),
            calls: Mutex::new(0),
        }
    }
}

impl SentimentModel for StaticModel {
    fn predict(&self, _text: &str) -> moodchat::Result<Polarity> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.polarity)
    }
}

/// Generator fake that records prompts and replays one outcome.
pub(crate) enum Script {
    Reply(String),
    Timeout,
    Empty,
}

pub(crate) struct RecordingGenerator {
    script: Script,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub(crate) fn new(script: Script) -> Self {
        Self {
            script,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl ReplyGenerator for RecordingGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Timeout => Err(GenerationError::Timeout { secs: 12.0 }),
            Script::Empty => Err(GenerationError::EmptyOutput),
        }
    }
}

/// Session over the given fakes with a seeded fallback selector.
pub(crate) fn session(
    config: &ChatConfig,
    model: Arc<StaticModel>,
    generator: Arc<RecordingGenerator>,
) -> ChatSession {
    let fallback = FallbackSelector::with_rng(
        &config.fallback,
        &config.sentiment.rules,
        Box::new(StdRng::seed_from_u64(2024)),
    );
    ChatSession::new(config, model, generator, fallback)
}
