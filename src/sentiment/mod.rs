//! Hybrid sentiment classifier for user utterances.
//!
//! Maps one utterance to one of three polarity labels. Two layers:
//!
//! 1. **Keyword overrides** ([`rules::KeywordRuleSet`]): deterministic
//!    substring rules, checked negative → neutral → positive. When a rule
//!    fires the model is never consulted.
//! 2. **Probabilistic model** ([`model::SentimentModel`]): a pretrained
//!    three-way classifier, with low-confidence NEUTRAL pushed to the nearer
//!    pole.
//!
//! Inference failures degrade to NEUTRAL and are logged; [`SentimentClassifier::classify`]
//! never returns an error.

pub mod model;
pub mod onnx;
pub mod rules;

use crate::config::SentimentConfig;
use model::{Polarity, SentimentModel};
use rules::KeywordRuleSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Coarse three-way polarity of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    /// Numeric score used for aggregation only: `-1`, `0`, `1`.
    pub fn score(self) -> i32 {
        match self {
            Self::Negative => -1,
            Self::Neutral => 0,
            Self::Positive => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::Positive => "POSITIVE",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which layer produced a label.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationSource {
    /// A keyword rule fired.
    Keyword { pattern: String, negated: bool },
    /// The probabilistic model decided.
    Model(Polarity),
    /// The text was empty after normalization.
    EmptyInput,
    /// Model inference failed; the label is the NEUTRAL default.
    ModelFailure(String),
}

/// A label together with how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: SentimentLabel,
    pub source: ClassificationSource,
}

/// Rule-first, model-second utterance classifier.
pub struct SentimentClassifier {
    rules: KeywordRuleSet,
    model: Arc<dyn SentimentModel>,
    confidence_threshold: f32,
    max_input_tokens: usize,
}

impl std::fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentClassifier")
            .field("confidence_threshold", &self.confidence_threshold)
            .field("max_input_tokens", &self.max_input_tokens)
            .finish_non_exhaustive()
    }
}

impl SentimentClassifier {
    /// Create a classifier using the rules and thresholds from `config`.
    pub fn new(model: Arc<dyn SentimentModel>, config: &SentimentConfig) -> Self {
        Self {
            rules: config.rules.clone(),
            model,
            confidence_threshold: config.confidence_threshold,
            max_input_tokens: config.max_input_tokens,
        }
    }

    /// Keyword rules in use.
    pub fn rules(&self) -> &KeywordRuleSet {
        &self.rules
    }

    /// Classify one utterance.
    pub fn classify(&self, text: &str) -> SentimentLabel {
        self.classify_detailed(text).label
    }

    /// Classify one utterance and report which layer decided.
    pub fn classify_detailed(&self, text: &str) -> Classification {
        let normalized = rules::normalize(text);
        if normalized.is_empty() {
            return Classification {
                label: SentimentLabel::Neutral,
                source: ClassificationSource::EmptyInput,
            };
        }

        if let Some(hit) = self.rules.evaluate(&normalized) {
            debug!(
                label = %hit.label,
                pattern = hit.pattern,
                negated = hit.negated,
                "keyword override"
            );
            return Classification {
                label: hit.label,
                source: ClassificationSource::Keyword {
                    pattern: hit.pattern.to_owned(),
                    negated: hit.negated,
                },
            };
        }

        let bounded = bound_tokens(text, self.max_input_tokens);
        match self.model.predict(bounded) {
            Ok(polarity) => {
                let label = polarity.decide(self.confidence_threshold);
                debug!(
                    label = %label,
                    negative = polarity.negative,
                    neutral = polarity.neutral,
                    positive = polarity.positive,
                    "model classification"
                );
                Classification {
                    label,
                    source: ClassificationSource::Model(polarity),
                }
            }
            Err(e) => {
                warn!(error = %e, "sentiment inference failed, defaulting to NEUTRAL");
                Classification {
                    label: SentimentLabel::Neutral,
                    source: ClassificationSource::ModelFailure(e.to_string()),
                }
            }
        }
    }

    /// Classify independent utterances, fanning out across threads.
    ///
    /// Output order matches input order.
    pub fn classify_batch(&self, texts: &[&str]) -> Vec<SentimentLabel> {
        if texts.len() <= 1 {
            return texts.iter().map(|t| self.classify(t)).collect();
        }

        let workers = std::thread::available_parallelism()
            .map_or(1, usize::from)
            .min(texts.len());
        let chunk_size = texts.len().div_ceil(workers);

        std::thread::scope(|scope| {
            let handles: Vec<_> = texts
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || chunk.iter().map(|t| self.classify(t)).collect::<Vec<_>>())
                })
                .collect();

            handles
                .into_iter()
                .zip(texts.chunks(chunk_size))
                .flat_map(|(handle, chunk)| {
                    handle.join().unwrap_or_else(|_| {
                        warn!("batch classification worker panicked, defaulting chunk to NEUTRAL");
                        vec![SentimentLabel::Neutral; chunk.len()]
                    })
                })
                .collect()
        })
    }
}

/// Keep at most `max_tokens` whitespace-separated tokens of `text`.
fn bound_tokens(text: &str, max_tokens: usize) -> &str {
    let trimmed = text.trim();
    match trimmed
        .split_whitespace()
        .nth(max_tokens)
        .map(|word| word.as_ptr() as usize - trimmed.as_ptr() as usize)
    {
        Some(end) => trimmed[..end].trim_end(),
        None => trimmed,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::error::{ChatError, Result};
    use std::sync::Mutex;

    /// Returns a fixed distribution and records what it was asked.
    pub(crate) struct FixedModel {
        pub polarity: Polarity,
        pub seen: Mutex<Vec<String>>,
    }

    impl FixedModel {
        pub(crate) fn new(negative: f32, neutral: f32, positive: f32) -> Self {
            Self {
                polarity: Polarity::new(negative, neutral, positive),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl SentimentModel for FixedModel {
        fn predict(&self, text: &str) -> Result<Polarity> {
            self.seen.lock().unwrap().push(text.to_owned());
            Ok(self.polarity)
        }
    }

    /// Fails the test if the model is ever consulted.
    pub(crate) struct UnreachableModel;

    impl SentimentModel for UnreachableModel {
        fn predict(&self, text: &str) -> Result<Polarity> {
            panic!("model must not be consulted for {text:?}");
        }
    }

    struct FailingModel;

    impl SentimentModel for FailingModel {
        fn predict(&self, _text: &str) -> Result<Polarity> {
            Err(ChatError::Model("inference exploded".to_owned()))
        }
    }

    fn classifier(model: impl SentimentModel + 'static) -> SentimentClassifier {
        SentimentClassifier::new(Arc::new(model), &SentimentConfig::default())
    }

    #[test]
    fn keyword_override_bypasses_model() {
        let c = classifier(UnreachableModel);
        assert_eq!(c.classify("I am so tired today"), SentimentLabel::Negative);
        assert_eq!(c.classify("ugh, totally exhausted"), SentimentLabel::Negative);
        assert_eq!(c.classify("fine only"), SentimentLabel::Neutral);
        assert_eq!(c.classify("It's my birthday"), SentimentLabel::Positive);
    }

    #[test]
    fn negative_keyword_wins_over_positive_model() {
        // A model that would say POSITIVE is never asked.
        let model = Arc::new(FixedModel::new(0.0, 0.0, 1.0));
        let c = SentimentClassifier::new(model.clone(), &SentimentConfig::default());
        assert_eq!(c.classify("feeling stressed"), SentimentLabel::Negative);
        assert!(model.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn negated_emotion_is_neutral() {
        let c = classifier(UnreachableModel);
        let result = c.classify_detailed("not tired anymore");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert!(matches!(
            result.source,
            ClassificationSource::Keyword { negated: true, .. }
        ));
    }

    #[test]
    fn model_used_when_no_rule_fires() {
        let c = classifier(FixedModel::new(0.1, 0.8, 0.1));
        let result = c.classify_detailed("the bus was on time");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert!(matches!(result.source, ClassificationSource::Model(_)));
    }

    #[test]
    fn low_confidence_neutral_leans_to_pole() {
        let c = classifier(FixedModel::new(0.32, 0.38, 0.30));
        assert_eq!(c.classify("the bus was on time"), SentimentLabel::Negative);
    }

    #[test]
    fn inference_failure_degrades_to_neutral() {
        let c = classifier(FailingModel);
        let result = c.classify_detailed("the bus was on time");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert!(matches!(result.source, ClassificationSource::ModelFailure(_)));
    }

    #[test]
    fn empty_input_is_neutral_without_model() {
        let c = classifier(UnreachableModel);
        assert_eq!(c.classify("   "), SentimentLabel::Neutral);
        assert_eq!(c.classify(""), SentimentLabel::Neutral);
    }

    #[test]
    fn model_input_is_bounded() {
        let model = Arc::new(FixedModel::new(0.1, 0.8, 0.1));
        let config = SentimentConfig {
            max_input_tokens: 4,
            ..SentimentConfig::default()
        };
        let c = SentimentClassifier::new(model.clone(), &config);
        c.classify("one two three four five six seven");
        assert_eq!(model.seen.lock().unwrap()[0], "one two three four");
    }

    #[test]
    fn bound_tokens_keeps_short_text() {
        assert_eq!(bound_tokens("  a b c ", 10), "a b c");
        assert_eq!(bound_tokens("a  b\tc d", 3), "a  b\tc");
    }

    #[test]
    fn batch_preserves_order() {
        let c = classifier(FixedModel::new(0.1, 0.8, 0.1));
        let texts = [
            "so tired",
            "the bus was on time",
            "what a wonderful day",
            "fine only",
            "hungry again",
        ];
        let labels = c.classify_batch(&texts);
        assert_eq!(
            labels,
            vec![
                SentimentLabel::Negative,
                SentimentLabel::Neutral,
                SentimentLabel::Positive,
                SentimentLabel::Neutral,
                SentimentLabel::Negative,
            ]
        );
    }

    #[test]
    fn batch_of_nothing_is_empty() {
        let c = classifier(UnreachableModel);
        assert!(c.classify_batch(&[]).is_empty());
    }

    #[test]
    fn label_scores_and_display() {
        assert_eq!(SentimentLabel::Negative.score(), -1);
        assert_eq!(SentimentLabel::Neutral.score(), 0);
        assert_eq!(SentimentLabel::Positive.score(), 1);
        assert_eq!(SentimentLabel::Positive.to_string(), "POSITIVE");
        assert_eq!(
            serde_json::to_string(&SentimentLabel::Negative).unwrap(),
            "\"NEGATIVE\""
        );
    }
}
