//! Curated replies used when generation fails or is rejected.
//!
//! # Priority
//!
//! 1. Topic keyword (tiredness, sadness, birthday, celebration, happiness,
//!    hunger) → the topic's fixed reply. Negated mentions ("not tired") do
//!    not count.
//! 2. A negated emotion ("not sad anymore") → acknowledgment reply.
//! 3. Random template from the set for the utterance's sentiment label.
//!
//! Selection never fails and never returns an empty string.

use super::{FallbackKind, ReplyResult};
use crate::config::FallbackConfig;
use crate::sentiment::SentimentLabel;
use crate::sentiment::rules::{self, KeywordRuleSet};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Used only when a configured template set is empty.
pub const LAST_RESORT_REPLY: &str = "Thanks for sharing that with me.";

/// A topic-specific reply triggered by keywords in the utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordReply {
    pub topic: String,
    pub triggers: Vec<String>,
    pub reply: String,
}

impl KeywordReply {
    fn new(topic: &str, triggers: &[&str], reply: &str) -> Self {
        Self {
            topic: topic.to_owned(),
            triggers: triggers.iter().map(|t| (*t).to_owned()).collect(),
            reply: reply.to_owned(),
        }
    }
}

/// Built-in topic replies, in priority order.
pub fn default_keyword_replies() -> Vec<KeywordReply> {
    vec![
        KeywordReply::new(
            "tiredness",
            &["tired", "exhausted", "sleepy", "drained", "worn out", "fatigued"],
            "Sounds like you've had a draining day. Try to get some proper rest tonight, you've earned it.",
        ),
        KeywordReply::new(
            "sadness",
            &["sad", "upset", "lonely", "heartbroken", "feeling down", "feel down"],
            "I'm sorry you're feeling low. It's okay to take things slowly today.",
        ),
        KeywordReply::new(
            "birthday",
            &["birthday", "bday"],
            "Happy birthday! I hope the day brings you plenty of good moments.",
        ),
        KeywordReply::new(
            "celebration",
            &["celebrat", "congratulations", "promotion", "party"],
            "That sounds like something worth celebrating. Enjoy every bit of it!",
        ),
        KeywordReply::new(
            "happiness",
            &["happy", "glad", "excited", "thrilled"],
            "Love hearing that! It's great when things go your way.",
        ),
        KeywordReply::new(
            "hunger",
            &["hungry", "starving", "starved", "famished"],
            "Sounds like it's time for a good meal. Go grab something tasty!",
        ),
    ]
}

/// Generic replies per sentiment label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackTemplates {
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
    pub positive: Vec<String>,
}

impl Default for FallbackTemplates {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| (*s).to_owned()).collect();
        Self {
            negative: owned(&[
                "I'm sorry things feel tough right now. Be gentle with yourself today.",
                "That sounds hard. It's okay to take a breather.",
                "I hear you. Rough days pass, even when they feel long.",
                "That sounds frustrating. I hope the rest of your day goes easier.",
            ]),
            neutral: owned(&[
                "Got it. How's the rest of your day going?",
                "Thanks for sharing. Anything on your mind right now?",
                "Okay! What are you up to next?",
                "Fair enough. How are you feeling about it?",
            ]),
            positive: owned(&[
                "That's wonderful to hear! Keep that good energy going.",
                "Love that! Sounds like things are going well for you.",
                "That's great news. Enjoy the moment!",
                "So glad to hear it! What made it so good?",
            ]),
        }
    }
}

impl FallbackTemplates {
    pub fn for_label(&self, label: SentimentLabel) -> &[String] {
        match label {
            SentimentLabel::Negative => &self.negative,
            SentimentLabel::Neutral => &self.neutral,
            SentimentLabel::Positive => &self.positive,
        }
    }
}

/// Picks a curated reply. Randomness comes from an injected generator.
pub struct FallbackSelector {
    keyword_replies: Vec<KeywordReply>,
    negation_reply: String,
    empty_input_reply: String,
    templates: FallbackTemplates,
    rules: KeywordRuleSet,
    rng: Box<dyn RngCore + Send>,
}

impl std::fmt::Debug for FallbackSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackSelector")
            .field("keyword_replies", &self.keyword_replies.len())
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

impl FallbackSelector {
    /// Create a selector seeded from OS entropy.
    ///
    /// `rules` supplies the negation markers and emotion words.
    pub fn new(config: &FallbackConfig, rules: &KeywordRuleSet) -> Self {
        Self::with_rng(config, rules, Box::new(StdRng::from_entropy()))
    }

    /// Create a selector drawing from `rng`.
    pub fn with_rng(
        config: &FallbackConfig,
        rules: &KeywordRuleSet,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        Self {
            keyword_replies: config.keyword_replies.clone(),
            negation_reply: config.negation_reply.clone(),
            empty_input_reply: config.empty_input_reply.clone(),
            templates: config.templates.clone(),
            rules: rules.clone(),
            rng,
        }
    }

    pub fn templates(&self) -> &FallbackTemplates {
        &self.templates
    }

    /// Choose a reply for `text` classified as `label`.
    pub fn select(&mut self, text: &str, label: SentimentLabel) -> ReplyResult {
        let normalized = rules::normalize(text);
        if normalized.is_empty() {
            return ReplyResult::fallback(
                non_empty(&self.empty_input_reply),
                FallbackKind::EmptyInput,
            );
        }

        if let Some(hit) = self.keyword_reply(&normalized) {
            debug!(topic = hit.topic.as_str(), "fallback keyword reply");
            return ReplyResult::fallback(
                non_empty(&hit.reply),
                FallbackKind::Keyword(hit.topic.clone()),
            );
        }

        if self.rules.has_negated_emotion(&normalized) {
            debug!("fallback negation acknowledgment");
            return ReplyResult::fallback(non_empty(&self.negation_reply), FallbackKind::Negation);
        }

        let text = self
            .templates
            .for_label(label)
            .choose(&mut self.rng)
            .map_or(LAST_RESORT_REPLY, |t| non_empty(t));
        debug!(label = %label, "fallback template reply");
        ReplyResult::fallback(text, FallbackKind::Template)
    }

    fn keyword_reply(&self, normalized: &str) -> Option<&KeywordReply> {
        self.keyword_replies.iter().find(|kr| {
            kr.triggers.iter().any(|t| {
                let trigger = t.to_lowercase();
                !trigger.is_empty() && self.rules.contains_unnegated(normalized, &trigger)
            })
        })
    }
}

fn non_empty(text: &str) -> &str {
    if text.trim().is_empty() {
        LAST_RESORT_REPLY
    } else {
        text
    }
}
