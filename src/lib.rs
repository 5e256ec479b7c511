//! Moodchat: sentiment-aware conversational replies.
//!
//! Each user utterance is classified into a coarse polarity label, which then
//! steers a constrained reply pipeline:
//! Utterance → SentimentClassifier → PromptBuilder → generator → ReplySanitizer
//! → UsabilityGate → reply (or FallbackSelector)
//!
//! # Architecture
//!
//! - **Sentiment**: keyword overrides first, then a pretrained RoBERTa
//!   polarity model run through ONNX Runtime (`ort`)
//! - **Generation**: an external local model process (`ollama run phi`) with
//!   a hard timeout
//! - **Reply shaping**: sanitizer, usability gate, curated fallbacks
//! - **Conversation**: append-only history and an end-of-conversation
//!   overall label and trend

pub mod config;
pub mod conversation;
pub mod error;
pub mod generation;
pub mod reply;
pub mod sentiment;
pub mod session;

pub use config::ChatConfig;
pub use conversation::{ConversationAggregator, ConversationSummary, TrendJudgment, Utterance};
pub use error::{ChatError, Result};
pub use generation::{CommandGenerator, GenerationError, ReplyGenerator};
pub use reply::pipeline::ReplyPipeline;
pub use reply::{ReplyOrigin, ReplyResult};
pub use sentiment::{SentimentClassifier, SentimentLabel};
pub use session::{ChatSession, TurnOutcome};
