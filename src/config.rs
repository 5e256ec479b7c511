//! Configuration types for the sentiment and reply pipeline.
//!
//! Every tunable threshold lives here rather than inline in the classifier or
//! sanitizer, so behaviour can be adjusted from a TOML file.

use crate::reply::fallback::{FallbackTemplates, KeywordReply};
use crate::reply::prompt::ToneProfile;
use crate::sentiment::rules::KeywordRuleSet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Sentiment classification settings.
    pub sentiment: SentimentConfig,
    /// Conversation summary and exit settings.
    pub conversation: ConversationConfig,
    /// Prompt construction settings.
    pub prompt: PromptConfig,
    /// Generated reply cleanup settings.
    pub sanitizer: SanitizerConfig,
    /// Reply usability thresholds.
    pub gate: GateConfig,
    /// Curated fallback replies.
    pub fallback: FallbackConfig,
    /// External generative model invocation.
    pub generation: GenerationConfig,
}

/// Sentiment classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// A NEUTRAL model prediction below this probability is replaced by the
    /// stronger of NEGATIVE and POSITIVE.
    pub confidence_threshold: f32,
    /// Maximum number of tokens passed to the model.
    pub max_input_tokens: usize,
    /// HuggingFace repo holding the ONNX export.
    pub model_repo: String,
    /// ONNX model filename inside the repo.
    pub model_file: String,
    /// Tokenizer filename inside the repo.
    pub tokenizer_file: String,
    /// ONNX Runtime intra-op thread count.
    pub intra_threads: usize,
    /// Keyword override rules.
    pub rules: KeywordRuleSet,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            max_input_tokens: 128,
            model_repo: "Xenova/twitter-roberta-base-sentiment-latest".to_owned(),
            model_file: "onnx/model.onnx".to_owned(),
            tokenizer_file: "tokenizer.json".to_owned(),
            intra_threads: 2,
            rules: KeywordRuleSet::default(),
        }
    }
}

/// Conversation-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Mean score above `+t` is POSITIVE, below `-t` NEGATIVE.
    pub overall_threshold: f32,
    /// Third-sum difference beyond which a trend counts as significant.
    pub significant_trend_delta: f32,
    /// Inputs that end the conversation (case-insensitive).
    pub exit_keywords: Vec<String>,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            overall_threshold: 0.3,
            significant_trend_delta: 0.5,
            exit_keywords: vec!["exit".to_owned(), "quit".to_owned(), "done".to_owned()],
        }
    }
}

/// Prompt construction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Number of prior utterances included as context.
    pub history_window: usize,
    /// Opening persona line.
    pub persona: String,
    /// Tone instruction per sentiment label.
    pub tone: ToneProfile,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            history_window: 2,
            persona: "You are a friendly, concise companion.".to_owned(),
            tone: ToneProfile::default(),
        }
    }
}

/// Reply sanitizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Lines containing any of these (case-insensitive) are dropped.
    pub meta_markers: Vec<String>,
    /// Lines shorter than this many characters are dropped.
    pub min_line_chars: usize,
    /// Sentence segments must be longer than this many characters.
    pub min_sentence_chars: usize,
    /// Maximum number of sentences kept.
    pub max_sentences: usize,
    /// Maximum number of words kept.
    pub max_words: usize,
    /// Appended to the last word when the reply is truncated.
    pub ellipsis: String,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            meta_markers: [
                "as an ai",
                "as a language model",
                "language model",
                "i am an ai",
                "i'm an ai",
                "i cannot",
                "i am not capable",
                "i do not have the capability",
                "i do not have the ability",
                "let's imagine",
                "let us imagine",
                "let's assume",
                "consider that you are",
                "the following statements",
                "based on this information",
                "step 1",
                "step 2",
                "here's a list",
                "here is a list",
                "assistant:",
                "user:",
            ]
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
            min_line_chars: 3,
            min_sentence_chars: 5,
            max_sentences: 2,
            max_words: 40,
            ellipsis: "...".to_owned(),
        }
    }
}

/// Usability gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Replies shorter than this many characters are rejected.
    pub min_chars: usize,
    /// Replies containing any of these (case-insensitive) are rejected.
    pub filler_phrases: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_chars: 20,
            filler_phrases: [
                "i'm here to help",
                "i am here to help",
                "here to help you",
                "tell me more",
                "let me think",
                "how can i help",
                "how can i assist",
            ]
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
        }
    }
}

/// Fallback reply configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Reply when the user says a negative feeling has passed.
    pub negation_reply: String,
    /// Reply when the utterance is empty.
    pub empty_input_reply: String,
    /// Topic-specific replies, checked in order before anything else.
    pub keyword_replies: Vec<KeywordReply>,
    /// Generic replies per sentiment label.
    pub templates: FallbackTemplates,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            negation_reply: "Good to hear that feeling has eased. What helped turn things around?"
                .to_owned(),
            empty_input_reply: "I didn't quite catch that. Could you say it again?".to_owned(),
            keyword_replies: crate::reply::fallback::default_keyword_replies(),
            templates: FallbackTemplates::default(),
        }
    }
}

/// External generative model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Executable to run.
    pub program: String,
    /// Arguments passed to the executable; the prompt goes to stdin.
    pub args: Vec<String>,
    /// Kill the process after this many seconds.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            program: "ollama".to_owned(),
            args: vec!["run".to_owned(), "phi".to_owned()],
            timeout_secs: 12,
        }
    }
}

impl ChatConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::ChatError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ChatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/moodchat/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("moodchat")
            .join("config.toml")
    }
}
