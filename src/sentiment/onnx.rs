//! Pretrained RoBERTa polarity model via ONNX Runtime.
//!
//! Defaults to the Twitter-RoBERTa sentiment checkpoint exported to ONNX.
//! The model is downloaded from HuggingFace Hub on first use and cached by
//! `hf-hub`.
//!
//! # Pipeline
//!
//! ```text
//! text → tokenizer (truncated) → ONNX model → 3 logits → softmax
//! ```

use super::model::{Polarity, SentimentModel};
use crate::config::SentimentConfig;
use crate::error::{ChatError, Result};
use ort::session::{Session, SessionInputValue, SessionInputs};
use ort::value::Tensor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// Number of output classes (`negative`, `neutral`, `positive`).
const NUM_LABELS: usize = 3;

struct Inner {
    session: Session,
    tokenizer: tokenizers::Tokenizer,
}

/// Sentiment model backed by an ONNX sequence-classification export.
///
/// The session is guarded by a mutex so one loaded model can be shared by
/// every classifier in the process.
pub struct OnnxSentimentModel {
    inner: Mutex<Inner>,
    max_tokens: usize,
}

impl std::fmt::Debug for OnnxSentimentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxSentimentModel")
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl OnnxSentimentModel {
    /// Load the model from pre-downloaded files.
    ///
    /// # Errors
    ///
    /// Returns an error if the ONNX model or tokenizer cannot be loaded.
    pub fn new(model_path: &Path, tokenizer_path: &Path, config: &SentimentConfig) -> Result<Self> {
        info!("loading sentiment ONNX model: {}", model_path.display());
        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(config.intra_threads))
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| ChatError::Model(format!("sentiment model load failed: {e}")))?;

        info!("loading sentiment tokenizer: {}", tokenizer_path.display());
        let mut tokenizer = tokenizers::Tokenizer::from_file(tokenizer_path)
            .map_err(|e| ChatError::Model(format!("sentiment tokenizer load failed: {e}")))?;

        let truncation = tokenizers::TruncationParams {
            max_length: config.max_input_tokens,
            ..Default::default()
        };
        tokenizer
            .with_truncation(Some(truncation))
            .map_err(|e| ChatError::Model(format!("tokenizer truncation config failed: {e}")))?;
        tokenizer.with_padding(None);

        info!(max_tokens = config.max_input_tokens, "sentiment model ready");

        Ok(Self {
            inner: Mutex::new(Inner { session, tokenizer }),
            max_tokens: config.max_input_tokens,
        })
    }

    /// Download the configured model files from HuggingFace Hub.
    ///
    /// Returns `(model_path, tokenizer_path)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails.
    pub fn download_model(config: &SentimentConfig) -> Result<(PathBuf, PathBuf)> {
        info!("downloading sentiment model: {}", config.model_repo);
        let api = hf_hub::api::sync::Api::new()
            .map_err(|e| ChatError::Model(format!("HF Hub API init failed: {e}")))?;
        let repo = api.model(config.model_repo.clone());

        let model_path = repo.get(&config.model_file).map_err(|e| {
            ChatError::Model(format!("failed to download {}: {e}", config.model_file))
        })?;
        let tokenizer_path = repo.get(&config.tokenizer_file).map_err(|e| {
            ChatError::Model(format!("failed to download {}: {e}", config.tokenizer_file))
        })?;

        Ok((model_path, tokenizer_path))
    }

    /// Download the model and load it in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if download or loading fails.
    pub fn download_and_load(config: &SentimentConfig) -> Result<Self> {
        let (model_path, tokenizer_path) = Self::download_model(config)?;
        Self::new(&model_path, &tokenizer_path, config)
    }
}

impl SentimentModel for OnnxSentimentModel {
    fn predict(&self, text: &str) -> Result<Polarity> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| ChatError::Model("sentiment model lock poisoned".to_owned()))?;

        let encoding = inner
            .tokenizer
            .encode(text, true)
            .map_err(|e| ChatError::Model(format!("tokenization failed: {e}")))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let seq_len = input_ids.len();
        if seq_len == 0 {
            return Err(ChatError::Model("tokenizer produced no tokens".to_owned()));
        }

        let ids_tensor = Tensor::from_array(([1, seq_len], input_ids))
            .map_err(|e| ChatError::Model(format!("failed to create input_ids tensor: {e}")))?;
        let mask_tensor = Tensor::from_array(([1, seq_len], attention_mask)).map_err(|e| {
            ChatError::Model(format!("failed to create attention_mask tensor: {e}"))
        })?;

        let mut feed: HashMap<String, SessionInputValue> = HashMap::new();
        feed.insert("input_ids".to_owned(), ids_tensor.into());
        feed.insert("attention_mask".to_owned(), mask_tensor.into());

        let outputs = inner
            .session
            .run(SessionInputs::from(feed))
            .map_err(|e| ChatError::Model(format!("ONNX inference failed: {e}")))?;

        // Output shape: [1, 3] logits.
        let (_shape, data) = outputs[0_usize]
            .try_extract_tensor::<f32>()
            .map_err(|e| ChatError::Model(format!("failed to extract logits: {e}")))?;

        logits_from_slice(data).map(Polarity::from_logits)
    }
}

fn logits_from_slice(data: &[f32]) -> Result<[f32; NUM_LABELS]> {
    match data {
        [negative, neutral, positive] => Ok([*negative, *neutral, *positive]),
        other => Err(ChatError::Model(format!(
            "expected {NUM_LABELS} logits, got {}",
            other.len()
        ))),
    }
}
