//! Cleanup of raw generator output.
//!
//! Small local models drift into disclaimers ("As an AI language model..."),
//! role-tag echoes, and numbered walkthroughs. The sanitizer keeps at most two
//! substantive sentences and caps the word count.

use crate::config::SanitizerConfig;

/// Sanitized reply text. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedReply {
    text: String,
    sentences: usize,
    truncated: bool,
}

impl CleanedReply {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of sentence segments kept.
    pub fn sentence_count(&self) -> usize {
        self.sentences
    }

    /// Whether the word cap cut the reply short.
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }
}

impl From<&str> for CleanedReply {
    /// Wrap already-clean text, e.g. to run it through the usability gate.
    fn from(text: &str) -> Self {
        let text = text.trim().to_owned();
        let sentences = usize::from(!text.is_empty());
        Self {
            text,
            sentences,
            truncated: false,
        }
    }
}

/// Strips meta-commentary and enforces sentence and word limits.
#[derive(Debug, Clone)]
pub struct ReplySanitizer {
    meta_markers: Vec<String>,
    min_line_chars: usize,
    min_sentence_chars: usize,
    max_sentences: usize,
    max_words: usize,
    ellipsis: String,
}

impl ReplySanitizer {
    pub fn new(config: &SanitizerConfig) -> Self {
        Self {
            meta_markers: config
                .meta_markers
                .iter()
                .map(|m| m.to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
            min_line_chars: config.min_line_chars,
            min_sentence_chars: config.min_sentence_chars,
            max_sentences: config.max_sentences,
            max_words: config.max_words,
            ellipsis: config.ellipsis.clone(),
        }
    }

    /// Clean raw generator output. `None` means the generator produced nothing.
    pub fn clean(&self, raw: Option<&str>) -> CleanedReply {
        let Some(raw) = raw else {
            return CleanedReply::empty();
        };

        let kept_lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|line| line.chars().count() >= self.min_line_chars)
            .filter(|line| !self.is_meta(line))
            .collect();
        if kept_lines.is_empty() {
            return CleanedReply::empty();
        }

        let joined = kept_lines.join(" ");
        let segments: Vec<&str> = joined
            .split('.')
            .map(str::trim)
            .filter(|s| s.chars().count() > self.min_sentence_chars)
            .take(self.max_sentences)
            .collect();
        if segments.is_empty() {
            return CleanedReply::empty();
        }

        let mut text = segments.join(". ");
        if !text.ends_with(['!', '?']) {
            text.push('.');
        }

        let (text, truncated) = self.cap_words(&text);
        CleanedReply {
            text,
            sentences: segments.len(),
            truncated,
        }
    }

    fn is_meta(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.meta_markers.iter().any(|m| lower.contains(m.as_str()))
    }

    fn cap_words(&self, text: &str) -> (String, bool) {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() <= self.max_words || self.max_words == 0 {
            return (text.to_owned(), false);
        }

        let cut = self.max_words - 1;
        let mut out = words[..cut].join(" ");
        let last = words[cut];
        let stripped = last.trim_end_matches(['.', ',', ';', ':', '!', '?']);
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(if stripped.is_empty() { last } else { stripped });
        out.push_str(&self.ellipsis);
        (out, true)
    }
}

impl Default for ReplySanitizer {
    fn default() -> Self {
        Self::new(&SanitizerConfig::default())
    }
}
