//! End-of-conversation summaries.

use crate::helpers::{RecordingGenerator, Script, StaticModel, session};
use moodchat::{ChatConfig, SentimentLabel, TrendJudgment};
use std::sync::Arc;

#[test]
fn mood_that_lifts_is_reported_as_improving() {
    let config = ChatConfig::default();
    let generator = Arc::new(RecordingGenerator::new(Script::Timeout));
    let mut chat = session(&config, Arc::new(StaticModel::neutral()), generator);

    for text in [
        "I'm exhausted",
        "work was awful",
        "the bus was on time",
        "lunch was at noon",
        "got some great news",
        "so happy right now",
    ] {
        chat.submit(text);
    }

    let summary = chat.finish();
    assert_eq!(summary.labels.len(), 6);
    assert_eq!(summary.labels[0], SentimentLabel::Negative);
    assert_eq!(summary.labels[5], SentimentLabel::Positive);
    assert_eq!(summary.overall, SentimentLabel::Neutral);
    assert_eq!(summary.trend, TrendJudgment::ImprovedSignificantly);
}

#[test]
fn short_conversation_reports_too_short() {
    let config = ChatConfig::default();
    let generator = Arc::new(RecordingGenerator::new(Script::Timeout));
    let mut chat = session(&config, Arc::new(StaticModel::neutral()), generator);

    chat.submit("what a wonderful morning");
    chat.submit("love this weather");

    let summary = chat.finish();
    assert_eq!(summary.overall, SentimentLabel::Positive);
    assert_eq!(summary.trend, TrendJudgment::TooShort);
    assert_eq!(summary.trend.to_string(), "Conversation too short to detect trend");
}

#[test]
fn summary_serializes_for_json_report() {
    let config = ChatConfig::default();
    let generator = Arc::new(RecordingGenerator::new(Script::Timeout));
    let mut chat = session(&config, Arc::new(StaticModel::neutral()), generator);
    chat.submit("so tired");

    let json = serde_json::to_value(chat.finish()).unwrap();
    assert_eq!(json["overall"], "NEGATIVE");
    assert_eq!(json["labels"][0], "NEGATIVE");
}

#[test]
fn batch_classification_matches_turn_labels() {
    let config = ChatConfig::default();
    let generator = Arc::new(RecordingGenerator::new(Script::Timeout));
    let mut chat = session(&config, Arc::new(StaticModel::neutral()), generator);

    let texts = ["so tired", "fine only", "what a wonderful day", "the bus came"];
    let batch = chat.classifier().classify_batch(&texts);
    for text in texts {
        chat.submit(text);
    }
    assert_eq!(batch, chat.conversation().labels());
}
