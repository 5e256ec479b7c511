//! Whole-turn behaviour through `ChatSession`.

use crate::helpers::{RecordingGenerator, Script, StaticModel, session};
use moodchat::reply::FallbackKind;
use moodchat::reply::prompt::ToneProfile;
use moodchat::{ChatConfig, ReplyOrigin, SentimentLabel};
use std::sync::Arc;

#[test]
fn tired_user_gets_tiredness_reply_when_generation_times_out() {
    let config = ChatConfig::default();
    let model = Arc::new(StaticModel::new(0.0, 0.0, 1.0));
    let generator = Arc::new(RecordingGenerator::new(Script::Timeout));
    let mut chat = session(&config, model.clone(), generator.clone());

    let outcome = chat.submit("I am so tired today");

    // Keyword override: the model is never asked.
    assert_eq!(outcome.label, SentimentLabel::Negative);
    assert_eq!(*model.calls.lock().unwrap(), 0);

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(ToneProfile::default().negative.as_str()));

    let tiredness = config
        .fallback
        .keyword_replies
        .iter()
        .find(|k| k.topic == "tiredness")
        .unwrap();
    assert_eq!(outcome.reply.text, tiredness.reply);
    assert_eq!(
        outcome.reply.origin,
        ReplyOrigin::Fallback(FallbackKind::Keyword("tiredness".to_owned()))
    );
    assert!(!config.fallback.templates.negative.contains(&outcome.reply.text));
}

#[test]
fn meta_commentary_reply_is_replaced() {
    let config = ChatConfig::default();
    let generator = Arc::new(RecordingGenerator::new(Script::Reply(
        "As an AI language model, I cannot have feelings.".to_owned(),
    )));
    let mut chat = session(&config, Arc::new(StaticModel::neutral()), generator);

    let outcome = chat.submit("the meeting moved to thursday");
    assert_eq!(outcome.label, SentimentLabel::Neutral);
    assert_eq!(
        outcome.reply.origin,
        ReplyOrigin::Fallback(FallbackKind::Template)
    );
    assert!(config.fallback.templates.neutral.contains(&outcome.reply.text));
}

#[test]
fn clean_generated_reply_is_delivered() {
    let config = ChatConfig::default();
    let generator = Arc::new(RecordingGenerator::new(Script::Reply(
        "Congrats on the new job! That must feel amazing. Tell your family too.\n\nUser: thanks"
            .to_owned(),
    )));
    let mut chat = session(&config, Arc::new(StaticModel::neutral()), generator);

    let outcome = chat.submit("I got the job!");
    assert_eq!(outcome.reply.origin, ReplyOrigin::Generated);
    assert_eq!(
        outcome.reply.text,
        "Congrats on the new job! That must feel amazing. Tell your family too."
    );
}

#[test]
fn negated_feeling_is_neutral_and_acknowledged() {
    let config = ChatConfig::default();
    let generator = Arc::new(RecordingGenerator::new(Script::Empty));
    let mut chat = session(&config, Arc::new(StaticModel::neutral()), generator);

    let outcome = chat.submit("I'm not stressed anymore");
    assert_eq!(outcome.label, SentimentLabel::Neutral);
    assert_eq!(outcome.reply.origin, ReplyOrigin::Fallback(FallbackKind::Negation));
    assert_eq!(outcome.reply.text, config.fallback.negation_reply);
}

#[test]
fn every_turn_yields_a_non_empty_reply() {
    let config = ChatConfig::default();
    let generator = Arc::new(RecordingGenerator::new(Script::Reply("ok".to_owned())));
    let mut chat = session(&config, Arc::new(StaticModel::neutral()), generator);

    for text in ["", "hmm", "fine only", "so hungry", "what a fantastic day", "  "] {
        let outcome = chat.submit(text);
        assert!(!outcome.reply.text.trim().is_empty(), "empty reply for {text:?}");
        assert!(outcome.reply.is_fallback(), "short reply accepted for {text:?}");
    }
}
