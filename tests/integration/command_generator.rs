//! External-process generation wired into a session.

use crate::helpers::StaticModel;
use moodchat::reply::fallback::FallbackSelector;
use moodchat::{ChatConfig, ChatSession, CommandGenerator, ReplyOrigin};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;

fn session_with(generator: CommandGenerator) -> ChatSession {
    let config = ChatConfig::default();
    let fallback = FallbackSelector::with_rng(
        &config.fallback,
        &config.sentiment.rules,
        Box::new(StdRng::seed_from_u64(9)),
    );
    ChatSession::new(
        &config,
        Arc::new(StaticModel::neutral()),
        Arc::new(generator),
        fallback,
    )
}

#[test]
fn process_output_becomes_the_reply() {
    let generator = CommandGenerator::new(
        "sh",
        vec![
            "-c".to_owned(),
            "cat >/dev/null; echo 'That sounds like a calm and steady afternoon.'".to_owned(),
        ],
        Duration::from_secs(5),
    );
    let mut chat = session_with(generator);
    let outcome = chat.submit("spent the afternoon reading");
    assert_eq!(outcome.reply.origin, ReplyOrigin::Generated);
    assert_eq!(
        outcome.reply.text,
        "That sounds like a calm and steady afternoon."
    );
}

#[test]
fn hung_process_is_killed_and_replaced() {
    let generator = CommandGenerator::new(
        "sleep",
        vec!["10".to_owned()],
        Duration::from_millis(300),
    );
    let mut chat = session_with(generator);
    let start = std::time::Instant::now();
    let outcome = chat.submit("I'm starving");
    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(outcome.reply.is_fallback());
    assert!(outcome.reply.text.contains("meal"));
}
