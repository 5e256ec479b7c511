//! Config file persistence.

use moodchat::ChatConfig;
use moodchat::reply::fallback::KeywordReply;
use tempfile::TempDir;

#[test]
fn default_config_survives_save_and_load() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("moodchat").join("config.toml");

    let config = ChatConfig::default();
    config.save_to_file(&path).unwrap();
    let loaded = ChatConfig::from_file(&path).unwrap();

    assert_eq!(loaded.sentiment.rules, config.sentiment.rules);
    assert_eq!(loaded.fallback.keyword_replies, config.fallback.keyword_replies);
    assert_eq!(loaded.fallback.templates, config.fallback.templates);
    assert_eq!(loaded.prompt.tone, config.prompt.tone);
    assert_eq!(loaded.sanitizer.meta_markers, config.sanitizer.meta_markers);
    assert_eq!(loaded.generation.args, config.generation.args);
}

#[test]
fn custom_keyword_replies_load_from_toml() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[conversation]
exit_keywords = ["bye"]

[[fallback.keyword_replies]]
topic = "rain"
triggers = ["rain", "drizzle"]
reply = "Sounds like a day for a warm drink indoors."
"#,
    )
    .unwrap();

    let config = ChatConfig::from_file(&path).unwrap();
    assert_eq!(config.conversation.exit_keywords, vec!["bye"]);
    assert_eq!(
        config.fallback.keyword_replies,
        vec![KeywordReply {
            topic: "rain".to_owned(),
            triggers: vec!["rain".to_owned(), "drizzle".to_owned()],
            reply: "Sounds like a day for a warm drink indoors.".to_owned(),
        }]
    );
    assert!(!config.fallback.templates.positive.is_empty());
}
