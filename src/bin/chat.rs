//! Terminal chat loop for moodchat.
//!
//! Reads one utterance per line from stdin, prints the detected sentiment and
//! the reply, and prints a conversation report on exit. Tracing output goes
//! to stderr so that stdout stays the transcript.
//!
//! Usage: `moodchat [--config PATH] [--json]`

use anyhow::Context;
use moodchat::{ChatConfig, ChatSession, ConversationSummary};
use std::io::{BufRead, Write};
use std::path::PathBuf;

const USAGE: &str = "usage: moodchat [--config PATH] [--json]";

struct Args {
    config: Option<PathBuf>,
    json: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut parsed = Args {
        config: None,
        json: false,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().context(USAGE)?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--json" => parsed.json = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => anyhow::bail!("unexpected argument {other:?}\n{USAGE}"),
        }
    }
    Ok(parsed)
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ChatConfig> {
    if let Some(path) = path {
        return ChatConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }
    let default_path = ChatConfig::default_config_path();
    if default_path.exists() {
        tracing::info!(path = %default_path.display(), "loading config");
        return ChatConfig::from_file(&default_path)
            .with_context(|| format!("failed to load config from {}", default_path.display()));
    }
    Ok(ChatConfig::default())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("moodchat=info,ort=warn,hf_hub=warn")
            }),
        )
        .init();

    let args = parse_args()?;
    let config = load_config(args.config.as_ref())?;
    let mut session = ChatSession::from_config(&config).context("failed to start session")?;

    let exit_hint = config.conversation.exit_keywords.join("/");
    println!("moodchat v{} (type {exit_hint} to finish)", env!("CARGO_PKG_VERSION"));

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("you> ");
        stdout.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if session.is_exit(&line) {
            break;
        }

        let outcome = session.submit(&line);
        println!("[{}] bot> {}", outcome.label, outcome.reply);
    }

    print_report(&session.finish(), args.json)
}

fn print_report(summary: &ConversationSummary, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!();
    println!("Overall sentiment: {}", summary.overall);
    println!("Trend: {}", summary.trend);
    if !summary.labels.is_empty() {
        let per_message: Vec<&str> = summary.labels.iter().map(|l| l.as_str()).collect();
        println!("Per message: {}", per_message.join(", "));
    }
    Ok(())
}
