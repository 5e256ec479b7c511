//! External generative model invocation.
//!
//! The reply text comes from a local model run as a child process
//! (`ollama run phi` by default). The prompt is written to the child's stdin
//! and its stdout is the raw reply. The child is killed if it runs past the
//! configured timeout.

use crate::config::GenerationConfig;
use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Why a generation attempt produced no text.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The generator program could not be started.
    #[error("failed to spawn generator: {0}")]
    Spawn(std::io::Error),

    /// The generator ran past its deadline and was killed.
    #[error("generator timed out after {secs}s")]
    Timeout { secs: f64 },

    /// The generator exited unsuccessfully.
    #[error("generator exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    /// The generator succeeded but wrote nothing.
    #[error("generator produced no output")]
    EmptyOutput,

    /// Waiting on the child process failed.
    #[error("generator I/O error: {0}")]
    Io(std::io::Error),
}

/// Produces raw reply text for a prompt.
pub trait ReplyGenerator: Send + Sync {
    /// Generate a raw reply. The output is untrusted and must be sanitized.
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Runs an external program with the prompt on stdin.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.args.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ReplyGenerator for CommandGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let start = Instant::now();
        let deadline = start + self.timeout;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(GenerationError::Spawn)?;

        // Pipes are drained on their own threads so a chatty child never
        // blocks on a full buffer while we poll.
        if let Some(mut stdin) = child.stdin.take() {
            let prompt = prompt.to_owned();
            std::thread::spawn(move || {
                // A child that exits without reading stdin closes the pipe early.
                let _ = stdin.write_all(prompt.as_bytes());
            });
        }
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if start.elapsed() > self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        warn!(
                            program = self.program.as_str(),
                            timeout_secs = self.timeout.as_secs_f64(),
                            "generator timed out, killed"
                        );
                        // Reader threads are left to finish on their own; a
                        // grandchild may still hold the pipes open.
                        return Err(GenerationError::Timeout {
                            secs: self.timeout.as_secs_f64(),
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    return Err(GenerationError::Io(e));
                }
            }
        };

        // The pipes stay open while any descendant still holds them, so the
        // remaining output is awaited against the same deadline.
        let (Some(stdout), Some(stderr)) = (collect(stdout, deadline), collect(stderr, deadline))
        else {
            warn!(
                program = self.program.as_str(),
                timeout_secs = self.timeout.as_secs_f64(),
                "generator output still open at deadline"
            );
            return Err(GenerationError::Timeout {
                secs: self.timeout.as_secs_f64(),
            });
        };
        debug!(
            program = self.program.as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            bytes = stdout.len(),
            "generator finished"
        );

        if !status.success() {
            return Err(GenerationError::NonZeroExit {
                code: status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&stderr).trim().to_owned(),
            });
        }

        let text = String::from_utf8_lossy(&stdout).into_owned();
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyOutput);
        }
        Ok(text)
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });
    rx
}

/// Wait for a drained pipe until `deadline`. `None` means it was still open.
fn collect(rx: Option<Receiver<Vec<u8>>>, deadline: Instant) -> Option<Vec<u8>> {
    let Some(rx) = rx else {
        return Some(Vec::new());
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(buf) => Some(buf),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(Vec::new()),
    }
}
