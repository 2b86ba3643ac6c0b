//! Scripted engine for tests
//!
//! Plays back canned output lines instead of running a real engine. Once
//! the script runs dry it behaves like an engine that never answers.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::link::EngineLink;
use crate::protocol::{parse_best_move, Command};

/// Engine stand-in fed from a list of output lines
pub struct ScriptedEngine {
    output: VecDeque<String>,
    transcript: Transcript,
}

/// What a [`ScriptedEngine`] was told; shareable after the engine moves away
#[derive(Clone, Default)]
pub struct Transcript {
    sent: Arc<Mutex<Vec<Command>>>,
    shut_down: Arc<AtomicBool>,
}

impl ScriptedEngine {
    pub fn new<I, S>(output: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output: output.into_iter().map(Into::into).collect(),
            transcript: Transcript::default(),
        }
    }

    pub fn transcript(&self) -> Transcript {
        self.transcript.clone()
    }
}

impl Transcript {
    pub fn sent(&self) -> Vec<Command> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Sent commands as wire text
    pub fn sent_text(&self) -> Vec<String> {
        self.sent().iter().map(ToString::to_string).collect()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }
}

#[async_trait]
impl EngineLink for ScriptedEngine {
    async fn send(&mut self, command: &Command) -> Result<(), EngineError> {
        self.transcript
            .sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.clone());
        Ok(())
    }

    async fn await_best_move(&mut self, cancel: &CancellationToken) -> Result<String, EngineError> {
        while let Some(line) = self.output.pop_front() {
            if let Some(mv) = parse_best_move(&line) {
                return Ok(mv);
            }
        }
        cancel.cancelled().await;
        Err(EngineError::Cancelled)
    }

    async fn shutdown(&mut self) -> Result<(), EngineError> {
        self.transcript.shut_down.store(true, Ordering::Release);
        Ok(())
    }
}
