//! Engine connection seam

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::protocol::Command;

/// A connection that takes commands and answers with a best move.
///
/// The subprocess implements this; tests substitute scripted engines.
#[async_trait]
pub trait EngineLink: Send {
    /// Write one command without waiting for any reply
    async fn send(&mut self, command: &Command) -> Result<(), EngineError>;

    /// Wait for the next `bestmove` and return the raw token after it
    async fn await_best_move(&mut self, cancel: &CancellationToken) -> Result<String, EngineError>;

    /// Ask the engine to quit and release it
    async fn shutdown(&mut self) -> Result<(), EngineError>;
}
