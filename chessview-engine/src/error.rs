//! Engine failures

use std::time::Duration;

/// Failure talking to the engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to launch engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("engine i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine closed its output before answering")]
    Closed,

    #[error("engine gave no best move within {0:?}")]
    Timeout(Duration),

    #[error("wait for the engine was cancelled")]
    Cancelled,

    #[error("engine worker is no longer running")]
    WorkerGone,
}
