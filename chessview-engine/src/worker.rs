//! Background task that owns the engine
//!
//! The frame loop hands over a batch of commands and gets a one-shot
//! receiver back, then keeps animating and polls the receiver each frame.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::link::EngineLink;
use crate::protocol::Command;

/// Pending answer to a submitted request
pub type BestMoveReceiver = oneshot::Receiver<Result<String, EngineError>>;

/// Requests queued ahead of the one being served
const QUEUE_DEPTH: usize = 8;

struct Job {
    commands: Vec<Command>,
    reply: oneshot::Sender<Result<String, EngineError>>,
}

/// Handle to the engine worker task
pub struct EngineHandle {
    jobs: mpsc::Sender<Job>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl EngineHandle {
    /// Move `link` onto its own task
    pub fn spawn<L>(link: L) -> Self
    where
        L: EngineLink + 'static,
    {
        let (jobs, rx) = mpsc::channel(QUEUE_DEPTH);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_worker(link, rx, cancel.clone()));
        Self { jobs, cancel, task }
    }

    /// Send `commands` in order, then wait for the engine's best move
    pub fn submit(&self, commands: Vec<Command>) -> Result<BestMoveReceiver, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.jobs
            .try_send(Job { commands, reply })
            .map_err(|_| EngineError::WorkerGone)?;
        Ok(rx)
    }

    /// Token that aborts the request in flight and stops the worker
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Abort any pending request, quit the engine and wait for the task
    pub async fn shutdown(self) {
        self.cancel.cancel();
        drop(self.jobs);
        if let Err(e) = self.task.await {
            tracing::warn!("engine worker ended abnormally: {e}");
        }
    }
}

async fn run_worker<L: EngineLink>(mut link: L, mut jobs: mpsc::Receiver<Job>, cancel: CancellationToken) {
    loop {
        let job = tokio::select! {
            _ = cancel.cancelled() => None,
            job = jobs.recv() => job,
        };
        let Some(job) = job else {
            break;
        };

        let result = serve(&mut link, &job.commands, &cancel).await;
        if job.reply.send(result).is_err() {
            tracing::debug!("engine reply dropped, requester went away");
        }
    }

    if let Err(e) = link.shutdown().await {
        tracing::warn!("engine shutdown failed: {e}");
    }
}

async fn serve<L: EngineLink>(
    link: &mut L,
    commands: &[Command],
    cancel: &CancellationToken,
) -> Result<String, EngineError> {
    for command in commands {
        link.send(command).await?;
    }
    link.await_best_move(cancel).await
}
