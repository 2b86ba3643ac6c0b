//! Engine hosted as a child process
//!
//! Standard output and standard error are read line by line and merged into
//! one channel, so a `bestmove` on either stream is seen.
//!
//! A wait that times out or is cancelled leaves the engine mid-search. The
//! process then sends `stop`, and the next [`send`](EngineLink::send) first
//! discards output up to the abandoned search's `bestmove`, so every reply
//! answers the request it was read for.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::link::EngineLink;
use crate::protocol::{parse_best_move, Command};

/// How long `shutdown` waits for the engine to exit after `quit`
const QUIT_GRACE: Duration = Duration::from_millis(500);

/// How long to wait for an abandoned search's `bestmove` before moving on
const STALE_REPLY_GRACE: Duration = Duration::from_secs(2);

/// How to launch and drive the engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Executable to launch
    pub program: String,
    pub args: Vec<String>,
    /// Depth passed with every `go`
    pub search_depth: u32,
    /// Give up on a reply after this long; None waits forever
    pub move_timeout_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: "stockfish".to_string(),
            args: Vec::new(),
            search_depth: 10,
            move_timeout_ms: None,
        }
    }
}

impl EngineConfig {
    pub fn move_timeout(&self) -> Option<Duration> {
        self.move_timeout_ms.map(Duration::from_millis)
    }

    /// `go` command at the configured depth
    pub fn go(&self) -> Command {
        Command::Go {
            depth: self.search_depth,
        }
    }
}

/// Running engine subprocess
pub struct EngineProcess {
    program: String,
    child: Child,
    stdin: ChildStdin,
    output: mpsc::UnboundedReceiver<String>,
    timeout: Option<Duration>,
    /// A `go` was sent and its `bestmove` has not been read yet
    searching: bool,
}

impl EngineProcess {
    /// Launch the engine and send the handshake.
    ///
    /// Replies to the handshake are not awaited; they are skipped by the
    /// next [`await_best_move`](EngineLink::await_best_move).
    pub async fn start(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut child = tokio::process::Command::new(&config.program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: config.program.clone(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(EngineError::Closed)?;
        let stdout = child.stdout.take().ok_or(EngineError::Closed)?;
        let stderr = child.stderr.take().ok_or(EngineError::Closed)?;

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(forward_lines(stdout, tx.clone()));
        tokio::spawn(forward_lines(stderr, tx));

        let mut engine = Self {
            program: config.program.clone(),
            child,
            stdin,
            output: rx,
            timeout: config.move_timeout(),
            searching: false,
        };

        for command in Command::handshake() {
            engine.write(&command).await?;
        }
        tracing::info!("started engine {}", engine.program);

        Ok(engine)
    }

    async fn write(&mut self, command: &Command) -> Result<(), EngineError> {
        let line = format!("{command}\n");
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        tracing::info!("Sent to engine: {command}");
        if matches!(command, Command::Go { .. }) {
            self.searching = true;
        }
        Ok(())
    }

    /// Read up to the next `bestmove`, ending the current search
    async fn next_best_move(&mut self) -> Result<String, EngineError> {
        while let Some(line) = self.output.recv().await {
            tracing::debug!("engine: {line}");
            if let Some(mv) = parse_best_move(&line) {
                self.searching = false;
                return Ok(mv);
            }
        }
        Err(EngineError::Closed)
    }

    async fn wait_for_reply(&mut self, cancel: &CancellationToken) -> Result<String, EngineError> {
        match self.timeout {
            Some(limit) => {
                tokio::select! {
                    _ = cancel.cancelled() => Err(EngineError::Cancelled),
                    reply = tokio::time::timeout(limit, self.next_best_move()) => {
                        reply.unwrap_or(Err(EngineError::Timeout(limit)))
                    }
                }
            }
            None => {
                tokio::select! {
                    _ = cancel.cancelled() => Err(EngineError::Cancelled),
                    reply = self.next_best_move() => reply,
                }
            }
        }
    }

    /// Ask an abandoned search to finish; its reply is discarded later
    async fn stop_search(&mut self) {
        if !self.searching {
            return;
        }
        if let Err(e) = self.write(&Command::Stop).await {
            tracing::warn!("stop not delivered: {e}");
        }
    }

    /// Swallow the `bestmove` of an abandoned search
    async fn discard_stale_reply(&mut self) -> Result<(), EngineError> {
        match tokio::time::timeout(STALE_REPLY_GRACE, self.next_best_move()).await {
            Ok(Ok(stale)) => {
                tracing::info!("discarded late engine reply: {stale}");
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                tracing::warn!(
                    "engine {} did not finish its abandoned search within {:?}",
                    self.program,
                    STALE_REPLY_GRACE
                );
                self.searching = false;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl EngineLink for EngineProcess {
    async fn send(&mut self, command: &Command) -> Result<(), EngineError> {
        if self.searching && !matches!(command, Command::Stop | Command::Quit) {
            self.discard_stale_reply().await?;
        }
        self.write(command).await
    }

    async fn await_best_move(&mut self, cancel: &CancellationToken) -> Result<String, EngineError> {
        let reply = self.wait_for_reply(cancel).await;
        match &reply {
            Ok(mv) => tracing::info!("engine plays: {mv}"),
            Err(EngineError::Timeout(_) | EngineError::Cancelled) => self.stop_search().await,
            Err(_) => {}
        }
        reply
    }

    async fn shutdown(&mut self) -> Result<(), EngineError> {
        if let Err(e) = self.write(&Command::Quit).await {
            tracing::debug!("quit not delivered: {e}");
        }
        if tokio::time::timeout(QUIT_GRACE, self.child.wait()).await.is_err() {
            tracing::warn!("engine {} ignored quit, killing it", self.program);
            self.child.kill().await?;
        }
        Ok(())
    }
}

async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(line).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("engine output unreadable: {e}");
                break;
            }
        }
    }
}
