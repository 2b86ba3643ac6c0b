//! Child-process engine against small shell scripts
#![cfg(unix)]

use chessview_engine::{Command, EngineConfig, EngineError, EngineLink, EngineProcess};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Answers `go` with a fixed move, on stdout or stderr
fn shell_engine(reply: &str, timeout_ms: Option<u64>) -> EngineConfig {
    let script = format!(
        "while read line; do case \"$line\" in go*) echo 'info depth 10 score cp 12'; {reply};; quit) exit 0;; esac; done"
    );
    EngineConfig {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script],
        search_depth: 10,
        move_timeout_ms: timeout_ms,
    }
}

#[tokio::test]
async fn test_best_move_from_stdout() {
    let config = shell_engine("echo 'bestmove e7e5 ponder g1f3'", None);
    let mut engine = EngineProcess::start(&config).await.unwrap();
    let cancel = CancellationToken::new();

    engine
        .send(&Command::Position {
            moves: vec!["e2e4".parse().unwrap()],
        })
        .await
        .unwrap();
    engine.send(&config.go()).await.unwrap();
    assert_eq!(engine.await_best_move(&cancel).await.unwrap(), "e7e5");

    engine.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_best_move_from_stderr() {
    let config = shell_engine("echo 'bestmove b8c6' >&2", None);
    let mut engine = EngineProcess::start(&config).await.unwrap();

    engine.send(&config.go()).await.unwrap();
    let reply = engine.await_best_move(&CancellationToken::new()).await.unwrap();
    assert_eq!(reply, "b8c6");

    engine.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_silent_engine_times_out() {
    let config = shell_engine("true", Some(100));
    let mut engine = EngineProcess::start(&config).await.unwrap();

    engine.send(&config.go()).await.unwrap();
    let err = engine.await_best_move(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, EngineError::Timeout(_)));

    engine.shutdown().await.unwrap();
}

/// First `go` is answered late and ignores `stop`; later ones answer at once
fn slow_first_engine(timeout_ms: Option<u64>) -> EngineConfig {
    let script = "n=0; while read line; do case \"$line\" in \
        go*) n=$((n+1)); if [ $n -eq 1 ]; then sleep 0.4; echo 'bestmove e7e5'; else echo 'bestmove b8c6'; fi;; \
        quit) exit 0;; esac; done";
    EngineConfig {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        search_depth: 10,
        move_timeout_ms: timeout_ms,
    }
}

/// Never finishes a search on its own; answers `stop` with its best move so far
fn stoppable_engine(timeout_ms: Option<u64>) -> EngineConfig {
    let script = "n=0; while read line; do case \"$line\" in \
        go*) n=$((n+1)); if [ $n -gt 1 ]; then echo 'bestmove b8c6'; fi;; \
        stop) echo 'bestmove e7e5';; \
        quit) exit 0;; esac; done";
    EngineConfig {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        search_depth: 10,
        move_timeout_ms: timeout_ms,
    }
}

async fn request(engine: &mut EngineProcess, config: &EngineConfig) -> Result<String, EngineError> {
    engine
        .send(&Command::Position {
            moves: vec!["e2e4".parse().unwrap()],
        })
        .await?;
    engine.send(&config.go()).await?;
    engine.await_best_move(&CancellationToken::new()).await
}

#[tokio::test]
async fn test_late_reply_after_timeout_is_discarded() {
    let config = slow_first_engine(Some(150));
    let mut engine = EngineProcess::start(&config).await.unwrap();

    let err = request(&mut engine, &config).await.unwrap_err();
    assert!(matches!(err, EngineError::Timeout(_)));

    // The first search's answer lands while nobody is waiting for it
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(request(&mut engine, &config).await.unwrap(), "b8c6");

    engine.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reply_still_pending_after_timeout_is_discarded() {
    let config = slow_first_engine(Some(150));
    let mut engine = EngineProcess::start(&config).await.unwrap();

    assert!(request(&mut engine, &config).await.is_err());
    // Next request goes out while the first search is still running
    assert_eq!(request(&mut engine, &config).await.unwrap(), "b8c6");

    engine.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_timeout_stops_the_search() {
    let config = stoppable_engine(Some(150));
    let mut engine = EngineProcess::start(&config).await.unwrap();

    let err = request(&mut engine, &config).await.unwrap_err();
    assert!(matches!(err, EngineError::Timeout(_)));

    // Only a `stop` makes the engine give up its first answer, so the next
    // request completes well inside the stale-reply grace period
    let reply = tokio::time::timeout(Duration::from_secs(1), request(&mut engine, &config))
        .await
        .expect("stale reply was not flushed by stop")
        .unwrap();
    assert_eq!(reply, "b8c6");

    engine.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_next_request_after_cancelled_wait() {
    let config = slow_first_engine(None);
    let mut engine = EngineProcess::start(&config).await.unwrap();
    let cancel = CancellationToken::new();

    engine.send(&config.go()).await.unwrap();
    cancel.cancel();
    let err = engine.await_best_move(&cancel).await.unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));

    assert_eq!(request(&mut engine, &config).await.unwrap(), "b8c6");

    engine.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cancelled_wait() {
    let config = shell_engine("true", None);
    let mut engine = EngineProcess::start(&config).await.unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = engine.await_best_move(&cancel).await.unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));

    engine.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_exited_engine_reports_closed() {
    let config = EngineConfig {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), "exit 0".to_string()],
        ..EngineConfig::default()
    };
    let mut engine = match EngineProcess::start(&config).await {
        Ok(engine) => engine,
        // Handshake can hit a closed pipe if the shell is already gone
        Err(EngineError::Io(_)) => return,
        Err(other) => panic!("unexpected {other}"),
    };
    let err = engine.await_best_move(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, EngineError::Closed));
}
