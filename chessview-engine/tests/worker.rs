//! Engine worker driven by a scripted engine

use chessview_core::LanMove;
use chessview_engine::testing::ScriptedEngine;
use chessview_engine::{Command, EngineError, EngineHandle};
use std::time::Duration;

fn moves(list: &[&str]) -> Vec<LanMove> {
    list.iter().map(|m| m.parse().unwrap()).collect()
}

#[tokio::test]
async fn test_submit_returns_best_move() {
    let engine = ScriptedEngine::new(["info depth 1 score cp 30", "bestmove e7e5 ponder g1f3"]);
    let transcript = engine.transcript();
    let handle = EngineHandle::spawn(engine);

    let rx = handle
        .submit(vec![
            Command::Position { moves: moves(&["e2e4"]) },
            Command::Go { depth: 10 },
        ])
        .unwrap();
    let reply = rx.await.unwrap().unwrap();
    assert_eq!(reply, "e7e5");
    assert_eq!(
        transcript.sent_text(),
        vec!["position startpos moves e2e4", "go depth 10"]
    );

    handle.shutdown().await;
    assert!(transcript.is_shut_down());
}

#[tokio::test]
async fn test_requests_are_served_in_order() {
    let engine = ScriptedEngine::new(["bestmove e7e5", "bestmove b8c6"]);
    let handle = EngineHandle::spawn(engine);

    let first = handle.submit(vec![Command::Go { depth: 1 }]).unwrap();
    let second = handle.submit(vec![Command::Go { depth: 1 }]).unwrap();
    assert_eq!(first.await.unwrap().unwrap(), "e7e5");
    assert_eq!(second.await.unwrap().unwrap(), "b8c6");

    handle.shutdown().await;
}

#[tokio::test]
async fn test_receiver_stays_empty_while_engine_thinks() {
    let handle = EngineHandle::spawn(ScriptedEngine::new(Vec::<String>::new()));
    let mut rx = handle.submit(vec![Command::Go { depth: 10 }]).unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(rx.try_recv().is_err());

    // Shutting down cancels the hung request
    handle.shutdown().await;
    assert!(matches!(rx.await.unwrap(), Err(EngineError::Cancelled)));
}

#[tokio::test]
async fn test_cancel_token_aborts_request() {
    let handle = EngineHandle::spawn(ScriptedEngine::new(Vec::<String>::new()));
    let rx = handle.submit(vec![Command::Go { depth: 10 }]).unwrap();

    handle.cancel_token().cancel();
    assert!(matches!(rx.await.unwrap(), Err(EngineError::Cancelled)));

    // Worker has stopped, so new requests have nowhere to go
    tokio::time::sleep(Duration::from_millis(20)).await;
    let late = handle.submit(vec![Command::Go { depth: 1 }]);
    match late {
        Err(EngineError::WorkerGone) => {}
        Ok(rx) => assert!(rx.await.is_err()),
        Err(other) => panic!("unexpected error {other}"),
    }
}

/// First search answers after 0.4 s, later ones at once
#[cfg(unix)]
fn slow_first_engine() -> chessview_engine::EngineConfig {
    let script = "n=0; while read line; do case \"$line\" in \
        go*) n=$((n+1)); if [ $n -eq 1 ]; then sleep 0.4; echo 'bestmove e7e5'; else echo 'bestmove b8c6'; fi;; \
        quit) exit 0;; esac; done";
    chessview_engine::EngineConfig {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        search_depth: 10,
        move_timeout_ms: Some(150),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_request_after_timeout_gets_its_own_reply() {
    let config = slow_first_engine();
    let engine = chessview_engine::EngineProcess::start(&config).await.unwrap();
    let handle = EngineHandle::spawn(engine);

    let first = handle
        .submit(vec![Command::Position { moves: moves(&["e2e4"]) }, config.go()])
        .unwrap();
    assert!(matches!(first.await.unwrap(), Err(EngineError::Timeout(_))));

    let second = handle
        .submit(vec![Command::Position { moves: moves(&["d2d4"]) }, config.go()])
        .unwrap();
    assert_eq!(second.await.unwrap().unwrap(), "b8c6");

    handle.shutdown().await;
}
