//! One full turn against an engine, as a single async call

use tokio_util::sync::CancellationToken;

use chessview_engine::{Command, EngineError, EngineLink};

use crate::game::{Game, GameError, ReplyOutcome};

/// Play `text` for the player and wait for the engine's answer.
///
/// If the engine cannot be reached or the wait is cancelled, the pending
/// reply is abandoned and the engine error returned; the player's move stays
/// on the board.
pub async fn play_turn<L: EngineLink>(
    game: &mut Game,
    engine: &mut L,
    text: &str,
    cancel: &CancellationToken,
) -> Result<ReplyOutcome, GameError> {
    let request = game.play(text)?;

    match exchange(engine, &request.commands, cancel).await {
        Ok(raw) => Ok(game.apply_engine_reply(&raw)),
        Err(e) => {
            game.abandon_engine_reply();
            Err(e.into())
        }
    }
}

async fn exchange<L: EngineLink>(
    engine: &mut L,
    commands: &[Command],
    cancel: &CancellationToken,
) -> Result<String, EngineError> {
    for command in commands {
        engine.send(command).await?;
    }
    engine.await_best_move(cancel).await
}
