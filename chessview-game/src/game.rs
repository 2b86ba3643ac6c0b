//! Game orchestration
//!
//! A turn runs in two halves. [`Game::play`] validates and applies the
//! player's move and returns the commands to send to the engine; the engine's
//! answer comes back through [`Game::apply_engine_reply`]. Between the two
//! the game refuses new input. Both moves join the history only once the
//! engine's reply has been applied.

use chessview_anim::{AnimationManager, CaptureInfo, TickReport};
use chessview_core::{
    BoardState, GameStatus, LanMove, MoveError, MoveHistory, MoveValidator, PieceId, SceneMap,
};
use chessview_engine::{Command, EngineError};

use crate::config::GameConfig;

/// Why a player command was refused
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("pieces are still moving")]
    Busy,

    #[error("still waiting for the engine's reply")]
    AwaitingEngine,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Commands to send to the engine after an accepted player move
#[derive(Clone, Debug, PartialEq)]
pub struct EngineRequest {
    pub player_move: LanMove,
    pub commands: Vec<Command>,
}

/// What became of an engine reply
#[derive(Clone, Debug, PartialEq)]
pub enum ReplyOutcome {
    Applied {
        engine_move: LanMove,
        captured: Option<PieceId>,
    },
    /// Reply was not a move on the board; nothing was recorded
    Dropped { raw: String },
}

/// One game against the engine
pub struct Game {
    board: BoardState,
    history: MoveHistory,
    validator: MoveValidator,
    animations: AnimationManager,
    scene: SceneMap,
    search_depth: u32,
    awaiting: Option<LanMove>,
}

impl Game {
    /// Standard starting position
    pub fn new(config: &GameConfig) -> Self {
        Self::from_board(BoardState::standard(config.geometry.clone()), config)
    }

    /// Start from an arbitrary position
    pub fn from_board(board: BoardState, config: &GameConfig) -> Self {
        let scene = SceneMap::from_board(&board);
        Self {
            animations: AnimationManager::new(config.animation.clone(), board.geometry().clone()),
            board,
            history: MoveHistory::new(),
            validator: MoveValidator::with_self_check_veto(config.rules.reject_self_check),
            scene,
            search_depth: config.engine.search_depth,
            awaiting: None,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn scene(&self) -> &SceneMap {
        &self.scene
    }

    pub fn animations(&self) -> &AnimationManager {
        &self.animations
    }

    /// Player move sent to the engine and not yet answered
    pub fn awaiting_reply(&self) -> Option<LanMove> {
        self.awaiting
    }

    /// True when nothing is moving and no engine reply is outstanding
    pub fn accepts_input(&self) -> bool {
        self.awaiting.is_none() && !self.animations.is_busy()
    }

    pub fn status(&self) -> GameStatus {
        self.validator.status(&self.board, self.history.side_to_move())
    }

    // ========================================================================
    // TURN
    // ========================================================================

    /// Validate and apply a player move.
    ///
    /// On success the move is on the board and animating, and the returned
    /// request holds the `position` and `go` commands for the engine. On
    /// failure nothing changes.
    pub fn play(&mut self, text: &str) -> Result<EngineRequest, GameError> {
        if self.awaiting.is_some() {
            return Err(GameError::AwaitingEngine);
        }
        if self.animations.is_busy() {
            return Err(GameError::Busy);
        }

        let mv = self.validator.validate(&self.board, text, &self.history)?;
        self.apply(mv);
        self.awaiting = Some(mv);

        Ok(EngineRequest {
            player_move: mv,
            commands: vec![
                Command::Position {
                    moves: self.history.with_next(Some(mv)),
                },
                Command::Go {
                    depth: self.search_depth,
                },
            ],
        })
    }

    /// Apply the engine's raw best-move token.
    ///
    /// Anything that is not a four-character move from an occupied square
    /// is dropped: the board keeps the player's move, but neither move is
    /// recorded, so the player moves again.
    pub fn apply_engine_reply(&mut self, raw: &str) -> ReplyOutcome {
        let Some(player_move) = self.awaiting.take() else {
            tracing::warn!("engine reply '{raw}' arrived with no move outstanding");
            return ReplyOutcome::Dropped { raw: raw.to_string() };
        };

        let parsed = raw
            .parse::<LanMove>()
            .ok()
            .filter(|mv| self.board.is_occupied(mv.from));

        match parsed {
            Some(engine_move) => {
                let captured = self.apply(engine_move);
                self.history.push(player_move);
                self.history.push(engine_move);
                ReplyOutcome::Applied {
                    engine_move,
                    captured,
                }
            }
            None => {
                tracing::warn!("dropping unusable engine reply '{raw}'");
                ReplyOutcome::Dropped { raw: raw.to_string() }
            }
        }
    }

    /// Give up on the outstanding engine reply, e.g. after an engine failure
    pub fn abandon_engine_reply(&mut self) -> Option<LanMove> {
        let abandoned = self.awaiting.take();
        if let Some(mv) = abandoned {
            tracing::warn!("abandoned engine reply to {mv}");
        }
        abandoned
    }

    /// Queue the animation for `mv` and move it on the board
    fn apply(&mut self, mv: LanMove) -> Option<PieceId> {
        let mover = self.board.get(mv.from)?.clone();
        let to = self.board.geometry().world_position(mv.to);

        let captured = match self.board.get(mv.to) {
            Some(victim) => {
                let capture = CaptureInfo {
                    piece: victim.id.clone(),
                    position: victim.position,
                    color: victim.piece.color,
                };
                self.animations
                    .enqueue_capture_move(mover.id.clone(), mover.position, to, capture);
                Some(victim.id.clone())
            }
            None => {
                self.animations.enqueue_move(mover.id.clone(), mover.position, to);
                None
            }
        };

        self.board.move_piece(mv.from, mv.to);
        tracing::debug!("{} {} -> {}", mover.id, mv.from, mv.to);
        captured
    }

    // ========================================================================
    // FRAMES
    // ========================================================================

    /// Advance animations by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> TickReport {
        self.animations.tick(dt, &mut self.scene)
    }

    /// Tick in steps of `dt` until all animations finish; returns the ticks
    /// taken, or None if they had not settled after `max_ticks`
    pub fn settle(&mut self, dt: f32, max_ticks: usize) -> Option<usize> {
        for ticks in 0..max_ticks {
            if !self.animations.is_busy() {
                return Some(ticks);
            }
            self.tick(dt);
        }
        (!self.animations.is_busy()).then_some(max_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chessview_core::Square;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn game() -> Game {
        Game::new(&GameConfig::default())
    }

    #[test]
    fn test_play_builds_engine_request() {
        let mut game = game();
        let request = game.play("e2e4").unwrap();
        assert_eq!(request.player_move.to_string(), "e2e4");
        let text: Vec<String> = request.commands.iter().map(ToString::to_string).collect();
        assert_eq!(text, vec!["position startpos moves e2e4", "go depth 10"]);

        assert!(game.board().is_occupied(sq("e4")));
        assert!(!game.board().is_occupied(sq("e2")));
        assert!(game.history().is_empty());
        assert!(!game.accepts_input());
    }

    #[test]
    fn test_second_move_waits_for_engine() {
        let mut game = game();
        game.play("e2e4").unwrap();
        assert!(matches!(game.play("d2d4"), Err(GameError::AwaitingEngine)));
    }

    #[test]
    fn test_busy_while_animating() {
        let mut game = game();
        game.play("e2e4").unwrap();
        game.apply_engine_reply("e7e5");
        game.tick(0.01);
        assert!(matches!(game.play("g1f3"), Err(GameError::Busy)));
        assert!(game.settle(0.05, 1000).is_some());
        assert!(game.play("g1f3").is_ok());
    }

    #[test]
    fn test_engine_reply_updates_board_and_history() {
        let mut game = game();
        game.play("e2e4").unwrap();
        let outcome = game.apply_engine_reply("e7e5");
        assert_eq!(
            outcome,
            ReplyOutcome::Applied {
                engine_move: "e7e5".parse().unwrap(),
                captured: None
            }
        );
        assert_eq!(game.history().len(), 2);
        assert!(game.board().is_occupied(sq("e5")));
        assert!(!game.board().is_occupied(sq("e7")));
    }

    #[test]
    fn test_unusable_reply_is_dropped() {
        let mut game = game();
        game.play("e2e4").unwrap();
        let before = game.board().to_string();

        let outcome = game.apply_engine_reply("(non");
        assert_eq!(outcome, ReplyOutcome::Dropped { raw: "(non".to_string() });
        assert_eq!(game.board().to_string(), before);
        assert!(game.history().is_empty());
        assert!(game.awaiting_reply().is_none());
    }

    #[test]
    fn test_reply_from_empty_square_is_dropped() {
        let mut game = game();
        game.play("e2e4").unwrap();
        assert!(matches!(game.apply_engine_reply("e5e4"), ReplyOutcome::Dropped { .. }));
    }

    #[test]
    fn test_capture_is_recorded() {
        let mut game = game();
        game.play("e2e4").unwrap();
        game.apply_engine_reply("d7d5");
        game.settle(0.05, 1000).unwrap();

        game.play("e4d5").unwrap();
        game.settle(0.05, 1000).unwrap();

        let pawn = PieceId::new("black-pawn-d7");
        assert!(game.animations().is_captured(&pawn));
        assert!(!game.scene().contains(&pawn));
        assert_eq!(
            game.scene().position("white-pawn-e2"),
            Some(game.board().geometry().world_position(sq("d5")))
        );
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut game = game();
        let before = game.board().to_string();
        let err = game.play("e2e5").unwrap_err();
        assert!(matches!(err, GameError::Move(MoveError::IllegalGeometry { .. })));
        assert_eq!(game.board().to_string(), before);
        assert!(!game.animations().is_busy());
        assert!(game.accepts_input());
    }

    #[test]
    fn test_abandon_reply_unlocks_input() {
        let mut game = game();
        game.play("e2e4").unwrap();
        assert_eq!(game.abandon_engine_reply(), Some("e2e4".parse().unwrap()));
        game.settle(0.05, 1000).unwrap();
        assert!(game.accepts_input());
        assert!(game.history().is_empty());
    }
}
