//! Replay command - check a move list offline
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: replay_moves(), report_results()
//! - Level 3: print_text_results(), print_json_results()

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use chessview_core::{BoardState, GameStatus, MoveHistory, MoveValidator};
use chessview_game::GameConfig;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ReplayArgs {
    /// Moves in long algebraic notation, white first (e.g. e2e4 e7e5)
    #[arg(required = true)]
    pub moves: Vec<String>,

    /// Configuration JSON file (board geometry and rule switches)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Refuse moves that leave the mover's own king in check
    #[arg(long)]
    pub reject_self_check: bool,

    /// Output the final position as JSON
    #[arg(long)]
    pub json: bool,
}

/// Final position after a replay
struct ReplayResult {
    board: BoardState,
    history: MoveHistory,
    status: GameStatus,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run replay command
///
/// 1. Load configuration
/// 2. Validate and apply each move in turn
/// 3. Report the final position
pub fn run(args: ReplayArgs) -> Result<()> {
    let mut config = GameConfig::load_or_default(args.config.as_deref())
        .context("failed to read configuration")?;
    if args.reject_self_check {
        config.rules.reject_self_check = true;
    }

    let result = replay_moves(&args.moves, &config)?;
    report_results(&result, args.json);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Apply `moves` from the starting position, stopping at the first illegal one
fn replay_moves(moves: &[String], config: &GameConfig) -> Result<ReplayResult> {
    let validator = MoveValidator::with_self_check_veto(config.rules.reject_self_check);
    let mut board = BoardState::standard(config.geometry.clone());
    let mut history = MoveHistory::new();

    for (ply, text) in moves.iter().enumerate() {
        let mv = validator
            .validate(&board, text, &history)
            .with_context(|| format!("move {} ({text}) is illegal", ply + 1))?;
        board.move_piece(mv.from, mv.to);
        history.push(mv);
        tracing::debug!("ply {}: {mv}", ply + 1);
    }

    let status = validator.status(&board, history.side_to_move());
    Ok(ReplayResult {
        board,
        history,
        status,
    })
}

fn report_results(result: &ReplayResult, json: bool) {
    if json {
        print_json_results(result);
    } else {
        print_text_results(result);
    }
}

// ============================================================================
// LEVEL 3 - OUTPUT
// ============================================================================

fn print_text_results(result: &ReplayResult) {
    println!("{}", result.board);
    println!("Moves played: {}", result.history.len());
    println!("To move: {}", result.history.side_to_move());
    match result.status {
        GameStatus::Ongoing => {}
        GameStatus::Check(color) => println!("{color} is in check"),
        GameStatus::Checkmate(color) => println!("Checkmate: {color} is mated"),
    }
}

fn print_json_results(result: &ReplayResult) {
    #[derive(serde::Serialize)]
    struct JsonOutput {
        moves: Vec<String>,
        to_move: String,
        status: String,
        pieces: Vec<(String, String)>,
    }

    let status = match result.status {
        GameStatus::Ongoing => "ongoing".to_string(),
        GameStatus::Check(color) => format!("check:{color}"),
        GameStatus::Checkmate(color) => format!("checkmate:{color}"),
    };

    let mut pieces: Vec<(String, String)> = result
        .board
        .pieces()
        .map(|(square, placement)| (square.to_string(), placement.id.to_string()))
        .collect();
    pieces.sort();

    let output = JsonOutput {
        moves: result.history.moves().iter().map(ToString::to_string).collect(),
        to_move: result.history.side_to_move().to_string(),
        status,
        pieces,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize results: {e}"),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chessview_core::Color;

    fn moves(list: &[&str]) -> Vec<String> {
        list.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn test_replay_scholars_mate() {
        let result = replay_moves(
            &moves(&["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"]),
            &GameConfig::default(),
        )
        .unwrap();
        assert_eq!(result.history.len(), 7);
        assert_eq!(result.status, GameStatus::Checkmate(Color::Black));
        assert_eq!(result.board.len(), 31);
    }

    #[test]
    fn test_replay_stops_at_illegal_move() {
        let err = replay_moves(&moves(&["e2e4", "e7e5", "d1h4"]), &GameConfig::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("move 3 (d1h4)"));
    }

    #[test]
    fn test_replay_rejects_wrong_side() {
        let err = replay_moves(&moves(&["e7e5"]), &GameConfig::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("move 1"));
    }

    #[test]
    fn test_replay_self_check_switch() {
        // 1. d4 e5 2. dxe5 Bb4+ 3. Kd2 steps onto the bishop's diagonal
        let line = moves(&["d2d4", "e7e5", "d4e5", "f8b4", "e1d2"]);
        assert!(replay_moves(&line, &GameConfig::default()).is_ok());

        let mut config = GameConfig::default();
        config.rules.reject_self_check = true;
        assert!(replay_moves(&line, &config).is_err());
    }
}
