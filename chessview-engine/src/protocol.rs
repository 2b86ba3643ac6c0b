//! UCI command text and best-move extraction

use std::fmt;

use chessview_core::LanMove;

/// Token that introduces the engine's answer
pub const BEST_MOVE_TOKEN: &str = "bestmove";

/// Outbound command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Uci,
    UciNewGame,
    IsReady,
    /// Position reached from the standard start by `moves`
    Position { moves: Vec<LanMove> },
    Go { depth: u32 },
    /// End the current search early; the engine still answers with `bestmove`
    Stop,
    Quit,
}

impl Command {
    /// Commands sent right after launch, without waiting for replies
    pub fn handshake() -> [Command; 3] {
        [Command::Uci, Command::UciNewGame, Command::IsReady]
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Uci => f.write_str("uci"),
            Command::UciNewGame => f.write_str("ucinewgame"),
            Command::IsReady => f.write_str("isready"),
            Command::Position { moves } if moves.is_empty() => f.write_str("position startpos"),
            Command::Position { moves } => {
                f.write_str("position startpos moves")?;
                for mv in moves {
                    write!(f, " {mv}")?;
                }
                Ok(())
            }
            Command::Go { depth } => write!(f, "go depth {depth}"),
            Command::Stop => f.write_str("stop"),
            Command::Quit => f.write_str("quit"),
        }
    }
}

/// Up to four characters after `bestmove` and one separator.
///
/// Returns None when `output` has no `bestmove`. The text is returned raw;
/// callers decide whether it is a usable move.
pub fn parse_best_move(output: &str) -> Option<String> {
    let start = output.find(BEST_MOVE_TOKEN)? + BEST_MOVE_TOKEN.len();
    Some(output[start..].chars().skip(1).take(4).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_text() {
        let moves = vec!["e2e4".parse().unwrap(), "e7e5".parse().unwrap()];
        assert_eq!(Command::Uci.to_string(), "uci");
        assert_eq!(Command::UciNewGame.to_string(), "ucinewgame");
        assert_eq!(Command::IsReady.to_string(), "isready");
        assert_eq!(
            Command::Position { moves }.to_string(),
            "position startpos moves e2e4 e7e5"
        );
        assert_eq!(
            Command::Position { moves: Vec::new() }.to_string(),
            "position startpos"
        );
        assert_eq!(Command::Go { depth: 10 }.to_string(), "go depth 10");
        assert_eq!(Command::Stop.to_string(), "stop");
        assert_eq!(Command::Quit.to_string(), "quit");
    }

    #[test]
    fn test_parse_best_move() {
        assert_eq!(parse_best_move("bestmove e7e5 ponder g1f3"), Some("e7e5".to_string()));
        assert_eq!(
            parse_best_move("info depth 10 score cp 20\nbestmove g8f6"),
            Some("g8f6".to_string())
        );
        // Promotion suffix is cut off
        assert_eq!(parse_best_move("bestmove a7a8q"), Some("a7a8".to_string()));
        assert_eq!(parse_best_move("info depth 3 nodes 120"), None);
    }

    #[test]
    fn test_parse_best_move_short_reply() {
        assert_eq!(parse_best_move("bestmove (none)"), Some("(non".to_string()));
        assert_eq!(parse_best_move("bestmove"), Some(String::new()));
        assert_eq!(parse_best_move("bestmove a1"), Some("a1".to_string()));
    }
}
