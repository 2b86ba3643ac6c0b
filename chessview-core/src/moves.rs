//! LAN move notation and the move history

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::board::Square;
use crate::error::MoveError;
use crate::pieces::Color;

/// Four-character "from+to" move, e.g. `e2e4`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanMove {
    pub from: Square,
    pub to: Square,
}

impl LanMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl FromStr for LanMove {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = s.as_bytes();
        if b.len() != 4
            || !b[0].is_ascii_alphabetic()
            || !b[1].is_ascii_digit()
            || !b[2].is_ascii_alphabetic()
            || !b[3].is_ascii_digit()
        {
            return Err(MoveError::Syntax(s.to_string()));
        }
        Ok(Self {
            from: s[0..2].parse()?,
            to: s[2..4].parse()?,
        })
    }
}

impl fmt::Display for LanMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Accepted moves of both sides, in play order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHistory {
    moves: Vec<LanMove>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mv: LanMove) {
        self.moves.push(mv);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[LanMove] {
        &self.moves
    }

    /// White moves after an even number of half-moves
    pub fn side_to_move(&self) -> Color {
        if self.moves.len() % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Moves to report to the engine: the whole history plus `next` if given
    pub fn with_next(&self, next: Option<LanMove>) -> Vec<LanMove> {
        self.moves.iter().copied().chain(next).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lan() {
        let mv: LanMove = "e2e4".parse().unwrap();
        assert_eq!(mv.to_string(), "e2e4");
        assert_eq!(mv.from, "e2".parse().unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_format() {
        for bad in ["e2e", "e2e45", "22e4", "eee4", "e2-4", ""] {
            let err = bad.parse::<LanMove>().unwrap_err();
            assert!(matches!(err, MoveError::Syntax(_)), "{bad} gave {err:?}");
        }
    }

    #[test]
    fn test_parse_rejects_off_board() {
        let err = "z9a1".parse::<LanMove>().unwrap_err();
        assert_eq!(err, MoveError::InvalidSquare("z9".to_string()));
    }

    #[test]
    fn test_side_to_move_parity() {
        let mut history = MoveHistory::new();
        assert_eq!(history.side_to_move(), Color::White);
        history.push("e2e4".parse().unwrap());
        assert_eq!(history.side_to_move(), Color::Black);
        history.push("e7e5".parse().unwrap());
        assert_eq!(history.side_to_move(), Color::White);
    }

    #[test]
    fn test_with_next() {
        let mut history = MoveHistory::new();
        history.push("e2e4".parse().unwrap());
        let moves = history.with_next(Some("g1f3".parse().unwrap()));
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[1].to_string(), "g1f3");
        assert_eq!(history.len(), 1);
    }
}
