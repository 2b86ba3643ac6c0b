//! Move rejection reasons

use crate::board::Square;
use crate::pieces::{Color, PieceKind};

/// Why a move was rejected. No board state changes on any of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("invalid move format '{0}', use a form like e2e4")]
    Syntax(String),

    #[error("'{0}' is not a square on the board")]
    InvalidSquare(String),

    #[error("no piece at {0}")]
    NoPiece(Square),

    #[error("{0}'s turn to move")]
    WrongTurn(Color),

    #[error("cannot capture own piece at {0}")]
    FriendlyCapture(Square),

    #[error("invalid {kind} move: path blocked at {at}")]
    PathBlocked { kind: PieceKind, at: Square },

    #[error("invalid {kind} move {from}{to}")]
    IllegalGeometry {
        kind: PieceKind,
        from: Square,
        to: Square,
    },

    #[error("move would leave the {0} king in check")]
    LeavesKingInCheck(Color),
}

impl MoveError {
    /// Malformed input as opposed to a rule violation
    pub fn is_format_error(&self) -> bool {
        matches!(self, MoveError::Syntax(_) | MoveError::InvalidSquare(_))
    }
}
