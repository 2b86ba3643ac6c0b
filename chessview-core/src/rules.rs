//! Move legality, check and checkmate detection
//!
//! Legality is geometric: each piece kind has a reach predicate, sliders
//! need every square strictly between source and destination to be empty.
//! Castling, en passant and promotion are not modelled.

use crate::board::Square;
use crate::error::MoveError;
use crate::moves::{LanMove, MoveHistory};
use crate::pieces::{Color, Piece, PieceKind};
use crate::state::BoardState;

/// The eight king steps
const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Outcome of a reach predicate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Reach {
    Yes,
    Blocked(Square),
    No,
}

/// Check state of a position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Check(Color),
    Checkmate(Color),
}

/// Rule checker for player and engine moves
#[derive(Clone, Debug, Default)]
pub struct MoveValidator {
    reject_self_check: bool,
}

impl MoveValidator {
    /// Validator that does not veto moves leaving the mover's king in check
    pub fn new() -> Self {
        Self::default()
    }

    /// Optionally reject moves that leave the mover's own king attacked
    pub fn with_self_check_veto(reject_self_check: bool) -> Self {
        Self { reject_self_check }
    }

    /// Parse and validate a move typed by the side to move.
    ///
    /// Checks run in order and stop at the first failure: syntax, source
    /// occupied, turn parity, no friendly capture, piece geometry.
    pub fn validate(
        &self,
        board: &BoardState,
        text: &str,
        history: &MoveHistory,
    ) -> Result<LanMove, MoveError> {
        let mv: LanMove = text.parse()?;
        self.validate_move(board, mv, history.side_to_move())?;
        Ok(mv)
    }

    /// Validate an already parsed move for `side`
    pub fn validate_move(&self, board: &BoardState, mv: LanMove, side: Color) -> Result<(), MoveError> {
        let piece = board.piece_at(mv.from).ok_or(MoveError::NoPiece(mv.from))?;
        if piece.color != side {
            return Err(MoveError::WrongTurn(side));
        }
        self.check_reach(board, mv)
    }

    /// Boolean form of [`validate`](Self::validate); logs the rejection
    pub fn is_legal(&self, board: &BoardState, text: &str, history: &MoveHistory) -> bool {
        match self.validate(board, text, history) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!("rejected {text}: {err}");
                false
            }
        }
    }

    /// Everything after the turn check: friendly capture, geometry and the
    /// optional self-check veto.
    fn check_reach(&self, board: &BoardState, mv: LanMove) -> Result<(), MoveError> {
        let piece = board.piece_at(mv.from).ok_or(MoveError::NoPiece(mv.from))?;

        if let Some(target) = board.piece_at(mv.to) {
            if target.color == piece.color {
                return Err(MoveError::FriendlyCapture(mv.to));
            }
        }

        match reach(board, piece, mv.from, mv.to) {
            Reach::Yes => {}
            Reach::Blocked(at) => {
                return Err(MoveError::PathBlocked { kind: piece.kind, at });
            }
            Reach::No => {
                return Err(MoveError::IllegalGeometry {
                    kind: piece.kind,
                    from: mv.from,
                    to: mv.to,
                });
            }
        }

        if self.reject_self_check && is_in_check(&board.with_move(mv.from, mv.to), piece.color) {
            return Err(MoveError::LeavesKingInCheck(piece.color));
        }

        Ok(())
    }

    // ========================================================================
    // CHECK AND CHECKMATE
    // ========================================================================

    /// True when `color` is in check and nothing resolves it.
    ///
    /// Candidate moves are judged without the turn rule, so either side can
    /// be tested regardless of whose move it is. Each candidate is applied
    /// to a copy of the board; `board` itself is never modified.
    pub fn is_checkmate(&self, board: &BoardState, color: Color) -> bool {
        if !is_in_check(board, color) {
            return false;
        }

        if self.can_resolve_check(board, color) {
            return false;
        }

        let king = match board.king_square(color) {
            Some(sq) => sq,
            None => return false,
        };

        for &(df, dr) in &KING_STEPS {
            let Some(dest) = king.offset(df, dr) else {
                continue;
            };
            let mv = LanMove::new(king, dest);
            if self.check_reach(board, mv).is_ok() {
                let after = board.with_move(king, dest);
                if !is_square_attacked(&after, dest, color.opponent()) {
                    return false;
                }
            }
        }

        true
    }

    /// Any move by any piece of `color` (block, capture or king step) that
    /// leaves its king out of check
    fn can_resolve_check(&self, board: &BoardState, color: Color) -> bool {
        for from in board.squares_of(color) {
            for to in Square::all() {
                let mv = LanMove::new(from, to);
                if self.check_reach(board, mv).is_err() {
                    continue;
                }
                if !is_in_check(&board.with_move(from, to), color) {
                    return true;
                }
            }
        }
        false
    }

    /// Check state, looking at `to_move` first
    pub fn status(&self, board: &BoardState, to_move: Color) -> GameStatus {
        for color in [to_move, to_move.opponent()] {
            if self.is_checkmate(board, color) {
                return GameStatus::Checkmate(color);
            }
        }
        for color in [to_move, to_move.opponent()] {
            if is_in_check(board, color) {
                return GameStatus::Check(color);
            }
        }
        GameStatus::Ongoing
    }
}

/// Whether any piece of `by` could move onto `square`.
///
/// Pawns attack diagonally forward whether or not the square is occupied.
pub fn is_square_attacked(board: &BoardState, square: Square, by: Color) -> bool {
    board
        .pieces()
        .any(|(from, p)| p.piece.color == by && from != square && attacks(board, p.piece, from, square))
}

/// Whether `color`'s king is attacked; false when it has no king
pub fn is_in_check(board: &BoardState, color: Color) -> bool {
    match board.king_square(color) {
        Some(king) => is_square_attacked(board, king, color.opponent()),
        None => false,
    }
}

fn attacks(board: &BoardState, piece: Piece, from: Square, target: Square) -> bool {
    match piece.kind {
        PieceKind::Pawn => {
            let (df, dr) = from.delta(target);
            df.abs() == 1 && dr == piece.color.forward()
        }
        _ => reach(board, piece, from, target) == Reach::Yes,
    }
}

// ============================================================================
// PIECE GEOMETRY
// ============================================================================

fn reach(board: &BoardState, piece: Piece, from: Square, to: Square) -> Reach {
    let (df, dr) = from.delta(to);
    match piece.kind {
        PieceKind::Pawn => pawn_reach(board, piece.color, from, to),
        PieceKind::Knight => {
            if matches!((df.abs(), dr.abs()), (1, 2) | (2, 1)) {
                Reach::Yes
            } else {
                Reach::No
            }
        }
        PieceKind::Bishop => diagonal_reach(board, from, to),
        PieceKind::Rook => straight_reach(board, from, to),
        PieceKind::Queen => match (straight_reach(board, from, to), diagonal_reach(board, from, to)) {
            (Reach::Yes, _) | (_, Reach::Yes) => Reach::Yes,
            (Reach::Blocked(at), _) | (_, Reach::Blocked(at)) => Reach::Blocked(at),
            _ => Reach::No,
        },
        PieceKind::King => {
            if df.abs() <= 1 && dr.abs() <= 1 {
                Reach::Yes
            } else {
                Reach::No
            }
        }
    }
}

fn pawn_reach(board: &BoardState, color: Color, from: Square, to: Square) -> Reach {
    let (df, dr) = from.delta(to);
    let dir = color.forward();

    if df == 0 {
        if dr == dir {
            return if board.is_occupied(to) { Reach::No } else { Reach::Yes };
        }
        if dr == 2 * dir && from.rank() == color.pawn_rank() {
            let Some(mid) = from.offset(0, dir) else {
                return Reach::No;
            };
            if board.is_occupied(mid) {
                return Reach::Blocked(mid);
            }
            return if board.is_occupied(to) { Reach::No } else { Reach::Yes };
        }
        return Reach::No;
    }

    // Diagonal step needs something to capture
    if df.abs() == 1 && dr == dir && board.is_occupied(to) {
        return Reach::Yes;
    }

    Reach::No
}

fn diagonal_reach(board: &BoardState, from: Square, to: Square) -> Reach {
    let (df, dr) = from.delta(to);
    if df == 0 || df.abs() != dr.abs() {
        return Reach::No;
    }
    first_blocker(board, from, to, df.signum(), dr.signum())
}

fn straight_reach(board: &BoardState, from: Square, to: Square) -> Reach {
    let (df, dr) = from.delta(to);
    if (df == 0) == (dr == 0) {
        return Reach::No;
    }
    first_blocker(board, from, to, df.signum(), dr.signum())
}

/// Walk from `from` towards `to`, exclusive at both ends
fn first_blocker(board: &BoardState, from: Square, to: Square, step_f: i8, step_r: i8) -> Reach {
    let mut current = from.offset(step_f, step_r);
    while let Some(sq) = current {
        if sq == to {
            return Reach::Yes;
        }
        if board.is_occupied(sq) {
            return Reach::Blocked(sq);
        }
        current = sq.offset(step_f, step_r);
    }
    Reach::No
}
