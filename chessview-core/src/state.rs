//! Authoritative board state

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

use crate::board::{BoardGeometry, Square, Vec3, BOARD_SIZE};
use crate::pieces::{Color, Piece, PieceId, PieceKind};

/// A piece standing on a square
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub id: PieceId,
    pub piece: Piece,
    /// Resting world position of the square it occupies
    pub position: Vec3,
}

/// Rejected `place` call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("square {0} is already occupied")]
    Occupied(Square),

    #[error("piece id {0} is already on the board")]
    DuplicateId(PieceId),
}

/// Board state (clone to simulate)
///
/// Invariants: at most one piece per square, every piece id at most once,
/// and each placement's position is the geometry's position for its square.
#[derive(Clone, Debug)]
pub struct BoardState {
    squares: FxHashMap<Square, Placement>,
    geometry: BoardGeometry,
}

impl BoardState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Board with no pieces
    pub fn empty(geometry: BoardGeometry) -> Self {
        Self {
            squares: FxHashMap::default(),
            geometry,
        }
    }

    /// The standard 32-piece starting position
    pub fn standard(geometry: BoardGeometry) -> Self {
        let mut board = Self::empty(geometry);
        for (color, back, pawns) in [(Color::White, 0u8, 1u8), (Color::Black, 7, 6)] {
            for file in 0..BOARD_SIZE {
                let kind = PieceKind::BACK_RANK[file as usize];
                board.insert_fresh(Square::new(file, back), Piece::new(kind, color));
                board.insert_fresh(Square::new(file, pawns), Piece::new(PieceKind::Pawn, color));
            }
        }
        board
    }

    fn insert_fresh(&mut self, square: Option<Square>, piece: Piece) {
        if let Some(square) = square {
            let id = PieceId::starting(piece, square);
            let position = self.geometry.world_position(square);
            self.squares.insert(square, Placement { id, piece, position });
        }
    }

    /// Put a piece on an empty square under a new id
    pub fn place(&mut self, square: Square, id: PieceId, piece: Piece) -> Result<(), PlacementError> {
        if self.squares.contains_key(&square) {
            return Err(PlacementError::Occupied(square));
        }
        if self.squares.values().any(|p| p.id == id) {
            return Err(PlacementError::DuplicateId(id));
        }
        let position = self.geometry.world_position(square);
        self.squares.insert(square, Placement { id, piece, position });
        Ok(())
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    pub fn get(&self, square: Square) -> Option<&Placement> {
        self.squares.get(&square)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares.get(&square).map(|p| p.piece)
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.squares.contains_key(&square)
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// Iterate occupied squares (unordered)
    pub fn pieces(&self) -> impl Iterator<Item = (Square, &Placement)> + '_ {
        self.squares.iter().map(|(&sq, p)| (sq, p))
    }

    /// Occupied squares of one color, sorted so searches are deterministic
    pub fn squares_of(&self, color: Color) -> Vec<Square> {
        let mut squares: Vec<Square> = self
            .squares
            .iter()
            .filter(|(_, p)| p.piece.color == color)
            .map(|(&sq, _)| sq)
            .collect();
        squares.sort();
        squares
    }

    /// Square of `color`'s king, if it is on the board
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.squares
            .iter()
            .find(|(_, p)| p.piece.kind == PieceKind::King && p.piece.color == color)
            .map(|(&sq, _)| sq)
    }

    /// Check that every id is unique and positions match their squares
    pub fn is_consistent(&self) -> bool {
        let mut seen = FxHashSet::default();
        self.squares.iter().all(|(&sq, p)| {
            seen.insert(p.id.clone()) && p.position == self.geometry.world_position(sq)
        })
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Move the piece on `from` to `to`, returning whatever stood on `to`.
    ///
    /// Returns None and leaves the board unchanged when `from` is empty.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Option<Placement>> {
        let mut moving = self.squares.remove(&from)?;
        moving.position = self.geometry.world_position(to);
        Some(self.squares.insert(to, moving))
    }

    /// Take a piece off the board
    pub fn remove(&mut self, square: Square) -> Option<Placement> {
        self.squares.remove(&square)
    }

    /// Copy of the board with one move applied; the receiver is untouched
    pub fn with_move(&self, from: Square, to: Square) -> Self {
        let mut next = self.clone();
        next.move_piece(from, to);
        next
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for rank in (0..BOARD_SIZE).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..BOARD_SIZE {
                let c = Square::new(file, rank)
                    .and_then(|sq| self.piece_at(sq))
                    .map_or('.', Piece::symbol);
                write!(f, "{c} ")?;
            }
            writeln!(f, "{}", rank + 1)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
