//! chessview core - board, rules and scene
//!
//! This crate holds the authoritative chess state:
//! - Squares, world positions and capture slots
//! - Pieces with stable ids
//! - Board state and move history
//! - Move validation, check and checkmate detection
//! - The model-transform map a renderer draws from

pub mod board;
pub mod error;
pub mod moves;
pub mod pieces;
pub mod rules;
pub mod scene;
pub mod state;

// Re-exports for convenient access
pub use board::{BoardGeometry, Square, Vec3, BOARD_SIZE};
pub use error::MoveError;
pub use moves::{LanMove, MoveHistory};
pub use pieces::{Color, Piece, PieceId, PieceKind};
pub use rules::{is_in_check, is_square_attacked, GameStatus, MoveValidator};
pub use scene::{ModelTransform, SceneMap, BOARD_MODEL_ID};
pub use state::{BoardState, Placement, PlacementError};
