//! chessview animation - piece motion between squares
//!
//! - Ease-in-out cubic and the lift, translate, lower phases
//! - Per-piece animations with carried-over frame time
//! - A manager that sequences moves and sends captured pieces off the board

pub mod animation;
pub mod manager;
pub mod phase;

pub use animation::{AnimationKind, AnimationTiming, PieceAnimation};
pub use manager::{AnimationManager, CaptureInfo, MoveRecord, TickReport};
pub use phase::{ease_in_out_cubic, Phase};
