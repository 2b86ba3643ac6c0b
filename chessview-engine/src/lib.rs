//! chessview engine - talking to an external UCI engine
//!
//! - Outbound command text and `bestmove` extraction
//! - The `EngineLink` seam and its child-process implementation
//! - A worker task so callers never block on the engine

pub mod error;
pub mod link;
pub mod process;
pub mod protocol;
pub mod testing;
pub mod worker;

pub use error::EngineError;
pub use link::EngineLink;
pub use process::{EngineConfig, EngineProcess};
pub use protocol::{parse_best_move, Command, BEST_MOVE_TOKEN};
pub use worker::{BestMoveReceiver, EngineHandle};
