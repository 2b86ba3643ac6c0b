//! chessview game - a game against an engine
//!
//! - JSON configuration
//! - The turn orchestrator tying rules, animation and the engine together
//! - Prompt commands and view settings

pub mod command;
pub mod config;
pub mod game;
pub mod session;

pub use command::{CommandError, Spherical, UserCommand, ViewSettings, HELP};
pub use config::{GameConfig, RulesConfig};
pub use game::{EngineRequest, Game, GameError, ReplyOutcome};
pub use session::play_turn;
