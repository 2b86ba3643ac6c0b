//! chessview CLI - play against a UCI engine from the terminal
//!
//! Commands:
//! - play: Interactive game against an engine subprocess
//! - replay: Check a move list offline and show the final position
//! - init-config: Write the default configuration file

mod init_config;
mod play_cmd;
mod replay_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chessview")]
#[command(about = "Animated chess against a UCI engine")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game against an engine
    Play(play_cmd::PlayArgs),
    /// Validate a move list and print the resulting position
    Replay(replay_cmd::ReplayArgs),
    /// Write the default configuration to a file
    InitConfig(init_config::InitConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args),
        Commands::Replay(args) => replay_cmd::run(args),
        Commands::InitConfig(args) => init_config::run(args),
    }
}
