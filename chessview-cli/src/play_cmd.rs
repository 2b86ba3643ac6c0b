//! Play command - interactive game against an engine subprocess
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), frame_loop()
//! - Level 3: poll_engine(), handle_line()
//! - Level 4: reporting helpers

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot::error::TryRecvError;

use chessview_core::GameStatus;
use chessview_engine::{BestMoveReceiver, EngineHandle, EngineProcess};
use chessview_game::{Game, GameConfig, GameError, ReplyOutcome, UserCommand, ViewSettings, HELP};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Engine executable (overrides the config)
    #[arg(long)]
    pub engine: Option<String>,

    /// Engine search depth (overrides the config)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Give up on an engine reply after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Refuse moves that leave your own king in check
    #[arg(long)]
    pub reject_self_check: bool,
}

/// What the loop does after a prompt line
enum Flow {
    Continue,
    Submitted(BestMoveReceiver),
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Load configuration
/// 2. Launch the engine (fatal if it cannot start)
/// 3. Run the frame loop until quit
pub fn run(args: PlayArgs) -> Result<()> {
    let config = load_config(&args)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let engine = EngineProcess::start(&config.engine)
            .await
            .with_context(|| format!("could not launch engine '{}'", config.engine.program))?;
        let handle = EngineHandle::spawn(engine);

        let result = frame_loop(&config, &handle).await;
        handle.shutdown().await;
        result
    })?;

    println!("Thank you for playing!!");
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Config file plus command-line overrides
fn load_config(args: &PlayArgs) -> Result<GameConfig> {
    let mut config = GameConfig::load_or_default(args.config.as_deref())
        .context("failed to read configuration")?;

    if let Some(engine) = &args.engine {
        config.engine.program = engine.clone();
    }
    if let Some(depth) = args.depth {
        config.engine.search_depth = depth;
    }
    if args.timeout_ms.is_some() {
        config.engine.move_timeout_ms = args.timeout_ms;
    }
    if args.reject_self_check {
        config.rules.reject_self_check = true;
    }

    Ok(config)
}

/// Tick animations every frame; prompt only when everything is idle
async fn frame_loop(config: &GameConfig, engine: &EngineHandle) -> Result<()> {
    let mut game = Game::new(config);
    let mut view = ViewSettings::default();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<BestMoveReceiver> = None;
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        let report = game.tick(dt);
        for id in &report.removed {
            tracing::debug!("{id} left the board");
        }

        if let Some(rx) = pending.as_mut() {
            if poll_engine(rx, &mut game) {
                pending = None;
            }
        }

        if pending.is_none() && game.accepts_input() {
            println!("\n{}", game.board());
            report_status(game.status());
            print!("\nEnter command (type 'help' for options): ");
            std::io::stdout().flush()?;

            let Some(line) = input.next_line().await? else {
                break;
            };
            // Time spent at the prompt is not animation time
            last_frame = Instant::now();

            match handle_line(&line, &mut game, &mut view, engine) {
                Flow::Continue => {}
                Flow::Submitted(rx) => pending = Some(rx),
                Flow::Quit => break,
            }
        }

        tokio::time::sleep(config.frame_interval()).await;
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Apply the engine's answer if it has arrived; true once the request is done
fn poll_engine(rx: &mut BestMoveReceiver, game: &mut Game) -> bool {
    match rx.try_recv() {
        Ok(Ok(raw)) => {
            match game.apply_engine_reply(&raw) {
                ReplyOutcome::Applied { engine_move, captured } => {
                    report_engine_move(&engine_move.to_string(), captured.is_some());
                }
                ReplyOutcome::Dropped { raw } => {
                    println!("Engine reply '{raw}' is not a usable move; your turn again.");
                }
            }
            true
        }
        Ok(Err(e)) => {
            println!("Engine failed: {e}");
            game.abandon_engine_reply();
            true
        }
        Err(TryRecvError::Empty) => false,
        Err(TryRecvError::Closed) => {
            println!("Engine worker stopped without answering.");
            game.abandon_engine_reply();
            true
        }
    }
}

/// Dispatch one prompt line
fn handle_line(line: &str, game: &mut Game, view: &mut ViewSettings, engine: &EngineHandle) -> Flow {
    let command = match UserCommand::parse(line) {
        Ok(command) => command,
        Err(e) => {
            println!("{e}");
            return Flow::Continue;
        }
    };

    match command {
        UserCommand::Quit => Flow::Quit,
        UserCommand::Help => {
            println!("\n{HELP}");
            Flow::Continue
        }
        UserCommand::Move(text) => {
            let request = match game.play(&text) {
                Ok(request) => request,
                Err(e) => {
                    println!("{}", rejection_message(&e));
                    return Flow::Continue;
                }
            };
            match engine.submit(request.commands) {
                Ok(rx) => Flow::Submitted(rx),
                Err(e) => {
                    println!("Engine unavailable: {e}");
                    game.abandon_engine_reply();
                    Flow::Continue
                }
            }
        }
        view_command => {
            if let Some(message) = view.apply(&view_command) {
                println!("{message}");
            }
            Flow::Continue
        }
    }
}

// ============================================================================
// LEVEL 4 - REPORTING
// ============================================================================

/// Malformed input and rule violations are worded differently
fn rejection_message(err: &GameError) -> String {
    match err {
        GameError::Move(e) if e.is_format_error() => format!("Invalid move format: {e}"),
        GameError::Move(e) => format!("Invalid move: {e}"),
        other => format!("Please wait: {other}"),
    }
}

fn report_engine_move(engine_move: &str, captured: bool) {
    if captured {
        println!("Engine plays {engine_move} and captures.");
    } else {
        println!("Engine plays {engine_move}.");
    }
}

fn report_status(status: GameStatus) {
    match status {
        GameStatus::Ongoing => {}
        GameStatus::Check(color) => println!("{color} is in check."),
        GameStatus::Checkmate(color) => println!("Checkmate! {color} has no way out."),
    }
}

// ============================================================================
// TESTS
// ============================================================================
