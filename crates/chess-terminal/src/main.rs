//! Terminal front end for the interactive board.
//!
//! Reads taps and commands from stdin, keeps the clocks ticking in between,
//! and prints the board after every change. Logs go to stderr.

mod commands;
mod config;
mod render;

use anyhow::Context;
use chess_board::{
    GameEnd, GameSession, MonotonicTime, Notifier, SessionError, Sound, TimeControl,
    TimeSource,
};
use chess_core::{Color, Move, Piece};
use chess_engine::StandardRules;
use clap::Parser;
use commands::{Command, HELP};
use config::{Side, TerminalConfig};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn, Level};

/// Play chess against a second player at the same terminal.
#[derive(Parser)]
#[command(name = "simple-chess")]
#[command(about = "Tap-driven chess board with clocks")]
struct Args {
    /// Time control: a preset label like "5+3" or a custom preset name
    #[arg(long)]
    preset: Option<String>,

    /// Minutes per side, overriding the preset
    #[arg(long)]
    minutes: Option<u32>,

    /// Increment in seconds, used together with --minutes
    #[arg(long, default_value = "0")]
    increment: u32,

    /// Color of the local player
    #[arg(long, value_enum)]
    color: Option<Side>,

    /// Starting position in FEN
    #[arg(long)]
    fen: Option<String>,

    /// Milliseconds between clock updates
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// More log output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Prints what a sound card or dialog would show.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn play(&mut self, sound: Sound) {
        println!("♪ {}", sound);
    }

    fn promotion_requested(&mut self, color: Color, choices: [Piece; 4]) {
        let letters: Vec<String> = choices
            .iter()
            .map(|piece| piece.kind.to_char().to_string())
            .collect();
        println!(
            "{} pawn promotes: choose one of {} (or 'cancel')",
            color,
            letters.join(", ")
        );
    }

    fn game_finished(&mut self, end: GameEnd) {
        println!("{}", render::game_over(end));
    }
}

type Session = GameSession<StandardRules, TerminalNotifier, MonotonicTime>;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => TerminalConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TerminalConfig::load()?,
    };

    let control = match args.minutes {
        Some(minutes) => TimeControl::custom(minutes, args.increment),
        None => config.time_control(args.preset.as_deref().unwrap_or(&config.preset))?,
    };
    if control.minutes == 0 {
        anyhow::bail!("a game needs at least one minute per side");
    }
    let local: Color = args.color.unwrap_or(config.color).into();
    let position = config.start_position(args.fen.as_deref())?;
    let tick_ms = args.tick_ms.unwrap_or(config.tick_ms).max(10);

    info!(%control, %local, tick_ms, "starting game");
    let mut session: Session = GameSession::from_position(
        StandardRules,
        position,
        TerminalNotifier,
        MonotonicTime::new(),
        control,
        local,
    );
    println!("{} game, you play {}. Type 'help' for commands.", control, local);
    show(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = interval(Duration::from_millis(tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    debug!("stdin closed");
                    break;
                };
                if !handle_line(&mut session, &line) {
                    break;
                }
            }
            _ = ticker.tick() => {
                let was_over = session.game_end().is_some();
                if session.tick().is_some() && !was_over {
                    println!("{}", render::clocks(session.clocks()));
                }
            }
        }
    }

    info!(result = ?session.game_end(), "leaving");
    Ok(())
}

fn show(session: &Session) {
    print!("{}", render::board(session.board(), session.selection()));
    println!("{}", render::clocks(session.clocks()));
}

/// Taps the origin and the destination, answering the promotion prompt when
/// the move names a piece. A different square selected beforehand is
/// deselected first. Returns false when `m.from()` holds no piece of the side
/// to move; nothing is played then.
fn play_move<N: Notifier, T: TimeSource>(
    session: &mut GameSession<StandardRules, N, T>,
    m: Move,
) -> Result<bool, SessionError> {
    match session.selection().selected_square() {
        Some(selected) if selected == m.from() => {}
        Some(selected) => {
            session.tap(selected)?;
            session.tap(m.from())?;
        }
        None => {
            session.tap(m.from())?;
        }
    }
    if session.selection().selected_square() != Some(m.from()) {
        return Ok(false);
    }

    let report = session.tap(m.to())?;
    match m.promotion() {
        Some(kind) if report.is_none() && session.selection().is_awaiting_promotion() => {
            session.choose_promotion(kind)?;
        }
        _ => {}
    }
    Ok(true)
}

/// Runs one line of input. Returns false when the player wants to leave.
fn handle_line(session: &mut Session, line: &str) -> bool {
    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            return true;
        }
    };
    debug!(?command, "command");

    let result = match command {
        Command::Quit => return false,
        Command::Help => {
            println!("{}", HELP);
            return true;
        }
        Command::Show => Ok(()),
        Command::Tap(square) => session.tap(square).map(drop),
        Command::Move(m) => play_move(session, m).map(|played| {
            if !played {
                println!("no piece of the side to move on {}", m.from());
            }
        }),
        Command::Promote(kind) => session.choose_promotion(kind).map(drop),
        Command::Cancel => {
            if !session.cancel_promotion() {
                println!("no promotion to cancel");
            }
            Ok(())
        }
        Command::Undo => session.undo().map(|m| println!("took back {}", m)),
        Command::Draw => session.offer_draw().map(drop),
        Command::Resign => session.surrender().map(drop),
    };

    if let Err(e) = result {
        warn!(error = %e, "command failed");
        println!("{}", e);
    }
    show(session);
    true
}
