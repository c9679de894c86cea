//! Parsing of the lines typed at the prompt.

use chess_core::{Move, PieceKind, Square};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("expected a square like e4, got '{0}'")]
    BadSquare(String),
    #[error("expected a move like e2e4, got '{0}'")]
    BadMove(String),
    #[error("expected one of q, r, b, n, got '{0}'")]
    BadPromotion(String),
    #[error("unknown command '{0}', type 'help' for the list")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
}

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Tap a square, as a finger on the board would.
    Tap(Square),
    /// Shorthand for tapping the origin then the destination.
    Move(Move),
    /// Answer the promotion prompt.
    Promote(PieceKind),
    /// Dismiss the promotion prompt.
    Cancel,
    Undo,
    Draw,
    Resign,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  <square>          tap a square, e.g. e2
  <from><to>        tap both squares, e.g. e2e4 (e7e8q promotes at once)
  promote <piece>   answer the promotion prompt with q, r, b or n
  cancel            dismiss the promotion prompt
  undo              take back the last move
  draw              agree a draw
  resign            give up the game
  show              print the board again
  help              this text
  quit              leave";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split_whitespace();
        let word = parts.next().unwrap_or("").to_ascii_lowercase();

        match word.as_str() {
            "" | "show" | "board" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "cancel" => Ok(Command::Cancel),
            "undo" | "back" => Ok(Command::Undo),
            "draw" => Ok(Command::Draw),
            "resign" | "surrender" => Ok(Command::Resign),
            "tap" => {
                let arg = parts.next().ok_or(CommandError::MissingArgument("tap"))?;
                parse_square(arg).map(Command::Tap)
            }
            "promote" => {
                let arg = parts
                    .next()
                    .ok_or(CommandError::MissingArgument("promote"))?;
                parse_promotion(arg).map(Command::Promote)
            }
            "q" | "r" | "b" | "n" => parse_promotion(&word).map(Command::Promote),
            _ if word.len() == 2 => parse_square(&word).map(Command::Tap),
            _ if word.len() == 4 || word.len() == 5 => Move::from_uci(&word)
                .map(Command::Move)
                .ok_or(CommandError::BadMove(word.clone())),
            _ => Err(CommandError::Unknown(word)),
        }
    }
}

fn parse_square(s: &str) -> Result<Square, CommandError> {
    Square::from_algebraic(s).ok_or_else(|| CommandError::BadSquare(s.to_string()))
}

fn parse_promotion(s: &str) -> Result<PieceKind, CommandError> {
    let mut chars = s.chars();
    match (chars.next().and_then(PieceKind::from_char), chars.next()) {
        (Some(kind), None) if kind.is_promotion_target() => Ok(kind),
        _ => match s.to_ascii_lowercase().as_str() {
            "queen" => Ok(PieceKind::Queen),
            "rook" => Ok(PieceKind::Rook),
            "bishop" => Ok(PieceKind::Bishop),
            "knight" => Ok(PieceKind::Knight),
            _ => Err(CommandError::BadPromotion(s.to_string())),
        },
    }
}
