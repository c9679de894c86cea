//! Game-end detection.

use crate::Sound;
use chess_core::Color;
use chess_engine::{MoveGenerator, Position, RepetitionKey};
use std::fmt;

/// How the game ended, from the local player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEnd {
    Won,
    Lost,
    /// Any drawn outcome.
    Stalemate,
}

impl GameEnd {
    /// The terminal sound announcing this result.
    pub const fn sound(self) -> Sound {
        match self {
            GameEnd::Won => Sound::Victory,
            GameEnd::Lost => Sound::Defeat,
            GameEnd::Stalemate => Sound::Draw,
        }
    }
}

impl fmt::Display for GameEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameEnd::Won => "won",
            GameEnd::Lost => "lost",
            GameEnd::Stalemate => "draw",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    /// A hundred half-moves without a capture or pawn move.
    FiftyMoveRule,
    ThreefoldRepetition,
}

/// What the detector found in a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Checkmate { mated: Color, end: GameEnd },
    Draw(DrawReason),
}

impl Verdict {
    pub const fn end(self) -> GameEnd {
        match self {
            Verdict::Checkmate { end, .. } => end,
            Verdict::Draw(_) => GameEnd::Stalemate,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Checkmate { mated, .. } => write!(f, "{} is checkmated", mated),
            Verdict::Draw(DrawReason::Stalemate) => f.write_str("stalemate"),
            Verdict::Draw(DrawReason::InsufficientMaterial) => {
                f.write_str("draw by insufficient material")
            }
            Verdict::Draw(DrawReason::FiftyMoveRule) => f.write_str("draw by the fifty-move rule"),
            Verdict::Draw(DrawReason::ThreefoldRepetition) => {
                f.write_str("draw by threefold repetition")
            }
        }
    }
}

/// Decides whether `position` ends the game.
///
/// `history` holds the repetition keys of every position reached so far,
/// including `position` itself.
pub fn detect<R: MoveGenerator + ?Sized>(
    rules: &R,
    position: &Position,
    local: Color,
    history: &[RepetitionKey],
) -> Option<Verdict> {
    if rules.legal_moves(position).is_empty() {
        if !rules.is_check(position) {
            return Some(Verdict::Draw(DrawReason::Stalemate));
        }
        let mated = position.side_to_move;
        let end = if mated == local {
            GameEnd::Lost
        } else {
            GameEnd::Won
        };
        return Some(Verdict::Checkmate { mated, end });
    }

    if rules.is_insufficient_material(position) {
        return Some(Verdict::Draw(DrawReason::InsufficientMaterial));
    }
    if position.halfmove_clock >= 100 {
        return Some(Verdict::Draw(DrawReason::FiftyMoveRule));
    }
    let key = position.repetition_key();
    if history.iter().filter(|seen| **seen == key).count() >= 3 {
        return Some(Verdict::Draw(DrawReason::ThreefoldRepetition));
    }
    None
}

/// Write-once holder of the game result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameEndLatch {
    end: Option<GameEnd>,
}

impl GameEndLatch {
    pub const fn new() -> Self {
        GameEndLatch { end: None }
    }

    /// Records `end` if nothing was recorded yet. Returns true only for the
    /// write that took effect.
    pub fn finalize(&mut self, end: GameEnd) -> bool {
        if self.end.is_some() {
            return false;
        }
        self.end = Some(end);
        true
    }

    pub const fn get(&self) -> Option<GameEnd> {
        self.end
    }

    pub const fn is_final(&self) -> bool {
        self.end.is_some()
    }
}
