//! What a move did, and the collaborator that hears about it.

use crate::{GameEnd, PieceId};
use chess_core::{Color, Piece, PieceKind, Square};
use std::fmt;

/// Sound cue. Exactly one is played per move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Move,
    Capture,
    Check,
    Draw,
    Victory,
    Defeat,
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sound::Move => "move",
            Sound::Capture => "capture",
            Sound::Check => "check",
            Sound::Draw => "draw",
            Sound::Victory => "victory",
            Sound::Defeat => "defeat",
        };
        f.write_str(name)
    }
}

/// One observable step of [`Board::apply_move`](crate::Board::apply_move), in
/// the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// An actor slid from one square to another.
    Relocated {
        piece: PieceId,
        from: Square,
        to: Square,
    },
    /// An actor was taken off the board.
    Captured { piece: PieceId, square: Square },
    /// The pawn actor was replaced by a fresh actor of the promoted kind.
    Promoted {
        pawn: PieceId,
        replacement: PieceId,
        square: Square,
        kind: PieceKind,
    },
    /// The side to move is in check; the indicator sits on its king.
    CheckRaised { king: Square },
    CheckCleared,
    TurnHandoff { local_to_move: bool },
}

/// Receives the fire-and-forget notifications of a game session.
pub trait Notifier {
    fn play(&mut self, sound: Sound);

    /// Asks the player which piece a pawn promotes to. The answer comes back
    /// through [`GameSession::choose_promotion`](crate::GameSession::choose_promotion).
    fn promotion_requested(&mut self, color: Color, choices: [Piece; 4]);

    /// Called once, when the game ends.
    fn game_finished(&mut self, end: GameEnd);
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn play(&mut self, sound: Sound) {
        (**self).play(sound);
    }

    fn promotion_requested(&mut self, color: Color, choices: [Piece; 4]) {
        (**self).promotion_requested(color, choices);
    }

    fn game_finished(&mut self, end: GameEnd) {
        (**self).game_finished(end);
    }
}
