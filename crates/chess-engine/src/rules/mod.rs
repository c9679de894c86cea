//! The rules seam between the interactive board and move generation.
//!
//! The board never generates moves itself: it asks a [`MoveGenerator`] which
//! moves are legal, plays them through it, and queries check and material
//! state for game-end detection.

mod standard;

pub use standard::StandardRules;

use crate::Position;
use chess_core::{Color, Move, Square};
use thiserror::Error;

/// Errors returned when a move cannot be played.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RulesError {
    #[error("no piece of the side to move on {0}")]
    NoPieceAt(Square),

    #[error("illegal move: {0}")]
    IllegalMove(Move),
}

/// Legal-move oracle for a chess variant.
///
/// # Example
///
/// ```
/// use chess_core::Square;
/// use chess_engine::{MoveGenerator, StandardRules};
///
/// let rules = StandardRules;
/// let position = rules.initial_position();
/// let knight = Square::from_algebraic("g1").unwrap();
/// assert_eq!(rules.legal_moves_from(&position, knight).len(), 2);
/// ```
pub trait MoveGenerator {
    /// Position a new game starts from.
    fn initial_position(&self) -> Position;

    /// Every legal move for the side to move.
    fn legal_moves(&self, position: &Position) -> Vec<Move>;

    /// Plays `m`, returning the resulting position.
    fn play(&self, position: &Position, m: Move) -> Result<Position, RulesError>;

    /// Returns true if the side to move is in check.
    fn is_check(&self, position: &Position) -> bool;

    fn king_square(&self, position: &Position, color: Color) -> Option<Square> {
        position.king_square(color)
    }

    /// Returns true if neither side can possibly deliver mate.
    fn is_insufficient_material(&self, position: &Position) -> bool;

    fn is_legal(&self, position: &Position, m: Move) -> bool {
        self.legal_moves(position).contains(&m)
    }

    /// Legal moves starting on `from`.
    fn legal_moves_from(&self, position: &Position, from: Square) -> Vec<Move> {
        self.legal_moves(position)
            .into_iter()
            .filter(|m| m.from() == from)
            .collect()
    }
}
