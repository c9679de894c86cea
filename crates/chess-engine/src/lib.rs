//! Chess rules engine with bitboard representation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets
//! - [`Position`] - piece placement, side to move, castling and en passant state
//! - [`MoveGenerator`] - the rules seam the interactive board talks to
//! - [`StandardRules`] - FIDE rules behind that seam
//!
//! # Example
//!
//! ```
//! use chess_engine::{MoveGenerator, StandardRules};
//! use chess_core::Move;
//!
//! let rules = StandardRules;
//! let start = rules.initial_position();
//! assert_eq!(rules.legal_moves(&start).len(), 20);
//!
//! let e4 = Move::from_uci("e2e4").unwrap();
//! let after = rules.play(&start, e4).unwrap();
//! assert_eq!(after.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
//! ```

mod bitboard;
pub mod movegen;
mod position;
pub mod rules;

pub use bitboard::Bitboard;
pub use movegen::{generate_moves, is_king_attacked, is_square_attacked, make_move};
pub use position::{Position, RepetitionKey};
pub use rules::{MoveGenerator, RulesError, StandardRules};
