//! Core types for chess.
//!
//! This crate provides the vocabulary shared by the rules engine and the
//! interactive board:
//! - [`Color`], [`PieceKind`] and [`Piece`] for piece representation
//! - [`Square`] for board coordinates (file and rank, both 0-7)
//! - [`Move`] for a single ply, including its promotion choice
//! - [`Castling`] and [`CastlingRights`] for the four canonical castling moves
//! - [`Fen`] parsing and serialization

mod castling;
mod fen;
mod mov;
mod piece;
mod square;

pub use castling::{Castling, CastlingRights, CastlingSide};
pub use fen::{Fen, FenError};
pub use mov::Move;
pub use piece::{Color, Piece, PieceKind};
pub use square::Square;
