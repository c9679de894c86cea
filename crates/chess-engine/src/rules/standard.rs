//! Standard chess rules (FIDE).

use super::{MoveGenerator, RulesError};
use crate::movegen::{generate_moves, is_king_attacked, make_move};
use crate::{Bitboard, Position};
use chess_core::{Color, Move, PieceKind};

/// FIDE rules: castling, en passant, promotion, check.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl MoveGenerator for StandardRules {
    fn initial_position(&self) -> Position {
        Position::startpos()
    }

    fn legal_moves(&self, position: &Position) -> Vec<Move> {
        generate_moves(position)
    }

    fn play(&self, position: &Position, m: Move) -> Result<Position, RulesError> {
        make_move(position, m)
    }

    fn is_check(&self, position: &Position) -> bool {
        is_king_attacked(position, position.side_to_move)
    }

    fn is_insufficient_material(&self, position: &Position) -> bool {
        let heavy_or_pawn = Color::BOTH.into_iter().any(|color| {
            [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen]
                .into_iter()
                .any(|kind| position.pieces_of(kind, color).is_not_empty())
        });
        if heavy_or_pawn {
            return false;
        }

        let mut knights = Bitboard::EMPTY;
        let mut bishops = Bitboard::EMPTY;
        for color in Color::BOTH {
            knights |= position.pieces_of(PieceKind::Knight, color);
            bishops |= position.pieces_of(PieceKind::Bishop, color);
        }

        match (knights.count(), bishops.count()) {
            (0, 0) | (1, 0) | (0, 1) => true,
            // Bishops that all share a square color can never mate.
            (0, _) => {
                let dark = bishops.into_iter().filter(|sq| sq.is_dark()).count();
                dark == 0 || dark == bishops.count() as usize
            }
            _ => false,
        }
    }
}
