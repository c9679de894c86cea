//! Castling moves and rights.

use crate::{Color, Move, Square};

/// Which wing a king castles toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    King,
    Queen,
}

/// One of the four canonical castling moves.
///
/// A castling is played as a king move of two files; the matching rook move
/// is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Castling {
    pub color: Color,
    pub side: CastlingSide,
}

impl Castling {
    pub const WHITE_KING_SIDE: Castling = Castling::new(Color::White, CastlingSide::King);
    pub const WHITE_QUEEN_SIDE: Castling = Castling::new(Color::White, CastlingSide::Queen);
    pub const BLACK_KING_SIDE: Castling = Castling::new(Color::Black, CastlingSide::King);
    pub const BLACK_QUEEN_SIDE: Castling = Castling::new(Color::Black, CastlingSide::Queen);

    pub const ALL: [Castling; 4] = [
        Castling::WHITE_KING_SIDE,
        Castling::WHITE_QUEEN_SIDE,
        Castling::BLACK_KING_SIDE,
        Castling::BLACK_QUEEN_SIDE,
    ];

    pub const fn new(color: Color, side: CastlingSide) -> Self {
        Castling { color, side }
    }

    /// The king's move, e.g. e1g1.
    pub const fn king_move(self) -> Move {
        match (self.color, self.side) {
            (Color::White, CastlingSide::King) => Move::new(Square::E1, Square::G1),
            (Color::White, CastlingSide::Queen) => Move::new(Square::E1, Square::C1),
            (Color::Black, CastlingSide::King) => Move::new(Square::E8, Square::G8),
            (Color::Black, CastlingSide::Queen) => Move::new(Square::E8, Square::C8),
        }
    }

    /// The rook's move that accompanies the king's, e.g. h1f1.
    pub const fn rook_move(self) -> Move {
        match (self.color, self.side) {
            (Color::White, CastlingSide::King) => Move::new(Square::H1, Square::F1),
            (Color::White, CastlingSide::Queen) => Move::new(Square::A1, Square::D1),
            (Color::Black, CastlingSide::King) => Move::new(Square::H8, Square::F8),
            (Color::Black, CastlingSide::Queen) => Move::new(Square::A8, Square::D8),
        }
    }

    /// Squares between king and rook that must be empty.
    pub fn between(self) -> &'static [Square] {
        match (self.color, self.side) {
            (Color::White, CastlingSide::King) => &[Square::F1, Square::G1],
            (Color::White, CastlingSide::Queen) => &[Square::B1, Square::C1, Square::D1],
            (Color::Black, CastlingSide::King) => &[Square::F8, Square::G8],
            (Color::Black, CastlingSide::Queen) => &[Square::B8, Square::C8, Square::D8],
        }
    }

    /// Square the king crosses, which must not be attacked.
    pub const fn passes_through(self) -> Square {
        self.rook_move().to()
    }

    /// Returns the castling whose king move is `m`, if any. Whether a king is
    /// actually the piece moving is for the caller to check.
    pub fn from_king_move(m: Move) -> Option<Castling> {
        Castling::ALL.into_iter().find(|c| c.king_move() == m)
    }

    const fn flag(self) -> u8 {
        match (self.color, self.side) {
            (Color::White, CastlingSide::King) => 0b0001,
            (Color::White, CastlingSide::Queen) => 0b0010,
            (Color::Black, CastlingSide::King) => 0b0100,
            (Color::Black, CastlingSide::Queen) => 0b1000,
        }
    }
}

/// The set of castlings still available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub const fn allows(self, castling: Castling) -> bool {
        self.0 & castling.flag() != 0
    }

    #[inline]
    pub fn grant(&mut self, castling: Castling) {
        self.0 |= castling.flag();
    }

    #[inline]
    pub fn revoke(&mut self, castling: Castling) {
        self.0 &= !castling.flag();
    }

    /// Revokes both castlings of one color.
    pub fn revoke_color(&mut self, color: Color) {
        self.revoke(Castling::new(color, CastlingSide::King));
        self.revoke(Castling::new(color, CastlingSide::Queen));
    }

    /// Revokes the castling that uses the rook starting on `square`, if any.
    pub fn revoke_rook_square(&mut self, square: Square) {
        if let Some(c) = Castling::ALL
            .into_iter()
            .find(|c| c.rook_move().from() == square)
        {
            self.revoke(c);
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// FEN castling field ("KQkq", "-", ...).
    pub fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        Castling::ALL
            .into_iter()
            .zip(['K', 'Q', 'k', 'q'])
            .filter(|(c, _)| self.allows(*c))
            .map(|(_, letter)| letter)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_moves() {
        assert_eq!(Castling::WHITE_KING_SIDE.king_move().to_uci(), "e1g1");
        assert_eq!(Castling::WHITE_KING_SIDE.rook_move().to_uci(), "h1f1");
        assert_eq!(Castling::BLACK_QUEEN_SIDE.king_move().to_uci(), "e8c8");
        assert_eq!(Castling::BLACK_QUEEN_SIDE.rook_move().to_uci(), "a8d8");
        assert_eq!(Castling::WHITE_QUEEN_SIDE.passes_through(), Square::D1);
    }

    #[test]
    fn recognise_king_move() {
        assert_eq!(
            Castling::from_king_move(Move::new(Square::E8, Square::G8)),
            Some(Castling::BLACK_KING_SIDE)
        );
        assert_eq!(
            Castling::from_king_move(Move::new(Square::E1, Square::F1)),
            None
        );
    }

    #[test]
    fn rights() {
        let mut rights = CastlingRights::ALL;
        assert_eq!(rights.to_fen(), "KQkq");
        rights.revoke_rook_square(Square::H1);
        assert!(!rights.allows(Castling::WHITE_KING_SIDE));
        assert!(rights.allows(Castling::WHITE_QUEEN_SIDE));
        rights.revoke_color(Color::Black);
        assert_eq!(rights.to_fen(), "Q");
        rights.revoke(Castling::WHITE_QUEEN_SIDE);
        assert!(rights.is_empty());
        assert_eq!(rights.to_fen(), "-");
    }
}
