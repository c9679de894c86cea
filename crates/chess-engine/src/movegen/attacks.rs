//! Attack sets for every piece kind.
//!
//! Leapers use tables built at compile time; sliders walk their rays against
//! the occupancy.

use crate::Bitboard;
use chess_core::{Color, Square};

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ROOK_RAYS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_RAYS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

const KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_STEPS);
const KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_STEPS);

/// Pawn capture targets, indexed by [color][square].
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&[(-1, 1), (1, 1)]),
    leaper_table(&[(-1, -1), (1, -1)]),
];

const fn leaper_table(steps: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut i = 0;
    while i < 64 {
        let from = Square::ALL[i];
        let mut bits = 0u64;
        let mut s = 0;
        while s < steps.len() {
            if let Some(to) = from.offset(steps[s].0, steps[s].1) {
                bits |= 1u64 << to.index();
            }
            s += 1;
        }
        table[i] = Bitboard(bits);
        i += 1;
    }
    table
}

fn ray_attacks(sq: Square, occupied: Bitboard, rays: &[(i8, i8)]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(files, ranks) in rays {
        let mut current = sq;
        while let Some(next) = current.offset(files, ranks) {
            attacks.set(next);
            if occupied.contains(next) {
                break;
            }
            current = next;
        }
    }
    attacks
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Bishop attacks given the board occupancy. The first blocker on each ray is
/// included.
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &BISHOP_RAYS)
}

/// Rook attacks given the board occupancy.
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &ROOK_RAYS)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn knight_counts() {
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(knight_attacks(sq("d4")).count(), 8);
        assert!(knight_attacks(Square::G1).contains(sq("f3")));
        assert!(knight_attacks(Square::G1).contains(sq("e2")));
    }

    #[test]
    fn king_counts() {
        assert_eq!(king_attacks(Square::A1).count(), 3);
        assert_eq!(king_attacks(sq("e4")).count(), 8);
        assert_eq!(king_attacks(Square::H8).count(), 3);
    }

    #[test]
    fn pawn_direction() {
        let white = pawn_attacks(sq("e4"), Color::White);
        assert!(white.contains(sq("d5")) && white.contains(sq("f5")));
        let black = pawn_attacks(sq("e4"), Color::Black);
        assert!(black.contains(sq("d3")) && black.contains(sq("f3")));
        assert_eq!(pawn_attacks(sq("a2"), Color::White).count(), 1);
        assert!(pawn_attacks(sq("a8"), Color::White).is_empty());
    }

    #[test]
    fn sliders_on_empty_board() {
        assert_eq!(rook_attacks(sq("d4"), Bitboard::EMPTY).count(), 14);
        assert_eq!(bishop_attacks(sq("d4"), Bitboard::EMPTY).count(), 13);
        assert_eq!(queen_attacks(sq("d4"), Bitboard::EMPTY).count(), 27);
        assert_eq!(bishop_attacks(Square::A1, Bitboard::EMPTY).count(), 7);
    }

    #[test]
    fn sliders_stop_at_blockers() {
        let blockers: Bitboard = [sq("d6"), sq("f4")].into_iter().collect();
        let rook = rook_attacks(sq("d4"), blockers);
        assert!(rook.contains(sq("d6")));
        assert!(!rook.contains(sq("d7")));
        assert!(rook.contains(sq("f4")));
        assert!(!rook.contains(sq("g4")));
        assert_eq!(rook.count(), 10);
    }
}
