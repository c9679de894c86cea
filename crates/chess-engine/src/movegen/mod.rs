//! Move generation.
//!
//! Moves are generated pseudo-legally per piece kind, then filtered by
//! playing each one and rejecting those that leave the mover's king attacked.

mod attacks;
pub mod perft;

use crate::rules::RulesError;
use crate::{Bitboard, Position};
use chess_core::{Castling, Color, Move, Piece, PieceKind, Square};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};

/// Order in which promotion moves are emitted for a single pawn step.
const PROMOTION_ORDER: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Generates all legal moves for the side to move.
pub fn generate_moves(position: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);

    generate_pawn_moves(position, &mut moves);
    generate_piece_moves(position, &mut moves);
    generate_castling_moves(position, &mut moves);

    let us = position.side_to_move;
    moves.retain(|m| !is_king_attacked(&apply_unchecked(position, *m), us));
    moves
}

fn push_pawn_move(moves: &mut Vec<Move>, from: Square, to: Square, us: Color) {
    if to.rank() == us.promotion_rank() {
        moves.extend(
            PROMOTION_ORDER
                .iter()
                .map(|&kind| Move::promoting(from, to, kind)),
        );
    } else {
        moves.push(Move::new(from, to));
    }
}

fn generate_pawn_moves(position: &Position, moves: &mut Vec<Move>) {
    let us = position.side_to_move;
    let occupied = position.occupied();
    let theirs = position.color(us.opposite());
    let step = us.pawn_direction();

    for from in position.pieces_of(PieceKind::Pawn, us) {
        if let Some(single) = from.offset(0, step).filter(|sq| !occupied.contains(*sq)) {
            push_pawn_move(moves, from, single, us);

            if from.rank() == us.pawn_rank() {
                if let Some(double) = single.offset(0, step).filter(|sq| !occupied.contains(*sq)) {
                    moves.push(Move::new(from, double));
                }
            }
        }

        for to in pawn_attacks(from, us) & theirs {
            push_pawn_move(moves, from, to, us);
        }

        if let Some(ep) = position.en_passant {
            if pawn_attacks(from, us).contains(ep) && !occupied.contains(ep) {
                moves.push(Move::new(from, ep));
            }
        }
    }
}

/// Knights, sliders and the king's ordinary steps.
fn generate_piece_moves(position: &Position, moves: &mut Vec<Move>) {
    let us = position.side_to_move;
    let ours = position.color(us);
    let occupied = position.occupied();

    for kind in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        for from in position.pieces_of(kind, us) {
            let targets = match kind {
                PieceKind::Knight => knight_attacks(from),
                PieceKind::Bishop => bishop_attacks(from, occupied),
                PieceKind::Rook => rook_attacks(from, occupied),
                PieceKind::Queen => queen_attacks(from, occupied),
                _ => king_attacks(from),
            };
            moves.extend((targets & !ours).into_iter().map(|to| Move::new(from, to)));
        }
    }
}

fn generate_castling_moves(position: &Position, moves: &mut Vec<Move>) {
    let us = position.side_to_move;
    let them = us.opposite();
    let occupied = position.occupied();

    if position.castling.is_empty() || is_king_attacked(position, us) {
        return;
    }

    for castling in Castling::ALL.into_iter().filter(|c| c.color == us) {
        if !position.castling.allows(castling) {
            continue;
        }
        let king = castling.king_move();
        let rook = castling.rook_move();
        if position.piece_at(king.from()) != Some(Piece::new(PieceKind::King, us))
            || position.piece_at(rook.from()) != Some(Piece::new(PieceKind::Rook, us))
        {
            continue;
        }
        if castling.between().iter().any(|sq| occupied.contains(*sq)) {
            continue;
        }
        if is_square_attacked(position, castling.passes_through(), them) {
            continue;
        }
        moves.push(king);
    }
}

/// Returns true if `sq` is attacked by any piece of color `by`.
pub fn is_square_attacked(position: &Position, sq: Square, by: Color) -> bool {
    let occupied = position.occupied();
    let queens = position.pieces_of(PieceKind::Queen, by);

    let threats: [(Bitboard, Bitboard); 5] = [
        (
            pawn_attacks(sq, by.opposite()),
            position.pieces_of(PieceKind::Pawn, by),
        ),
        (knight_attacks(sq), position.pieces_of(PieceKind::Knight, by)),
        (king_attacks(sq), position.pieces_of(PieceKind::King, by)),
        (
            bishop_attacks(sq, occupied),
            position.pieces_of(PieceKind::Bishop, by) | queens,
        ),
        (
            rook_attacks(sq, occupied),
            position.pieces_of(PieceKind::Rook, by) | queens,
        ),
    ];
    threats
        .iter()
        .any(|(reach, attackers)| (*reach & *attackers).is_not_empty())
}

/// Returns true if the king of `color` is attacked. A side without a king is
/// never in check.
pub fn is_king_attacked(position: &Position, color: Color) -> bool {
    position
        .king_square(color)
        .is_some_and(|king| is_square_attacked(position, king, color.opposite()))
}

/// Plays a legal move and returns the resulting position.
///
/// Castling is recognised from the king's two-file step and en passant from a
/// pawn moving diagonally onto the en passant square.
pub fn make_move(position: &Position, m: Move) -> Result<Position, RulesError> {
    match position.piece_at(m.from()) {
        Some(piece) if piece.color == position.side_to_move => {}
        _ => return Err(RulesError::NoPieceAt(m.from())),
    }
    if !generate_moves(position).contains(&m) {
        return Err(RulesError::IllegalMove(m));
    }
    Ok(apply_unchecked(position, m))
}

/// Applies a pseudo-legal move without checking it.
pub(crate) fn apply_unchecked(position: &Position, m: Move) -> Position {
    let mut next = position.clone();
    let us = position.side_to_move;

    let Some(piece) = next.remove(m.from()) else {
        return next;
    };
    let mut is_capture = next.remove(m.to()).is_some();

    if piece.kind == PieceKind::Pawn
        && !is_capture
        && m.from().file() != m.to().file()
        && position.en_passant == Some(m.to())
    {
        if let Some(victim) = m.to().offset(0, -us.pawn_direction()) {
            is_capture = next.remove(victim).is_some();
        }
    }

    if piece.kind == PieceKind::King {
        if let Some(castling) = Castling::from_king_move(m).filter(|c| c.color == us) {
            let rook = castling.rook_move();
            if let Some(rook_piece) = next.remove(rook.from()) {
                next.put(rook.to(), rook_piece);
            }
        }
        next.castling.revoke_color(us);
    }
    next.castling.revoke_rook_square(m.from());
    next.castling.revoke_rook_square(m.to());

    let placed = match m.promotion() {
        Some(kind) if piece.kind == PieceKind::Pawn => Piece::new(kind, us),
        _ => piece,
    };
    next.put(m.to(), placed);

    next.en_passant = None;
    if piece.kind == PieceKind::Pawn && m.from().rank().abs_diff(m.to().rank()) == 2 {
        next.en_passant = m.from().offset(0, us.pawn_direction());
    }

    if piece.kind == PieceKind::Pawn || is_capture {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock += 1;
    }
    if us == Color::Black {
        next.fullmove_number += 1;
    }
    next.side_to_move = us.opposite();
    next
}
