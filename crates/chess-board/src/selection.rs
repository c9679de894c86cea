//! The tap state machine.
//!
//! A tap either selects one of the side to move's pieces, deselects it, or,
//! on an offered destination, produces a move. Destinations reached by a pawn
//! promotion first park the machine in [`Selection::AwaitingPromotion`] until
//! the player picks a piece.

use chess_core::{Move, Square};
use chess_engine::{MoveGenerator, Position};

/// A square the selected piece may move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Destination {
    pub square: Square,
    /// Landing here needs a promotion choice.
    pub promotes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected {
        square: Square,
        offered: Vec<Destination>,
    },
    /// Taps are ignored until the promotion choice arrives or is cancelled.
    AwaitingPromotion { from: Square, to: Square },
}

/// What a tap asks the caller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Nothing changed.
    Ignored,
    Selected(Square),
    Deselected,
    /// Play this move; the selection is back to idle.
    Move(Move),
    /// Ask for a promotion piece for the pawn going `from` → `to`.
    PromotionPrompt { from: Square, to: Square },
}

/// Groups the legal moves starting on `from` by destination.
pub fn offered_destinations(moves: &[Move], from: Square) -> Vec<Destination> {
    let mut offered: Vec<Destination> = Vec::new();
    for m in moves.iter().filter(|m| m.from() == from) {
        match offered.iter_mut().find(|d| d.square == m.to()) {
            Some(existing) => existing.promotes |= m.is_promotion(),
            None => offered.push(Destination {
                square: m.to(),
                promotes: m.is_promotion(),
            }),
        }
    }
    offered
}

impl Selection {
    pub fn selected_square(&self) -> Option<Square> {
        match self {
            Selection::Selected { square, .. } => Some(*square),
            _ => None,
        }
    }

    pub fn offered(&self) -> &[Destination] {
        match self {
            Selection::Selected { offered, .. } => offered,
            _ => &[],
        }
    }

    pub fn is_awaiting_promotion(&self) -> bool {
        matches!(self, Selection::AwaitingPromotion { .. })
    }

    /// Feeds one tap into the machine.
    pub fn tap<R: MoveGenerator + ?Sized>(
        &mut self,
        square: Square,
        position: &Position,
        rules: &R,
    ) -> TapOutcome {
        match self {
            Selection::AwaitingPromotion { .. } => TapOutcome::Ignored,
            Selection::Selected { square: from, .. } if *from == square => {
                *self = Selection::Idle;
                TapOutcome::Deselected
            }
            Selection::Selected {
                square: from,
                offered,
            } => {
                let from = *from;
                let promotes = offered
                    .iter()
                    .find(|d| d.square == square)
                    .map(|d| d.promotes);
                match promotes {
                    Some(true) => {
                        *self = Selection::AwaitingPromotion { from, to: square };
                        TapOutcome::PromotionPrompt { from, to: square }
                    }
                    Some(false) => {
                        *self = Selection::Idle;
                        TapOutcome::Move(Move::new(from, square))
                    }
                    None => self.select(square, position, rules),
                }
            }
            Selection::Idle => self.select(square, position, rules),
        }
    }

    fn select<R: MoveGenerator + ?Sized>(
        &mut self,
        square: Square,
        position: &Position,
        rules: &R,
    ) -> TapOutcome {
        let own_piece = position
            .piece_at(square)
            .is_some_and(|piece| piece.color == position.side_to_move);
        if !own_piece {
            return TapOutcome::Ignored;
        }
        let offered = offered_destinations(&rules.legal_moves(position), square);
        *self = Selection::Selected { square, offered };
        TapOutcome::Selected(square)
    }

    /// Leaves the promotion prompt, returning the pending pawn step.
    pub fn take_promotion(&mut self) -> Option<(Square, Square)> {
        match *self {
            Selection::AwaitingPromotion { from, to } => {
                *self = Selection::Idle;
                Some((from, to))
            }
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        *self = Selection::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_engine::StandardRules;
    use proptest::prelude::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn select_and_deselect() {
        let position = Position::startpos();
        let mut selection = Selection::Idle;

        assert_eq!(
            selection.tap(sq("g1"), &position, &StandardRules),
            TapOutcome::Selected(sq("g1"))
        );
        let squares: Vec<Square> = selection.offered().iter().map(|d| d.square).collect();
        assert_eq!(squares.len(), 2);
        assert!(squares.contains(&sq("f3")) && squares.contains(&sq("h3")));

        assert_eq!(
            selection.tap(sq("g1"), &position, &StandardRules),
            TapOutcome::Deselected
        );
        assert_eq!(selection, Selection::Idle);
    }

    #[test]
    fn ignores_empty_and_enemy_squares() {
        let position = Position::startpos();
        let mut selection = Selection::Idle;
        assert_eq!(
            selection.tap(sq("e4"), &position, &StandardRules),
            TapOutcome::Ignored
        );
        assert_eq!(
            selection.tap(sq("e7"), &position, &StandardRules),
            TapOutcome::Ignored
        );
        assert_eq!(selection, Selection::Idle);
    }

    #[test]
    fn reselects_other_piece() {
        let position = Position::startpos();
        let mut selection = Selection::Idle;
        selection.tap(sq("e2"), &position, &StandardRules);
        assert_eq!(
            selection.tap(sq("d2"), &position, &StandardRules),
            TapOutcome::Selected(sq("d2"))
        );
        assert_eq!(selection.selected_square(), Some(sq("d2")));

        // A non-offered empty square leaves the selection alone.
        assert_eq!(
            selection.tap(sq("h5"), &position, &StandardRules),
            TapOutcome::Ignored
        );
        assert_eq!(selection.selected_square(), Some(sq("d2")));
    }

    #[test]
    fn offered_destination_builds_move() {
        let position = Position::startpos();
        let mut selection = Selection::Idle;
        selection.tap(sq("e2"), &position, &StandardRules);
        assert_eq!(
            selection.tap(sq("e4"), &position, &StandardRules),
            TapOutcome::Move(Move::new(sq("e2"), sq("e4")))
        );
        assert_eq!(selection, Selection::Idle);
    }

    #[test]
    fn promotion_parks_until_chosen() {
        let position = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let mut selection = Selection::Idle;
        selection.tap(sq("a7"), &position, &StandardRules);
        assert_eq!(
            selection.offered(),
            &[Destination {
                square: Square::A8,
                promotes: true
            }]
        );
        assert_eq!(
            selection.tap(Square::A8, &position, &StandardRules),
            TapOutcome::PromotionPrompt {
                from: sq("a7"),
                to: Square::A8
            }
        );
        assert!(selection.is_awaiting_promotion());
        assert_eq!(
            selection.tap(Square::A1, &position, &StandardRules),
            TapOutcome::Ignored
        );
        assert_eq!(selection.take_promotion(), Some((sq("a7"), Square::A8)));
        assert_eq!(selection.take_promotion(), None);
        assert_eq!(selection, Selection::Idle);
    }

    #[test]
    fn grouping_merges_promotion_moves() {
        let moves = [
            Move::promoting(sq("b7"), sq("b8"), chess_core::PieceKind::Queen),
            Move::promoting(sq("b7"), sq("b8"), chess_core::PieceKind::Knight),
            Move::new(sq("c2"), sq("c3")),
        ];
        assert_eq!(
            offered_destinations(&moves, sq("b7")),
            vec![Destination {
                square: sq("b8"),
                promotes: true
            }]
        );
    }

    proptest! {
        #[test]
        fn offered_matches_legal_destinations(
            plies in proptest::collection::vec(any::<usize>(), 0..30),
            pick in any::<usize>(),
        ) {
            let rules = StandardRules;
            let mut position = Position::startpos();
            for choice in plies {
                let moves = rules.legal_moves(&position);
                if moves.is_empty() {
                    break;
                }
                position = rules.play(&position, moves[choice % moves.len()]).unwrap();
            }

            let moves = rules.legal_moves(&position);
            prop_assume!(!moves.is_empty());
            let from = moves[pick % moves.len()].from();

            let mut selection = Selection::Idle;
            prop_assert_eq!(selection.tap(from, &position, &rules), TapOutcome::Selected(from));

            let mut expected: Vec<Square> = rules
                .legal_moves_from(&position, from)
                .iter()
                .map(|m| m.to())
                .collect();
            expected.sort();
            expected.dedup();
            let mut offered: Vec<Square> = selection.offered().iter().map(|d| d.square).collect();
            offered.sort();
            prop_assert_eq!(offered, expected);

            for dest in selection.offered() {
                let promotes = rules
                    .legal_moves_from(&position, from)
                    .iter()
                    .any(|m| m.to() == dest.square && m.is_promotion());
                prop_assert_eq!(dest.promotes, promotes);
            }

            // Deselecting leaves the position untouched.
            let before = position.clone();
            prop_assert_eq!(selection.tap(from, &position, &rules), TapOutcome::Deselected);
            prop_assert_eq!(position, before);
        }
    }
}
