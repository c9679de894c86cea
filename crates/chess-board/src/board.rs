//! Board state and the move executor.
//!
//! [`Board`] owns the authoritative [`Position`] together with the arena of
//! visual piece actors. Moves go through the rules first; the arena is then
//! brought in line with the new position step by step, and every step is
//! recorded as a [`BoardEvent`].

use crate::arena::{Arena, Occupant, PieceId};
use crate::{detect, BoardEvent, Sound, Verdict};
use chess_core::{Castling, Color, Move, Piece, PieceKind, Square};
use chess_engine::{MoveGenerator, Position, RepetitionKey, RulesError};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("move rejected: {0}")]
    IllegalMove(#[from] RulesError),

    #[error("no move to take back")]
    NothingToUndo,
}

/// Everything one call to [`Board::apply_move`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub mv: Move,
    /// Steps in the order they happened.
    pub events: Vec<BoardEvent>,
    pub captured: Vec<PieceId>,
    /// King square of the side to move when it is in check.
    pub check: Option<Square>,
    pub local_to_move: bool,
    pub verdict: Option<Verdict>,
    /// The single sound this move calls for.
    pub sound: Sound,
}

impl MoveReport {
    /// Number of actors that slid to a new square.
    pub fn relocations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BoardEvent::Relocated { .. }))
            .count()
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    mv: Move,
    position: Position,
    arena: Arena,
    check: Option<Square>,
}

pub struct Board<R> {
    rules: R,
    position: Position,
    arena: Arena,
    check: Option<Square>,
    local: Color,
    history: Vec<Snapshot>,
    seen: Vec<RepetitionKey>,
}

impl<R: MoveGenerator> Board<R> {
    /// A board at the rules' initial position.
    pub fn new(rules: R, local: Color) -> Self {
        let position = rules.initial_position();
        Self::from_position(rules, position, local)
    }

    pub fn from_position(rules: R, position: Position, local: Color) -> Self {
        let check = if rules.is_check(&position) {
            rules.king_square(&position, position.side_to_move)
        } else {
            None
        };
        Board {
            arena: Arena::from_position(&position),
            seen: vec![position.repetition_key()],
            rules,
            position,
            check,
            local,
            history: Vec::new(),
        }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Square of the checked king, if the side to move is in check.
    pub fn check_square(&self) -> Option<Square> {
        self.check
    }

    pub fn local_color(&self) -> Color {
        self.local
    }

    pub fn is_local_turn(&self) -> bool {
        self.position.side_to_move == self.local
    }

    /// Number of moves that can be taken back.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|snapshot| snapshot.mv)
    }

    /// Runs the game-end detector on the current position.
    pub fn verdict(&self) -> Option<Verdict> {
        detect(&self.rules, &self.position, self.local, &self.seen)
    }

    /// Plays `m` and reconciles the piece actors with the resulting position.
    ///
    /// The move is checked against the rules first; a rejected move leaves
    /// the board untouched.
    pub fn apply_move(&mut self, m: Move) -> Result<MoveReport, BoardError> {
        let next = self.rules.play(&self.position, m)?;
        let mover = self.position.side_to_move;

        self.history.push(Snapshot {
            mv: m,
            position: self.position.clone(),
            arena: self.arena.clone(),
            check: self.check,
        });
        self.position = next;

        let mut events = Vec::new();
        let mut captured = Vec::new();

        self.relocate(m.from(), m.to(), &mut events, &mut captured);

        if let Some(kind) = m.promotion() {
            self.promote(m.to(), Piece::new(kind, mover), &mut events);
        }

        let king_landed = self
            .position
            .piece_at(m.to())
            .is_some_and(|piece| piece.kind == PieceKind::King);
        if let Some(castling) = Castling::from_king_move(m).filter(|_| king_landed) {
            let rook = castling.rook_move();
            self.relocate(rook.from(), rook.to(), &mut events, &mut captured);
        }

        // Actors that no longer match the position were taken without their
        // square being the destination: en passant.
        let stale: Vec<(PieceId, Square)> = self
            .arena
            .visible()
            .filter(|actor| self.position.piece_at(actor.square) != Some(actor.piece))
            .map(|actor| (actor.id, actor.square))
            .collect();
        for (piece, square) in stale {
            if self.arena.hide(piece) {
                captured.push(piece);
                events.push(BoardEvent::Captured { piece, square });
            }
        }

        let had_check = self.check.is_some();
        let side = self.position.side_to_move;
        self.check = if self.rules.is_check(&self.position) {
            self.rules.king_square(&self.position, side)
        } else {
            None
        };
        match self.check {
            Some(king) => events.push(BoardEvent::CheckRaised { king }),
            None if had_check => events.push(BoardEvent::CheckCleared),
            None => {}
        }

        self.arena.sweep();

        let local_to_move = side == self.local;
        events.push(BoardEvent::TurnHandoff { local_to_move });

        self.seen.push(self.position.repetition_key());
        let verdict = self.verdict();

        let sound = match verdict {
            Some(verdict) => verdict.end().sound(),
            None if self.check.is_some() => Sound::Check,
            None if !captured.is_empty() => Sound::Capture,
            None => Sound::Move,
        };

        debug!(mv = %m, %sound, captures = captured.len(), "move applied");

        Ok(MoveReport {
            mv: m,
            events,
            captured,
            check: self.check,
            local_to_move,
            verdict,
            sound,
        })
    }

    /// Takes back the last move, restoring the position and actors exactly as
    /// they were before it.
    pub fn undo(&mut self) -> Result<Move, BoardError> {
        let snapshot = self.history.pop().ok_or(BoardError::NothingToUndo)?;
        self.position = snapshot.position;
        self.arena = snapshot.arena;
        self.check = snapshot.check;
        self.seen.pop();
        debug!(mv = %snapshot.mv, "move taken back");
        Ok(snapshot.mv)
    }

    fn relocate(
        &mut self,
        from: Square,
        to: Square,
        events: &mut Vec<BoardEvent>,
        captured: &mut Vec<PieceId>,
    ) {
        let Occupant::Present(piece) = self.arena.at(from) else {
            warn!(%from, %to, "no actor to relocate");
            return;
        };
        let victim = self.arena.at(to).id().filter(|id| *id != piece);

        self.arena.relocate(piece, to);
        events.push(BoardEvent::Relocated { piece, from, to });

        if let Some(victim) = victim {
            if self.arena.hide(victim) {
                captured.push(victim);
                events.push(BoardEvent::Captured {
                    piece: victim,
                    square: to,
                });
            }
        }
    }

    fn promote(&mut self, square: Square, promoted: Piece, events: &mut Vec<BoardEvent>) {
        let Occupant::Present(pawn) = self.arena.at(square) else {
            warn!(%square, "no pawn actor to promote");
            return;
        };
        self.arena.hide(pawn);
        let replacement = self.arena.spawn(promoted, square);
        events.push(BoardEvent::Promoted {
            pawn,
            replacement,
            square,
            kind: promoted.kind,
        });
    }
}
