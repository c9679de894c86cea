//! Visual piece actors.
//!
//! Every piece drawn on the board is an [`Actor`] with a stable [`PieceId`].
//! A square index maps squares to the visible actor standing there; lookups
//! are total and answer [`Occupant::Vacant`] instead of failing.

use chess_core::{Piece, Square};
use chess_engine::Position;
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of an actor. Never reused within one arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: PieceId,
    pub piece: Piece,
    /// Square the actor is drawn on.
    pub square: Square,
    pub visible: bool,
}

/// Result of a square lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Present(PieceId),
    Vacant,
}

impl Occupant {
    pub fn id(self) -> Option<PieceId> {
        match self {
            Occupant::Present(id) => Some(id),
            Occupant::Vacant => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    actors: BTreeMap<PieceId, Actor>,
    index: [Option<PieceId>; 64],
    next_id: u32,
}

impl Arena {
    pub fn new() -> Self {
        Arena {
            actors: BTreeMap::new(),
            index: [None; 64],
            next_id: 0,
        }
    }

    /// One actor per piece of `position`.
    pub fn from_position(position: &Position) -> Self {
        let mut arena = Arena::new();
        for (square, piece) in position.pieces() {
            arena.spawn(piece, square);
        }
        arena
    }

    /// Adds a visible actor on `square`, replacing any index entry there.
    pub fn spawn(&mut self, piece: Piece, square: Square) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.actors.insert(
            id,
            Actor {
                id,
                piece,
                square,
                visible: true,
            },
        );
        self.index[square.index() as usize] = Some(id);
        id
    }

    pub fn get(&self, id: PieceId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// The visible actor indexed on `square`.
    pub fn at(&self, square: Square) -> Occupant {
        match self.index[square.index() as usize] {
            Some(id) => Occupant::Present(id),
            None => Occupant::Vacant,
        }
    }

    /// Moves an actor and points the index at it. Returns the square it left.
    pub fn relocate(&mut self, id: PieceId, to: Square) -> Option<Square> {
        let actor = self.actors.get_mut(&id)?;
        let from = actor.square;
        actor.square = to;
        if self.index[from.index() as usize] == Some(id) {
            self.index[from.index() as usize] = None;
        }
        self.index[to.index() as usize] = Some(id);
        Some(from)
    }

    /// Hides an actor and drops it from the index. Returns false if it was
    /// already hidden or unknown.
    pub fn hide(&mut self, id: PieceId) -> bool {
        let Some(actor) = self.actors.get_mut(&id) else {
            return false;
        };
        if !actor.visible {
            return false;
        }
        actor.visible = false;
        let slot = &mut self.index[actor.square.index() as usize];
        if *slot == Some(id) {
            *slot = None;
        }
        true
    }

    /// Removes hidden actors and rebuilds the square index from the visible
    /// ones.
    pub fn sweep(&mut self) {
        self.actors.retain(|_, actor| actor.visible);
        self.index = [None; 64];
        for actor in self.actors.values() {
            self.index[actor.square.index() as usize] = Some(actor.id);
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.actors.values().filter(|actor| actor.visible)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
