//! Interactive chess board.
//!
//! This crate holds the stateful part of a touch-driven chess client:
//! - [`Board`] - position plus the visual piece arena, applying moves and
//!   reporting what happened
//! - [`Selection`] - the tap state machine that turns taps into moves
//! - [`ClockPair`] - the two chess clocks handed off on every move
//! - [`detect`] and [`GameEndLatch`] - game-end detection with write-once
//!   results
//! - [`GameSession`] - the orchestrator wiring all of the above to a
//!   [`Notifier`]
//!
//! Legal moves always come from a [`chess_engine::MoveGenerator`].
//!
//! # Example
//!
//! ```
//! use chess_board::{GameSession, ManualTime, Notifier, Sound, GameEnd, TimeControl};
//! use chess_core::{Color, Piece, Square};
//! use chess_engine::StandardRules;
//!
//! #[derive(Default)]
//! struct Sounds(Vec<Sound>);
//!
//! impl Notifier for Sounds {
//!     fn play(&mut self, sound: Sound) {
//!         self.0.push(sound);
//!     }
//!     fn promotion_requested(&mut self, _color: Color, _choices: [Piece; 4]) {}
//!     fn game_finished(&mut self, _end: GameEnd) {}
//! }
//!
//! let control = TimeControl::preset("5+3").unwrap();
//! let mut session = GameSession::new(
//!     StandardRules,
//!     Sounds::default(),
//!     ManualTime::default(),
//!     control,
//!     Color::White,
//! );
//!
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//! session.tap(e2).unwrap();
//! let report = session.tap(e4).unwrap().unwrap();
//! assert_eq!(report.sound, Sound::Move);
//! assert_eq!(session.notifier().0, vec![Sound::Move]);
//! ```

mod arena;
mod board;
mod clock;
mod events;
mod outcome;
mod selection;
mod session;
mod time_control;

pub use arena::{Actor, Arena, Occupant, PieceId};
pub use board::{Board, BoardError, MoveReport};
pub use clock::{format_clock, Clock, ClockPair, ClockSide, ManualTime, MonotonicTime, TimeSource};
pub use events::{BoardEvent, Notifier, Sound};
pub use outcome::{detect, DrawReason, GameEnd, GameEndLatch, Verdict};
pub use selection::{offered_destinations, Destination, Selection, TapOutcome};
pub use session::{GameSession, SessionError};
pub use time_control::{Category, TimeControl};
