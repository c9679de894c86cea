//! One game from first tap to final result.
//!
//! [`GameSession`] wires the board, the tap state machine, the clocks and the
//! game-end latch together and forwards sounds and prompts to a [`Notifier`].

use crate::board::{Board, BoardError, MoveReport};
use crate::clock::{ClockPair, ClockSide, MonotonicTime, TimeSource};
use crate::outcome::{GameEnd, GameEndLatch};
use crate::selection::{Selection, TapOutcome};
use crate::{Notifier, TimeControl};
use chess_core::{Color, Move, Piece, PieceKind, Square};
use chess_engine::{MoveGenerator, Position};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("the game is over ({0})")]
    GameOver(GameEnd),

    #[error("a promotion choice is pending")]
    PromotionPending,

    #[error("no promotion is pending")]
    NoPromotionPending,

    #[error("cannot promote to {0}")]
    InvalidPromotion(PieceKind),

    #[error(transparent)]
    Board(#[from] BoardError),
}

pub struct GameSession<R, N, T = MonotonicTime> {
    board: Board<R>,
    selection: Selection,
    clocks: ClockPair,
    latch: GameEndLatch,
    control: TimeControl,
    notifier: N,
    time: T,
}

impl<R, N, T> GameSession<R, N, T>
where
    R: MoveGenerator,
    N: Notifier,
    T: TimeSource,
{
    /// Starts a game from the rules' initial position.
    pub fn new(rules: R, notifier: N, time: T, control: TimeControl, local: Color) -> Self {
        let position = rules.initial_position();
        Self::from_position(rules, position, notifier, time, control, local)
    }

    /// Starts a game from an arbitrary position. A position that is already
    /// decided ends the game at once.
    pub fn from_position(
        rules: R,
        position: Position,
        notifier: N,
        time: T,
        control: TimeControl,
        local: Color,
    ) -> Self {
        let mut session = GameSession {
            board: Board::from_position(rules, position, local),
            selection: Selection::Idle,
            clocks: ClockPair::new(control),
            latch: GameEndLatch::new(),
            control,
            notifier,
            time,
        };
        if let Some(verdict) = session.board.verdict() {
            info!(%verdict, "starting position is already decided");
            session.conclude(verdict.end(), true);
        }
        session
    }

    pub fn board(&self) -> &Board<R> {
        &self.board
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clocks(&self) -> &ClockPair {
        &self.clocks
    }

    pub fn time_control(&self) -> TimeControl {
        self.control
    }

    pub fn game_end(&self) -> Option<GameEnd> {
        self.latch.get()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Handles a tap on `square`. Returns the report when the tap completed a
    /// move. Taps after the game ended or while a promotion choice is pending
    /// change nothing.
    pub fn tap(&mut self, square: Square) -> Result<Option<MoveReport>, SessionError> {
        if self.latch.is_final() {
            debug!(%square, "tap ignored, game over");
            return Ok(None);
        }
        let outcome = self
            .selection
            .tap(square, self.board.position(), self.board.rules());
        debug!(%square, ?outcome, "tap");

        match outcome {
            TapOutcome::Move(m) => self.execute(m).map(Some),
            TapOutcome::PromotionPrompt { .. } => {
                let color = self.board.position().side_to_move;
                let choices = PieceKind::PROMOTIONS.map(|kind| Piece::new(kind, color));
                self.notifier.promotion_requested(color, choices);
                Ok(None)
            }
            TapOutcome::Ignored | TapOutcome::Selected(_) | TapOutcome::Deselected => Ok(None),
        }
    }

    /// Completes a pending promotion with the chosen piece kind.
    pub fn choose_promotion(&mut self, kind: PieceKind) -> Result<MoveReport, SessionError> {
        self.ensure_running()?;
        if !self.selection.is_awaiting_promotion() {
            return Err(SessionError::NoPromotionPending);
        }
        if !kind.is_promotion_target() {
            warn!(%kind, "rejected promotion choice");
            return Err(SessionError::InvalidPromotion(kind));
        }
        let (from, to) = self
            .selection
            .take_promotion()
            .ok_or(SessionError::NoPromotionPending)?;
        self.execute(Move::promoting(from, to, kind))
    }

    /// Dismisses the promotion prompt without moving. Returns false if no
    /// prompt was open.
    pub fn cancel_promotion(&mut self) -> bool {
        let cancelled = self.selection.take_promotion().is_some();
        if cancelled {
            debug!("promotion cancelled");
        }
        cancelled
    }

    /// Recomputes both clocks. Returns the game result if a clock ran out.
    pub fn tick(&mut self) -> Option<GameEnd> {
        if self.latch.is_final() {
            return self.latch.get();
        }
        let now = self.time.now();
        match self.clocks.tick(now) {
            Some(ClockSide::Local) => {
                info!("local clock ran out");
                self.conclude(GameEnd::Lost, true);
            }
            Some(ClockSide::Opponent) => {
                info!("opponent clock ran out");
                self.conclude(GameEnd::Won, true);
            }
            None => {}
        }
        self.latch.get()
    }

    /// Ends the game as a draw.
    pub fn offer_draw(&mut self) -> Result<GameEnd, SessionError> {
        self.ensure_running()?;
        info!("draw agreed");
        self.conclude(GameEnd::Stalemate, true);
        Ok(GameEnd::Stalemate)
    }

    /// Ends the game as lost for the local player.
    pub fn surrender(&mut self) -> Result<GameEnd, SessionError> {
        self.ensure_running()?;
        info!("local player resigned");
        self.conclude(GameEnd::Lost, true);
        Ok(GameEnd::Lost)
    }

    /// Takes back the last move. The clock of the side to move again takes
    /// over; time already spent is not refunded.
    pub fn undo(&mut self) -> Result<Move, SessionError> {
        self.ensure_running()?;
        if self.selection.is_awaiting_promotion() {
            return Err(SessionError::PromotionPending);
        }
        let m = self.board.undo()?;
        self.selection.clear();

        let now = self.time.now();
        if self.board.history_len() == 0 {
            self.clocks.stop_all(now);
        } else {
            self.clocks.handoff(self.board.is_local_turn(), now);
        }
        info!(mv = %m, "move taken back");
        Ok(m)
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        match self.latch.get() {
            Some(end) => Err(SessionError::GameOver(end)),
            None => Ok(()),
        }
    }

    fn execute(&mut self, m: Move) -> Result<MoveReport, SessionError> {
        let report = self.board.apply_move(m)?;
        self.selection.clear();

        let now = self.time.now();
        self.clocks.handoff(report.local_to_move, now);
        self.notifier.play(report.sound);

        if let Some(verdict) = report.verdict {
            info!(%verdict, "game decided on the board");
            self.conclude(verdict.end(), false);
        }
        Ok(report)
    }

    /// Finalizes the result. Only the first call has any effect; it stops
    /// both clocks and notifies the player.
    fn conclude(&mut self, end: GameEnd, play_sound: bool) -> bool {
        if !self.latch.finalize(end) {
            return false;
        }
        self.selection.clear();
        self.clocks.stop_all(self.time.now());
        if play_sound {
            self.notifier.play(end.sound());
        }
        self.notifier.game_finished(end);
        info!(%end, "game over");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualTime, Sound};
    use chess_engine::StandardRules;

    #[derive(Debug, Default)]
    struct Recorder {
        sounds: Vec<Sound>,
        prompts: Vec<(Color, [Piece; 4])>,
        finished: Vec<GameEnd>,
    }

    impl Notifier for Recorder {
        fn play(&mut self, sound: Sound) {
            self.sounds.push(sound);
        }

        fn promotion_requested(&mut self, color: Color, choices: [Piece; 4]) {
            self.prompts.push((color, choices));
        }

        fn game_finished(&mut self, end: GameEnd) {
            self.finished.push(end);
        }
    }

    type TestSession = GameSession<StandardRules, Recorder, ManualTime>;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn session(fen: &str, time: &ManualTime) -> TestSession {
        GameSession::from_position(
            StandardRules,
            Position::from_fen(fen).unwrap(),
            Recorder::default(),
            time.clone(),
            TimeControl::preset("1+0").unwrap(),
            Color::White,
        )
    }

    fn play(session: &mut TestSession, uci: &str) -> Option<MoveReport> {
        let m = Move::from_uci(uci).unwrap();
        session.tap(m.from()).unwrap();
        session.tap(m.to()).unwrap()
    }

    #[test]
    fn promotion_prompt_round_trip() {
        let time = ManualTime::default();
        let mut session = session("8/P6k/8/8/8/8/8/K7 w - - 0 1", &time);
        session.tap(sq("a7")).unwrap();
        assert_eq!(session.tap(Square::A8).unwrap(), None);

        let prompts = &session.notifier().prompts;
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, Color::White);
        assert_eq!(
            prompts[0].1.map(|p| p.kind),
            [
                PieceKind::Rook,
                PieceKind::Knight,
                PieceKind::Bishop,
                PieceKind::Queen
            ]
        );

        // Board input is blocked while the prompt is open.
        assert_eq!(session.tap(Square::A1).unwrap(), None);
        assert!(session.selection().is_awaiting_promotion());
        assert_eq!(session.undo(), Err(SessionError::PromotionPending));
        assert_eq!(
            session.choose_promotion(PieceKind::King),
            Err(SessionError::InvalidPromotion(PieceKind::King))
        );

        let report = session.choose_promotion(PieceKind::Queen).unwrap();
        assert_eq!(report.mv, Move::from_uci("a7a8q").unwrap());
        assert_eq!(*session.selection(), Selection::Idle);
        assert_eq!(
            session.choose_promotion(PieceKind::Queen),
            Err(SessionError::NoPromotionPending)
        );
    }

    #[test]
    fn cancelled_promotion_keeps_position() {
        let time = ManualTime::default();
        let mut session = session("8/P6k/8/8/8/8/8/K7 w - - 0 1", &time);
        let before = session.board().position().clone();
        session.tap(sq("a7")).unwrap();
        session.tap(Square::A8).unwrap();
        assert!(session.cancel_promotion());
        assert!(!session.cancel_promotion());
        assert_eq!(session.board().position(), &before);
        assert!(session.notifier().sounds.is_empty());
    }

    #[test]
    fn clocks_hand_off_each_move() {
        let time = ManualTime::default();
        let mut session = session(chess_core::Fen::STARTPOS, &time);
        assert_eq!(session.clocks().running(), 0);

        time.advance(4);
        play(&mut session, "e2e4").unwrap();
        assert!(session.clocks().opponent().is_running());
        assert!(!session.clocks().local().is_running());

        time.advance(10);
        play(&mut session, "e7e5").unwrap();
        assert!(session.clocks().local().is_running());
        assert_eq!(session.clocks().opponent().remaining(), 50);
    }

    #[test]
    fn timeout_loses_once() {
        let time = ManualTime::default();
        let mut session = session(chess_core::Fen::STARTPOS, &time);
        play(&mut session, "e2e4").unwrap();
        play(&mut session, "e7e5").unwrap();

        time.advance(30);
        assert_eq!(session.tick(), None);
        time.advance(31);
        assert_eq!(session.tick(), Some(GameEnd::Lost));
        assert_eq!(session.tick(), Some(GameEnd::Lost));

        let notifier = session.notifier();
        assert_eq!(notifier.finished, vec![GameEnd::Lost]);
        assert_eq!(notifier.sounds.last(), Some(&Sound::Defeat));
        assert_eq!(session.clocks().running(), 0);
        assert_eq!(play(&mut session, "g1f3"), None);
    }

    #[test]
    fn opponent_timeout_wins() {
        let time = ManualTime::default();
        let mut session = session(chess_core::Fen::STARTPOS, &time);
        play(&mut session, "e2e4").unwrap();
        time.advance(61);
        assert_eq!(session.tick(), Some(GameEnd::Won));
        assert_eq!(session.notifier().sounds, vec![Sound::Move, Sound::Victory]);
    }

    #[test]
    fn draw_and_resign_are_final() {
        let time = ManualTime::default();
        let mut session = session(chess_core::Fen::STARTPOS, &time);
        assert_eq!(session.offer_draw(), Ok(GameEnd::Stalemate));
        assert_eq!(
            session.surrender(),
            Err(SessionError::GameOver(GameEnd::Stalemate))
        );
        assert_eq!(session.notifier().finished, vec![GameEnd::Stalemate]);
        assert_eq!(session.notifier().sounds, vec![Sound::Draw]);

        let mut session = self::session(chess_core::Fen::STARTPOS, &time);
        assert_eq!(session.surrender(), Ok(GameEnd::Lost));
        assert_eq!(session.game_end(), Some(GameEnd::Lost));
    }

    #[test]
    fn notifier_can_be_drained_between_moves() {
        let time = ManualTime::default();
        let mut session = session(chess_core::Fen::STARTPOS, &time);
        play(&mut session, "e2e4").unwrap();
        let heard = std::mem::take(&mut session.notifier_mut().sounds);
        assert_eq!(heard, vec![Sound::Move]);

        play(&mut session, "d7d5").unwrap();
        play(&mut session, "e4d5").unwrap();
        assert_eq!(session.notifier().sounds, vec![Sound::Move, Sound::Capture]);
    }

    #[test]
    fn undo_hands_clock_back() {
        let time = ManualTime::default();
        let mut session = session(chess_core::Fen::STARTPOS, &time);
        play(&mut session, "e2e4").unwrap();
        play(&mut session, "e7e5").unwrap();

        assert_eq!(session.undo(), Ok(Move::from_uci("e7e5").unwrap()));
        assert!(session.clocks().opponent().is_running());
        assert_eq!(session.clocks().running(), 1);

        assert_eq!(session.undo(), Ok(Move::from_uci("e2e4").unwrap()));
        assert_eq!(session.clocks().running(), 0);
        assert_eq!(session.board().position(), &Position::startpos());
        assert_eq!(
            session.undo(),
            Err(SessionError::Board(BoardError::NothingToUndo))
        );
    }

    #[test]
    fn decided_start_position_ends_immediately() {
        let time = ManualTime::default();
        let session = session("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", &time);
        assert_eq!(session.game_end(), Some(GameEnd::Stalemate));
        assert_eq!(session.notifier().sounds, vec![Sound::Draw]);
    }
}
