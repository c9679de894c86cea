//! Whole-game scenarios driven through taps, the way a player would.

use chess_board::{
    BoardEvent, GameEnd, GameSession, ManualTime, MoveReport, Notifier, Occupant, Sound,
    TimeControl,
};
use chess_core::{Color, Fen, Move, Piece, PieceKind, Square};
use chess_engine::{MoveGenerator, Position, StandardRules};
use proptest::prelude::*;

#[derive(Debug, Default)]
struct Recorder {
    sounds: Vec<Sound>,
    prompts: usize,
    finished: Vec<GameEnd>,
}

impl Notifier for Recorder {
    fn play(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }

    fn promotion_requested(&mut self, _color: Color, _choices: [Piece; 4]) {
        self.prompts += 1;
    }

    fn game_finished(&mut self, end: GameEnd) {
        self.finished.push(end);
    }
}

type Session = GameSession<StandardRules, Recorder, ManualTime>;

fn start(fen: &str) -> (Session, ManualTime) {
    let time = ManualTime::default();
    let session = GameSession::from_position(
        StandardRules,
        Position::from_fen(fen).unwrap(),
        Recorder::default(),
        time.clone(),
        TimeControl::preset("5+3").unwrap(),
        Color::White,
    );
    (session, time)
}

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

/// Plays a line of non-promoting moves by tapping origin then destination.
fn play_line(session: &mut Session, line: &[&str]) -> Vec<MoveReport> {
    line.iter()
        .map(|uci| {
            let m = Move::from_uci(uci).unwrap();
            session.tap(m.from()).unwrap();
            session
                .tap(m.to())
                .unwrap()
                .unwrap_or_else(|| panic!("{} did not complete a move", uci))
        })
        .collect()
}

#[test]
fn king_pawn_opening() {
    let (mut session, _time) = start(Fen::STARTPOS);
    let reports = play_line(&mut session, &["e2e4"]);
    let report = &reports[0];

    assert!(report.captured.is_empty());
    assert_eq!(report.check, None);
    assert_eq!(report.sound, Sound::Move);
    assert!(report.events.contains(&BoardEvent::TurnHandoff {
        local_to_move: false
    }));
    assert_eq!(session.notifier().sounds, vec![Sound::Move]);
    assert!(session.clocks().opponent().is_running());
    assert!(!session.clocks().local().is_running());
    assert_eq!(
        session.board().position().to_fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
}

#[test]
fn scholars_mate_is_won() {
    let (mut session, _time) = start(Fen::STARTPOS);
    let reports = play_line(
        &mut session,
        &["e2e4", "e7e5", "d1h5", "b8c6", "f1c4", "g8f6", "h5f7"],
    );
    let last = reports.last().unwrap();
    assert_eq!(last.sound, Sound::Victory);
    assert_eq!(last.captured.len(), 1);
    assert_eq!(session.game_end(), Some(GameEnd::Won));

    let notifier = session.notifier();
    assert_eq!(notifier.finished, vec![GameEnd::Won]);
    assert_eq!(
        notifier.sounds.iter().filter(|s| **s == Sound::Victory).count(),
        1
    );
    assert_eq!(session.clocks().running(), 0);

    // Further taps do nothing.
    let fen = session.board().position().to_fen();
    assert_eq!(session.tap(sq("e8")).unwrap(), None);
    assert_eq!(session.tap(sq("a7")).unwrap(), None);
    assert_eq!(session.board().position().to_fen(), fen);
    assert_eq!(session.notifier().sounds.len(), 7);
    assert_eq!(session.tick(), Some(GameEnd::Won));
    assert_eq!(session.notifier().finished.len(), 1);
}

#[test]
fn fools_mate_is_lost() {
    let (mut session, _time) = start(Fen::STARTPOS);
    let reports = play_line(&mut session, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert_eq!(reports[3].sound, Sound::Defeat);
    assert_eq!(reports[3].check, Some(Square::E1));
    assert_eq!(session.game_end(), Some(GameEnd::Lost));
    assert_eq!(
        session.notifier().sounds,
        vec![Sound::Move, Sound::Move, Sound::Move, Sound::Defeat]
    );
    assert_eq!(session.notifier().finished, vec![GameEnd::Lost]);
    assert_eq!(session.tap(sq("e1")).unwrap(), None);
    assert_eq!(*session.selection(), chess_board::Selection::Idle);
}

#[test]
fn stalemate_is_a_draw() {
    let (mut session, _time) = start("7k/5Q2/8/6K1/8/8/8/8 w - - 0 1");
    let reports = play_line(&mut session, &["g5g6"]);
    assert_eq!(reports[0].sound, Sound::Draw);
    assert_eq!(session.game_end(), Some(GameEnd::Stalemate));
    assert_eq!(session.notifier().finished, vec![GameEnd::Stalemate]);
}

#[test]
fn promotion_to_queen() {
    let (mut session, _time) = start("8/4P2k/8/8/8/8/8/K7 w - - 0 1");
    let pawn = session.board().arena().at(sq("e7")).id().unwrap();

    session.tap(sq("e7")).unwrap();
    assert_eq!(session.tap(sq("e8")).unwrap(), None);
    assert_eq!(session.notifier().prompts, 1);

    let report = session.choose_promotion(PieceKind::Queen).unwrap();
    let Occupant::Present(queen) = session.board().arena().at(sq("e8")) else {
        panic!("no actor on e8");
    };
    assert_ne!(queen, pawn);
    assert_eq!(
        session.board().arena().get(queen).unwrap().piece,
        Piece::new(PieceKind::Queen, Color::White)
    );
    assert!(session.board().arena().get(pawn).is_none());
    assert_eq!(report.sound, Sound::Move);
}

#[test]
fn castling_through_taps() {
    let (mut session, _time) = start("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
    let reports = play_line(&mut session, &["e1c1", "e8g8"]);
    assert_eq!(reports[0].relocations(), 2);
    assert_eq!(reports[1].relocations(), 2);
    let arena = session.board().arena();
    let piece_on = |s: &str| {
        arena
            .at(sq(s))
            .id()
            .and_then(|id| arena.get(id))
            .map(|actor| actor.piece)
    };
    assert_eq!(piece_on("d1"), Some(Piece::new(PieceKind::Rook, Color::White)));
    assert_eq!(piece_on("f8"), Some(Piece::new(PieceKind::Rook, Color::Black)));
    assert_eq!(piece_on("a1"), None);
    assert_eq!(piece_on("h8"), None);
}

#[test]
fn en_passant_through_taps() {
    let (mut session, _time) = start("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1");
    play_line(&mut session, &["d7d5"]);
    let black_pawn = session.board().arena().at(sq("d5")).id().unwrap();

    let reports = play_line(&mut session, &["e5d6"]);
    assert_eq!(reports[0].captured, vec![black_pawn]);
    assert!(reports[0].events.contains(&BoardEvent::Captured {
        piece: black_pawn,
        square: sq("d5")
    }));
    assert_eq!(reports[0].sound, Sound::Capture);
}

#[test]
fn undo_then_replay() {
    let (mut session, _time) = start(Fen::STARTPOS);
    play_line(&mut session, &["e2e4", "d7d5", "e4d5"]);
    let after_capture = session.board().position().clone();

    session.undo().unwrap();
    assert_eq!(session.board().arena().visible().count(), 32);
    play_line(&mut session, &["e4d5"]);
    assert_eq!(session.board().position(), &after_capture);
    assert_eq!(session.board().arena().visible().count(), 31);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn one_clock_runs_while_playing(
        plies in proptest::collection::vec((any::<usize>(), 0u64..8), 1..50),
    ) {
        let (mut session, time) = start(Fen::STARTPOS);
        prop_assert_eq!(session.clocks().running(), 0);

        for (choice, think) in plies {
            time.advance(think);
            if session.tick().is_some() {
                break;
            }
            let moves = StandardRules.legal_moves(session.board().position());
            let m = moves[choice % moves.len()];
            session.tap(m.from()).unwrap();
            let report = match session.tap(m.to()).unwrap() {
                Some(report) => report,
                None => {
                    prop_assert!(session.selection().is_awaiting_promotion());
                    session.choose_promotion(m.promotion().unwrap_or(PieceKind::Queen)).unwrap()
                }
            };

            if report.verdict.is_some() {
                prop_assert!(session.game_end().is_some());
                break;
            }
            prop_assert_eq!(session.clocks().running(), 1);
        }

        if session.game_end().is_some() {
            prop_assert_eq!(session.clocks().running(), 0);
            prop_assert_eq!(session.notifier().finished.len(), 1);
        }
    }
}
