//! Text rendering of the board and clocks.
//!
//! Each square is three characters wide. Pieces use their FEN letter; the
//! markers around a letter show the interaction state:
//!
//! - `[P]` the selected piece
//! - ` • ` an offered empty square, ` + ` one that promotes
//! - `<p>` an offered capture
//! - `!K!` a king in check

use chess_board::{format_clock, Board, ClockPair, Destination, GameEnd, Selection};
use chess_core::{Color, Piece, Square};
use chess_engine::MoveGenerator;
use std::fmt::Write;

const FILES: &str = "abcdefgh";

fn actor_piece<R: MoveGenerator>(board: &Board<R>, square: Square) -> Option<Piece> {
    let arena = board.arena();
    arena
        .at(square)
        .id()
        .and_then(|id| arena.get(id))
        .filter(|actor| actor.visible)
        .map(|actor| actor.piece)
}

fn cell<R: MoveGenerator>(board: &Board<R>, selection: &Selection, square: Square) -> String {
    let offered: Option<&Destination> = selection.offered().iter().find(|d| d.square == square);
    let piece = actor_piece(board, square);

    match (piece, offered) {
        (Some(piece), _) if selection.selected_square() == Some(square) => {
            format!("[{}]", piece.to_fen_char())
        }
        (Some(piece), Some(_)) => format!("<{}>", piece.to_fen_char()),
        (Some(piece), None) if board.check_square() == Some(square) => {
            format!("!{}!", piece.to_fen_char())
        }
        (Some(piece), None) => format!(" {} ", piece.to_fen_char()),
        (None, Some(dest)) if dest.promotes => " + ".to_string(),
        (None, Some(_)) => " • ".to_string(),
        (None, None) => " . ".to_string(),
    }
}

/// Draws the board from the local player's side.
pub fn board<R: MoveGenerator>(board: &Board<R>, selection: &Selection) -> String {
    let flipped = board.local_color() == Color::Black;
    let ranks: Vec<u8> = if flipped {
        (0..8).collect()
    } else {
        (0..8).rev().collect()
    };
    let files: Vec<u8> = if flipped {
        (0..8).rev().collect()
    } else {
        (0..8).collect()
    };

    let mut out = String::new();
    for &rank in &ranks {
        let _ = write!(out, "{} ", rank + 1);
        for &file in &files {
            if let Some(square) = Square::new(file, rank) {
                out.push_str(&cell(board, selection, square));
            }
        }
        out.push('\n');
    }
    out.push_str("  ");
    for &file in &files {
        let letter = FILES.as_bytes()[usize::from(file)] as char;
        let _ = write!(out, " {} ", letter);
    }
    out.push('\n');
    out
}

/// One line with both clocks, the opponent's first. A running clock is
/// marked with `*`.
pub fn clocks(clocks: &ClockPair) -> String {
    let mark = |running: bool| if running { "*" } else { " " };
    format!(
        "opponent {}{}   you {}{}",
        format_clock(clocks.opponent().displayed()),
        mark(clocks.opponent().is_running()),
        format_clock(clocks.local().displayed()),
        mark(clocks.local().is_running()),
    )
}

pub fn game_over(end: GameEnd) -> &'static str {
    match end {
        GameEnd::Won => "You won!",
        GameEnd::Lost => "You lost.",
        GameEnd::Stalemate => "Draw.",
    }
}
