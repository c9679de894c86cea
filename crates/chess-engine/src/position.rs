//! Chess position representation.

use chess_core::{CastlingRights, Color, Fen, FenError, Piece, PieceKind, Square};

use crate::Bitboard;

/// Complete chess position state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Bitboards for each piece kind, indexed by [`PieceKind::index`].
    pieces: [Bitboard; 6],

    /// Bitboards for each color's pieces.
    colors: [Bitboard; 2],

    /// The side to move.
    pub side_to_move: Color,

    pub castling: CastlingRights,

    /// Square a pawn just skipped over with a double step.
    pub en_passant: Option<Square>,

    /// Half-moves since the last capture or pawn move.
    pub halfmove_clock: u32,

    /// Starts at 1 and increments after Black's move.
    pub fullmove_number: u32,
}

/// The parts of a position that decide whether it has "occurred before" for
/// the repetition rule. Move counters are excluded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepetitionKey {
    pieces: [Bitboard; 6],
    colors: [Bitboard; 2],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
}

impl Position {
    /// Creates an empty board with White to move.
    pub fn empty() -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen_record(&Fen::default())
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_fen_record(&Fen::parse(fen)?))
    }

    /// Creates a position from an already decoded FEN record.
    pub fn from_fen_record(fen: &Fen) -> Self {
        let mut position = Position::empty();
        for sq in Square::ALL {
            if let Some(piece) = fen.piece_at(sq) {
                position.put(sq, piece);
            }
        }
        position.side_to_move = fen.side_to_move;
        position.castling = fen.castling;
        position.en_passant = fen.en_passant;
        position.halfmove_clock = fen.halfmove_clock;
        position.fullmove_number = fen.fullmove_number;
        position
    }

    /// Encodes the position as a FEN record.
    pub fn to_fen_record(&self) -> Fen {
        let mut board = [None; 64];
        for (sq, piece) in self.pieces() {
            board[sq.index() as usize] = Some(piece);
        }
        Fen {
            board,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        self.to_fen_record().to_string()
    }

    /// Returns the piece on the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        let color = Color::BOTH
            .into_iter()
            .find(|c| self.colors[c.index()].contains(sq))?;
        PieceKind::ALL
            .into_iter()
            .find(|k| self.pieces[k.index()].contains(sq))
            .map(|kind| Piece::new(kind, color))
    }

    /// Places a piece, replacing whatever stood on the square.
    pub fn put(&mut self, sq: Square, piece: Piece) {
        self.remove(sq);
        self.pieces[piece.kind.index()].set(sq);
        self.colors[piece.color.index()].set(sq);
    }

    /// Removes and returns the piece on the square.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        self.pieces[piece.kind.index()].clear(sq);
        self.colors[piece.color.index()].clear(sq);
        Some(piece)
    }

    /// All occupied squares with their pieces, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied()
            .into_iter()
            .filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// Squares holding pieces of one color.
    #[inline]
    pub fn color(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Squares holding pieces of the given kind and color.
    #[inline]
    pub fn pieces_of(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.pieces[kind.index()] & self.colors[color.index()]
    }

    /// The square of the given side's king.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(PieceKind::King, color).first()
    }

    /// Key used to detect repeated positions. The en passant square only
    /// counts while a pawn can legally capture onto it.
    pub fn repetition_key(&self) -> RepetitionKey {
        let pawns = self.pieces_of(PieceKind::Pawn, self.side_to_move);
        let en_passant = self.en_passant.filter(|&ep| {
            crate::generate_moves(self)
                .iter()
                .any(|m| m.to() == ep && pawns.contains(m.from()))
        });
        RepetitionKey {
            pieces: self.pieces,
            colors: self.colors,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
