//! Game state: the board plus everything needed to apply and take back moves.
//!
//! [`GameState`] is the only thing that mutates a position. It owns the
//! board, the side to move, both king squares, the move log and the
//! parallel histories that make [`GameState::undo_move`] exact.

use crate::analysis::{analyze, Analysis};
use crate::movegen::{MoveGenerator, MoveList};
use crate::Board;
use chess_core::{CastlingRights, Color, ColoredPiece, Move, NotationError, Piece, Square};
use thiserror::Error;
use tracing::{debug, trace};

/// Error type for the checked move entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The move is not in the current legal-move set.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// The move text could not be parsed.
    #[error(transparent)]
    InvalidNotation(#[from] NotationError),

    /// A position was built without a king for one side.
    #[error("no {0} king on the board")]
    MissingKing(Color),
}

/// Where the game stands after the latest legal-move computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Normal,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    /// Returns true for checkmate and stalemate.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

/// A chess game in progress.
///
/// Cloning is the explicit snapshot operation; see [`GameState::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    move_log: Vec<Move>,
    white_king: Square,
    black_king: Square,
    /// Square passed over by the previous move's double push, if any.
    en_passant: Option<Square>,
    /// En passant target before each logged move, one entry per move.
    en_passant_log: Vec<Option<Square>>,
    castling: CastlingRights,
    /// Rights after each logged move; the first entry is the starting rights.
    castling_log: Vec<CastlingRights>,
    checkmate: bool,
    stalemate: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a game with the standard starting position and full castling rights.
    pub fn new() -> Self {
        GameState {
            board: Board::initial(),
            side_to_move: Color::White,
            move_log: Vec::new(),
            white_king: Square::new(Color::White.back_row(), 4),
            black_king: Square::new(Color::Black.back_row(), 4),
            en_passant: None,
            en_passant_log: Vec::new(),
            castling: CastlingRights::ALL,
            castling_log: vec![CastlingRights::ALL],
            checkmate: false,
            stalemate: false,
        }
    }

    /// Creates a game from a constructed position.
    ///
    /// Each side must have a king on the board.
    pub fn from_board(
        board: Board,
        side_to_move: Color,
        castling: CastlingRights,
    ) -> Result<Self, GameError> {
        let white_king = board
            .find_king(Color::White)
            .ok_or(GameError::MissingKing(Color::White))?;
        let black_king = board
            .find_king(Color::Black)
            .ok_or(GameError::MissingKing(Color::Black))?;
        Ok(GameState {
            board,
            side_to_move,
            move_log: Vec::new(),
            white_king,
            black_king,
            en_passant: None,
            en_passant_log: Vec::new(),
            castling,
            castling_log: vec![castling],
            checkmate: false,
            stalemate: false,
        })
    }

    /// Returns an independent copy for another thread to read.
    ///
    /// Later `make_move`/`undo_move` calls on `self` never affect it.
    pub fn snapshot(&self) -> GameState {
        self.clone()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn white_to_move(&self) -> bool {
        self.side_to_move == Color::White
    }

    /// The moves played so far, oldest first.
    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.move_log.last()
    }

    pub fn king_square(&self, color: Color) -> Square {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// Set by [`GameState::get_valid_moves`] when it finds no move and the king is attacked.
    pub fn checkmate(&self) -> bool {
        self.checkmate
    }

    /// Set by [`GameState::get_valid_moves`] when it finds no move and the king is safe.
    pub fn stalemate(&self) -> bool {
        self.stalemate
    }

    /// Fresh check/pin analysis for the side to move.
    pub fn analysis(&self) -> Analysis {
        analyze(&self.board, self.king_square(self.side_to_move), self.side_to_move)
    }

    /// Returns true if the side to move is in check.
    pub fn in_check(&self) -> bool {
        self.analysis().in_check
    }

    /// Status as of the latest [`GameState::get_valid_moves`] call.
    pub fn status(&self) -> GameStatus {
        if self.checkmate {
            GameStatus::Checkmate
        } else if self.stalemate {
            GameStatus::Stalemate
        } else if self.in_check() {
            GameStatus::Check
        } else {
            GameStatus::Normal
        }
    }

    fn generator(&self) -> MoveGenerator<'_> {
        MoveGenerator::new(
            &self.board,
            self.side_to_move,
            self.king_square(self.side_to_move),
            self.en_passant,
            self.castling,
        )
    }

    /// Legal moves for the side to move, without touching the terminal flags.
    pub fn legal_moves(&self) -> MoveList {
        self.generator().legal_moves()
    }

    /// Legal moves for the side to move.
    ///
    /// Also re-derives the checkmate and stalemate flags: an empty result
    /// is checkmate when the side to move is in check, stalemate otherwise.
    pub fn get_valid_moves(&mut self) -> MoveList {
        let generator = self.generator();
        let moves = generator.legal_moves();
        let in_check = generator.analysis().in_check;

        self.checkmate = moves.is_empty() && in_check;
        self.stalemate = moves.is_empty() && !in_check;
        if self.checkmate {
            debug!(side = %self.side_to_move, plies = self.move_log.len(), "checkmate");
        } else if self.stalemate {
            debug!(side = %self.side_to_move, plies = self.move_log.len(), "stalemate");
        }
        moves
    }

    /// Applies a move taken from the current legal-move set.
    ///
    /// Passing any other move is a contract violation; use
    /// [`GameState::try_make_move`] for unchecked input. The legal-move set is
    /// not recomputed here.
    pub fn make_move(&mut self, m: Move) {
        let us = m.piece_moved.color;

        self.board.set(m.start, None);
        self.board.set(m.end, Some(m.piece_moved));
        self.move_log.push(m);
        self.side_to_move = self.side_to_move.opposite();

        if m.piece_moved.piece == Piece::King {
            self.set_king_square(us, m.end);
        }

        if m.is_pawn_promotion() {
            self.board
                .set(m.end, Some(ColoredPiece::new(us, Piece::Queen)));
        }

        if m.is_en_passant() {
            self.board.set(m.capture_square(), None);
        }

        self.en_passant_log.push(self.en_passant);
        self.en_passant = if m.is_double_push() {
            Some(m.passed_square())
        } else {
            None
        };

        if let Some((rook_from, rook_to)) = m.castle_rook_squares() {
            let rook = self.board.get(rook_from);
            self.board.set(rook_to, rook);
            self.board.set(rook_from, None);
        }

        self.castling.update_for_move(&m);
        self.castling_log.push(self.castling);

        trace!(ply = self.move_log.len(), mv = %m, "made move");
    }

    /// Takes back the most recent move. Does nothing if no move has been made.
    ///
    /// Always clears the checkmate and stalemate flags; call
    /// [`GameState::get_valid_moves`] again to re-derive them.
    pub fn undo_move(&mut self) {
        let Some(m) = self.move_log.pop() else {
            return;
        };

        self.board.set(m.start, Some(m.piece_moved));
        self.board.set(m.end, m.piece_captured);
        self.side_to_move = self.side_to_move.opposite();

        if m.piece_moved.piece == Piece::King {
            self.set_king_square(m.piece_moved.color, m.start);
        }

        if m.is_en_passant() {
            self.board.set(m.end, None);
            self.board.set(m.capture_square(), m.piece_captured);
        }

        if let Some(previous) = self.en_passant_log.pop() {
            self.en_passant = previous;
        }

        self.castling_log.pop();
        if let Some(&rights) = self.castling_log.last() {
            self.castling = rights;
        }

        if let Some((rook_from, rook_to)) = m.castle_rook_squares() {
            let rook = self.board.get(rook_to);
            self.board.set(rook_from, rook);
            self.board.set(rook_to, None);
        }

        self.checkmate = false;
        self.stalemate = false;

        trace!(ply = self.move_log.len() + 1, mv = %m, "undid move");
    }

    fn set_king_square(&mut self, color: Color, sq: Square) {
        match color {
            Color::White => self.white_king = sq,
            Color::Black => self.black_king = sq,
        }
    }

    /// Looks up the legal move between two squares.
    ///
    /// This is how a clicked (start, end) pair becomes a move: by structural
    /// equality against the generator's output, never trusted directly.
    pub fn find_move(&self, start: Square, end: Square) -> Result<Move, GameError> {
        self.legal_moves()
            .find(start, end)
            .ok_or_else(|| GameError::IllegalMove(format!("{}{}", start, end)))
    }

    /// Validates and applies the move between two squares.
    pub fn try_make_move(&mut self, start: Square, end: Square) -> Result<Move, GameError> {
        let m = self.find_move(start, end)?;
        self.make_move(m);
        Ok(m)
    }

    /// Validates and applies a move written as origin and destination, e.g. "e2e4".
    pub fn make_move_notation(&mut self, notation: &str) -> Result<Move, GameError> {
        if notation.len() != 4 || !notation.is_ascii() {
            return Err(NotationError::InvalidMove(notation.to_string()).into());
        }
        let start = Square::from_algebraic(&notation[0..2])?;
        let end = Square::from_algebraic(&notation[2..4])?;
        self.try_make_move(start, end)
    }
}
