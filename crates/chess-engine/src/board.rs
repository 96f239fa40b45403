//! Mailbox board: an 8×8 grid of optional pieces.

use chess_core::{Color, ColoredPiece, Piece, Square};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when reading a board diagram.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("invalid diagram: expected 8 rows, got {0}")]
    RowCount(usize),

    #[error("invalid diagram row {row}: expected 8 squares, got {len}")]
    RowLength { row: usize, len: usize },

    #[error("invalid diagram character '{0}'")]
    UnknownPiece(char),
}

const BACK_ROW: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

/// The piece placement. Row 0 is Black's back rank.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<ColoredPiece>; 8]; 8],
}

impl Board {
    /// Creates an empty board.
    pub const fn empty() -> Self {
        Board {
            cells: [[None; 8]; 8],
        }
    }

    /// Creates the standard starting placement.
    pub fn initial() -> Self {
        let mut board = Board::empty();
        for (col, piece) in BACK_ROW.into_iter().enumerate() {
            let col = col as u8;
            for color in [Color::White, Color::Black] {
                board.set(
                    Square::new(color.back_row(), col),
                    Some(ColoredPiece::new(color, piece)),
                );
                board.set(
                    Square::new(color.pawn_row(), col),
                    Some(ColoredPiece::new(color, Piece::Pawn)),
                );
            }
        }
        board
    }

    /// Reads a diagram of 8 rows, top row first.
    ///
    /// Uppercase letters are White, lowercase Black, `.` is an empty square.
    /// Whitespace inside a row and blank lines are ignored.
    pub fn from_diagram(diagram: &str) -> Result<Self, DiagramError> {
        let rows: Vec<Vec<char>> = diagram
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        if rows.len() != 8 {
            return Err(DiagramError::RowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (row, chars) in rows.iter().enumerate() {
            if chars.len() != 8 {
                return Err(DiagramError::RowLength {
                    row,
                    len: chars.len(),
                });
            }
            for (col, &c) in chars.iter().enumerate() {
                if c == '.' {
                    continue;
                }
                let piece = ColoredPiece::from_char(c).ok_or(DiagramError::UnknownPiece(c))?;
                board.set(Square::new(row as u8, col as u8), Some(piece));
            }
        }
        Ok(board)
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<ColoredPiece> {
        self.cells[sq.row() as usize][sq.col() as usize]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<ColoredPiece>) {
        self.cells[sq.row() as usize][sq.col() as usize] = piece;
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Returns true if a piece of `color` stands on `sq`.
    #[inline]
    pub fn has_color(&self, sq: Square, color: Color) -> bool {
        matches!(self.get(sq), Some(p) if p.color == color)
    }

    /// Read-only grid access for rendering.
    pub fn rows(&self) -> &[[Option<ColoredPiece>; 8]; 8] {
        &self.cells
    }

    /// Returns the cell code: `"wp"`, `"bk"`, ... or `"--"` for an empty square.
    pub fn code(&self, sq: Square) -> String {
        match self.get(sq) {
            Some(piece) => piece.to_string(),
            None => "--".to_string(),
        }
    }

    /// Iterates over the occupied squares of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, ColoredPiece)> + '_ {
        Square::all().filter_map(move |sq| match self.get(sq) {
            Some(p) if p.color == color => Some((sq, p)),
            _ => None,
        })
    }

    /// Locates the king of `color`.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, p)| p.piece == Piece::King)
            .map(|(sq, _)| sq)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                let c = cell.map_or('.', ColoredPiece::to_char);
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board(")?;
        write!(f, "{}", self)?;
        write!(f, ")")
    }
}
