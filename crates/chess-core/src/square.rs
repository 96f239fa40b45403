//! Board square representation.

use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing square or move notation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("invalid move notation: expected 4 characters like \"e2e4\", got {0:?}")]
    InvalidMove(String),
}

/// A square on the chess board, addressed by (row, column).
///
/// Row 0 is Black's back rank (rank 8) and row 7 is White's (rank 1).
/// Column 0 is the a-file. Internally stored as `row * 8 + col`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Creates a square from row and column.
    ///
    /// Both must be in `0..8`; this is the caller's contract.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8);
        Square(row * 8 + col)
    }

    /// Creates a square from signed coordinates, returning `None` off the board.
    #[inline]
    pub const fn try_new(row: i8, col: i8) -> Option<Self> {
        if row >= 0 && row < 8 && col >= 0 && col < 8 {
            Some(Square((row * 8 + col) as u8))
        } else {
            None
        }
    }

    /// Creates a square from index (0-63).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Returns the index (0-63).
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % 8
    }

    /// Returns the square `(dr, dc)` away, or `None` if that leaves the board.
    #[inline]
    pub const fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        Self::try_new(self.row() as i8 + dr, self.col() as i8 + dc)
    }

    /// Returns the file letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.col()) as char
    }

    /// Returns the rank digit ('1'-'8'); row 7 is rank '1'.
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'8' - self.row()) as char
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub fn from_algebraic(s: &str) -> Result<Self, NotationError> {
        let invalid = || NotationError::InvalidSquare(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        Ok(Square::new(b'8' - rank, file - b'a'))
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    /// Iterates over all 64 squares, row by row starting at row 0.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl std::str::FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn square_new() {
        let e4 = Square::new(4, 4);
        assert_eq!(e4.row(), 4);
        assert_eq!(e4.col(), 4);
        assert_eq!(e4.index(), 36);
        assert_eq!(e4.to_algebraic(), "e4");
    }

    #[test]
    fn corners() {
        assert_eq!(Square::new(0, 0).to_algebraic(), "a8");
        assert_eq!(Square::new(7, 0).to_algebraic(), "a1");
        assert_eq!(Square::new(7, 7).to_algebraic(), "h1");
        assert_eq!(Square::new(0, 7).to_algebraic(), "h8");
    }

    #[test]
    fn square_from_algebraic() {
        assert_eq!(Square::from_algebraic("a1"), Ok(Square::new(7, 0)));
        assert_eq!(Square::from_algebraic("e2"), Ok(Square::new(6, 4)));
        assert_eq!("h8".parse::<Square>(), Ok(Square::new(0, 7)));
        assert!(Square::from_algebraic("i1").is_err());
        assert!(Square::from_algebraic("a9").is_err());
        assert!(Square::from_algebraic("a0").is_err());
        assert_eq!(
            Square::from_algebraic(""),
            Err(NotationError::InvalidSquare(String::new()))
        );
    }

    #[test]
    fn offsets() {
        let a8 = Square::new(0, 0);
        assert_eq!(a8.offset(-1, 0), None);
        assert_eq!(a8.offset(0, -1), None);
        assert_eq!(a8.offset(1, 1), Some(Square::new(1, 1)));
        assert_eq!(Square::new(7, 7).offset(1, 0), None);
        assert_eq!(Square::try_new(8, 0), None);
    }

    proptest! {
        #[test]
        fn algebraic_names_parse_back(row in 0u8..8, col in 0u8..8) {
            let sq = Square::new(row, col);
            prop_assert_eq!(Square::from_algebraic(&sq.to_algebraic()), Ok(sq));
        }
    }
}
