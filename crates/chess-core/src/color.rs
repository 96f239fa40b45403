//! Player color representation.

/// Represents the two players in chess.
///
/// White starts on rows 6 and 7, Black on rows 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the row delta of a pawn step (-1 for White, +1 for Black).
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Returns the back row for this color (7 for White, 0 for Black).
    #[inline]
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Returns the row pawns start on and may double-step from.
    #[inline]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Returns the row on which this color's pawns promote.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        self.opposite().back_row()
    }

    /// Returns the single-letter code used in piece codes ('w' or 'b').
    #[inline]
    pub const fn code(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_color() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }

    #[test]
    fn pawn_direction() {
        assert_eq!(Color::White.pawn_direction(), -1);
        assert_eq!(Color::Black.pawn_direction(), 1);
    }

    #[test]
    fn rows() {
        assert_eq!(Color::White.back_row(), 7);
        assert_eq!(Color::Black.back_row(), 0);
        assert_eq!(Color::White.pawn_row(), 6);
        assert_eq!(Color::Black.pawn_row(), 1);
        assert_eq!(Color::White.promotion_row(), 0);
        assert_eq!(Color::Black.promotion_row(), 7);
    }

    #[test]
    fn display_and_code() {
        assert_eq!(format!("{}", Color::White), "White");
        assert_eq!(Color::Black.code(), 'b');
    }
}
