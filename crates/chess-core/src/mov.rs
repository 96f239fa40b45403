//! Move representation.

use crate::{Color, ColoredPiece, Piece, Square};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Flags for special move types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Normal move or capture.
    Normal = 0,
    /// En passant capture; the captured pawn is beside the origin, not on the destination.
    EnPassant = 1,
    /// Castling; the king moves two columns and the rook jumps over it.
    Castle = 2,
    /// Pawn reaching the far row. Always promotes to a queen.
    Promotion = 3,
}

/// A single ply.
///
/// Moves are plain values built from a board snapshot. Equality and hashing
/// look at the start and end squares only, so a move reconstructed from a
/// clicked pair of squares compares equal to the generator's move.
#[derive(Clone, Copy)]
pub struct Move {
    pub start: Square,
    pub end: Square,
    pub piece_moved: ColoredPiece,
    pub piece_captured: Option<ColoredPiece>,
    pub flag: MoveFlag,
}

impl Move {
    /// Creates a move, flagging it as a promotion when a pawn reaches its last row.
    pub fn new(
        start: Square,
        end: Square,
        piece_moved: ColoredPiece,
        piece_captured: Option<ColoredPiece>,
    ) -> Self {
        let flag = if piece_moved.piece == Piece::Pawn
            && end.row() == piece_moved.color.promotion_row()
        {
            MoveFlag::Promotion
        } else {
            MoveFlag::Normal
        };
        Move {
            start,
            end,
            piece_moved,
            piece_captured,
            flag,
        }
    }

    /// Creates an en passant capture. The captured piece is always the opposing pawn.
    pub fn en_passant(start: Square, end: Square, color: Color) -> Self {
        Move {
            start,
            end,
            piece_moved: ColoredPiece::new(color, Piece::Pawn),
            piece_captured: Some(ColoredPiece::new(color.opposite(), Piece::Pawn)),
            flag: MoveFlag::EnPassant,
        }
    }

    /// Creates a castling move for the king of `color`.
    pub fn castle(start: Square, end: Square, color: Color) -> Self {
        Move {
            start,
            end,
            piece_moved: ColoredPiece::new(color, Piece::King),
            piece_captured: None,
            flag: MoveFlag::Castle,
        }
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.flag == MoveFlag::EnPassant
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.flag == MoveFlag::Castle
    }

    #[inline]
    pub fn is_pawn_promotion(&self) -> bool {
        self.flag == MoveFlag::Promotion
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.piece_captured.is_some()
    }

    /// Returns true for a pawn advancing two rows from its starting row.
    #[inline]
    pub fn is_double_push(&self) -> bool {
        self.piece_moved.piece == Piece::Pawn && self.start.row().abs_diff(self.end.row()) == 2
    }

    /// The square the captured piece stood on.
    ///
    /// Differs from `end` only for en passant.
    pub fn capture_square(&self) -> Square {
        if self.is_en_passant() {
            Square::new(self.start.row(), self.end.col())
        } else {
            self.end
        }
    }

    /// The square a pawn passes over on a double push.
    pub fn passed_square(&self) -> Square {
        Square::new((self.start.row() + self.end.row()) / 2, self.start.col())
    }

    /// For a castling move, the rook's (from, to) squares.
    pub fn castle_rook_squares(&self) -> Option<(Square, Square)> {
        if !self.is_castle() {
            return None;
        }
        let row = self.end.row();
        let col = self.end.col();
        if col > self.start.col() {
            Some((Square::new(row, col + 1), Square::new(row, col - 1)))
        } else {
            Some((Square::new(row, col - 2), Square::new(row, col + 1)))
        }
    }

    /// Stable equality key built from the start and end coordinates.
    #[inline]
    pub fn key(&self) -> u16 {
        self.start.row() as u16 * 1000
            + self.start.col() as u16 * 100
            + self.end.row() as u16 * 10
            + self.end.col() as u16
    }

    /// Origin and destination names concatenated, e.g. "e2e4".
    pub fn notation(&self) -> String {
        format!("{}{}", self.start, self.end)
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {})", self.piece_moved, self.notation())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}
