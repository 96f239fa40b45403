//! Castling rights.

use crate::{Color, Move, Piece, Square};

/// The four castling flags.
///
/// Rights only ever get revoked during a game. Restoring them on undo is the
/// job of the history kept alongside the move log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights {
        white_kingside: false,
        white_queenside: false,
        black_kingside: false,
        black_queenside: false,
    };

    pub const ALL: CastlingRights = CastlingRights {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    /// Removes both castling rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove_kingside(color);
        self.remove_queenside(color);
    }

    /// Removes kingside castling for a color.
    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        match color {
            Color::White => self.white_kingside = false,
            Color::Black => self.black_kingside = false,
        }
    }

    /// Removes queenside castling for a color.
    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        match color {
            Color::White => self.white_queenside = false,
            Color::Black => self.black_queenside = false,
        }
    }

    /// Revokes whatever `m` forfeits: a king move drops both of its side's
    /// rights, a rook leaving its corner or being captured there drops that
    /// corner's right.
    pub fn update_for_move(&mut self, m: &Move) {
        let mover = m.piece_moved;
        match mover.piece {
            Piece::King => self.remove_color(mover.color),
            Piece::Rook => self.remove_for_corner(mover.color, m.start),
            _ => {}
        }
        if let Some(captured) = m.piece_captured {
            if captured.piece == Piece::Rook {
                self.remove_for_corner(captured.color, m.end);
            }
        }
    }

    fn remove_for_corner(&mut self, color: Color, sq: Square) {
        if sq.row() != color.back_row() {
            return;
        }
        match sq.col() {
            0 => self.remove_queenside(color),
            7 => self.remove_kingside(color),
            _ => {}
        }
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::ALL
    }
}
