//! Legal move generation.
//!
//! Each piece type has its own pseudo-legal generator that already honours
//! pins. [`MoveGenerator::legal_moves`] combines them with the check
//! response rules, castling and en passant legality:
//!
//! - no check: every piece moves, plus castling
//! - one check: king moves, or moves that capture the checker or block the
//!   line between it and the king (knight checks can only be captured)
//! - double check: king moves only

pub mod perft;

use crate::analysis::{analyze, attacked_squares, Analysis, Check};
use crate::Board;
use chess_core::{CastlingRights, Color, Direction, Move, Piece, Square};

/// An ordered list of moves.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    /// Typical upper bound on legal moves, used as the initial capacity.
    pub const CAPACITY: usize = 64;

    /// Creates an empty move list.
    #[inline]
    pub fn new() -> Self {
        MoveList {
            moves: Vec::with_capacity(Self::CAPACITY),
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    /// Returns the number of moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    /// Clears the move list.
    #[inline]
    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        self.moves.retain(f);
    }

    /// Returns true if a move between the same two squares is present.
    #[inline]
    pub fn contains(&self, m: &Move) -> bool {
        self.moves.contains(m)
    }

    /// Finds the listed move from `start` to `end`.
    pub fn find(&self, start: Square, end: Square) -> Option<Move> {
        self.moves
            .iter()
            .copied()
            .find(|m| m.start == start && m.end == end)
    }

    /// Iterates over the moves made by the piece on `start`.
    pub fn from_square(&self, start: Square) -> impl Iterator<Item = &Move> {
        self.moves.iter().filter(move |m| m.start == start)
    }

    pub fn into_vec(self) -> Vec<Move> {
        self.moves
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        MoveList {
            moves: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Move generation for one side in one position.
///
/// Runs the check/pin analysis once on construction; the result is only
/// read afterwards, so the per-piece generators can be called in any order.
pub struct MoveGenerator<'a> {
    board: &'a Board,
    us: Color,
    king: Square,
    en_passant: Option<Square>,
    castling: CastlingRights,
    analysis: Analysis,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(
        board: &'a Board,
        us: Color,
        king: Square,
        en_passant: Option<Square>,
        castling: CastlingRights,
    ) -> Self {
        let analysis = analyze(board, king, us);
        MoveGenerator {
            board,
            us,
            king,
            en_passant,
            castling,
            analysis,
        }
    }

    /// The checks and pins for the side to move.
    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// Generates every legal move for the side to move.
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();

        match self.analysis.checks.as_slice() {
            [] => {
                self.all_moves(&mut moves);
                self.castle_moves(&mut moves);
            }
            [check] => {
                self.all_moves(&mut moves);
                let targets = self.check_response_squares(check);
                moves.retain(|m| {
                    m.piece_moved.piece == Piece::King
                        || targets.contains(&m.end)
                        || (m.is_en_passant() && m.capture_square() == check.attacker)
                });
            }
            _ => self.king_moves(self.king, &mut moves),
        }

        moves
    }

    /// Pseudo-legal moves of every piece of the side to move, pins applied.
    pub fn all_moves(&self, moves: &mut MoveList) {
        for (from, piece) in self.board.pieces_of(self.us) {
            match piece.piece {
                Piece::Pawn => self.pawn_moves(from, moves),
                Piece::Knight => self.knight_moves(from, moves),
                Piece::Bishop => self.bishop_moves(from, moves),
                Piece::Rook => self.rook_moves(from, moves),
                Piece::Queen => self.queen_moves(from, moves),
                Piece::King => self.king_moves(from, moves),
            }
        }
    }

    /// Squares a non-king move must land on to answer a single check.
    fn check_response_squares(&self, check: &Check) -> Vec<Square> {
        let attacker = self.board.get(check.attacker).map(|p| p.piece);
        if attacker == Some(Piece::Knight) {
            return vec![check.attacker];
        }
        let mut squares = Vec::new();
        for sq in check.direction.ray(self.king) {
            squares.push(sq);
            if sq == check.attacker {
                break;
            }
        }
        squares
    }

    /// Returns true if the piece on `from` may move along `direction`.
    #[inline]
    fn pin_allows(&self, from: Square, direction: Direction) -> bool {
        match self.analysis.pin_direction(from) {
            Some(pin) => pin.same_axis(direction),
            None => true,
        }
    }

    fn push_move(&self, from: Square, to: Square, moves: &mut MoveList) {
        if let Some(piece) = self.board.get(from) {
            moves.push(Move::new(from, to, piece, self.board.get(to)));
        }
    }

    pub fn pawn_moves(&self, from: Square, moves: &mut MoveList) {
        let us = self.us;
        let dr = us.pawn_direction();

        let forward = Direction::new(dr, 0);
        if let Some(one) = forward.step(from, 1) {
            if self.board.is_empty(one) && self.pin_allows(from, forward) {
                self.push_move(from, one, moves);
                if from.row() == us.pawn_row() {
                    if let Some(two) = forward.step(from, 2) {
                        if self.board.is_empty(two) {
                            self.push_move(from, two, moves);
                        }
                    }
                }
            }
        }

        for dc in [-1, 1] {
            let diagonal = Direction::new(dr, dc);
            let Some(to) = diagonal.step(from, 1) else {
                continue;
            };
            if !self.pin_allows(from, diagonal) {
                continue;
            }
            if self.board.has_color(to, us.opposite()) {
                self.push_move(from, to, moves);
            } else if self.en_passant == Some(to) {
                let m = Move::en_passant(from, to, us);
                if !self.en_passant_exposes_king(&m) {
                    moves.push(m);
                }
            }
        }
    }

    /// En passant clears two squares of one row at once, which the pin scan
    /// cannot see. Play it out on a scratch board and look again.
    fn en_passant_exposes_king(&self, m: &Move) -> bool {
        let mut scratch = *self.board;
        scratch.set(m.start, None);
        scratch.set(m.capture_square(), None);
        scratch.set(m.end, Some(m.piece_moved));
        analyze(&scratch, self.king, self.us).in_check
    }

    pub fn knight_moves(&self, from: Square, moves: &mut MoveList) {
        // A knight never stays on its pin line.
        if self.analysis.is_pinned(from) {
            return;
        }
        for jump in Direction::KNIGHT {
            if let Some(to) = jump.step(from, 1) {
                if !self.board.has_color(to, self.us) {
                    self.push_move(from, to, moves);
                }
            }
        }
    }

    pub fn bishop_moves(&self, from: Square, moves: &mut MoveList) {
        self.slide(from, &Direction::DIAGONAL, moves);
    }

    pub fn rook_moves(&self, from: Square, moves: &mut MoveList) {
        self.slide(from, &Direction::ORTHOGONAL, moves);
    }

    pub fn queen_moves(&self, from: Square, moves: &mut MoveList) {
        self.rook_moves(from, moves);
        self.bishop_moves(from, moves);
    }

    fn slide(&self, from: Square, directions: &[Direction], moves: &mut MoveList) {
        for &direction in directions {
            if !self.pin_allows(from, direction) {
                continue;
            }
            for to in direction.ray(from) {
                match self.board.get(to) {
                    None => self.push_move(from, to, moves),
                    Some(piece) => {
                        if piece.color != self.us {
                            self.push_move(from, to, moves);
                        }
                        break;
                    }
                }
            }
        }
    }

    /// King steps that do not end in check.
    ///
    /// Every candidate is checked by re-running the full analysis as if the
    /// king already stood on the destination. The board is left untouched;
    /// the king's old square is transparent to the analysis.
    pub fn king_moves(&self, from: Square, moves: &mut MoveList) {
        for step in Direction::ALL {
            let Some(to) = step.step(from, 1) else {
                continue;
            };
            if self.board.has_color(to, self.us) {
                continue;
            }
            if !analyze(self.board, to, self.us).in_check {
                self.push_move(from, to, moves);
            }
        }
    }

    /// Castling moves still allowed by rights, occupancy and attacks.
    pub fn castle_moves(&self, moves: &mut MoveList) {
        if self.analysis.in_check {
            return;
        }
        let us = self.us;
        let king = self.king;
        if king != Square::new(us.back_row(), 4) {
            return;
        }
        let kingside = self.castling.can_castle_kingside(us) && self.rook_on(7);
        let queenside = self.castling.can_castle_queenside(us) && self.rook_on(0);
        if !kingside && !queenside {
            return;
        }

        let attacked = attacked_squares(self.board, us.opposite());
        let row = king.row();
        let free = |cols: &[u8]| cols.iter().all(|&c| self.board.is_empty(Square::new(row, c)));
        let safe = |cols: &[u8]| cols.iter().all(|&c| !attacked.contains(Square::new(row, c)));

        if kingside && free(&[5, 6]) && safe(&[4, 5, 6]) {
            moves.push(Move::castle(king, Square::new(row, 6), us));
        }
        if queenside && free(&[1, 2, 3]) && safe(&[4, 3, 2]) {
            moves.push(Move::castle(king, Square::new(row, 2), us));
        }
    }

    fn rook_on(&self, col: u8) -> bool {
        self.board
            .get(Square::new(self.us.back_row(), col))
            .is_some_and(|p| p.is(self.us, Piece::Rook))
    }
}
