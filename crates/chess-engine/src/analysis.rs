//! Check and pin detection.
//!
//! [`analyze`] casts the eight rays and the eight knight jumps out from a
//! king square and reports which enemy pieces give check and which allied
//! pieces are pinned. It is a pure function of the board, so the king
//! generator can call it again from each hypothetical destination.

use crate::Board;
use chess_core::{Color, ColoredPiece, Direction, Piece, Square};

/// An allied piece that may only move along `direction` or its reverse.
///
/// `direction` points from the king towards the pinned piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub square: Square,
    pub direction: Direction,
}

/// An enemy piece attacking the king.
///
/// `direction` points from the king towards the attacker; for knights it
/// is the knight offset itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check {
    pub attacker: Square,
    pub direction: Direction,
}

/// The result of analysing one king square.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub in_check: bool,
    pub pins: Vec<Pin>,
    pub checks: Vec<Check>,
}

impl Analysis {
    /// Returns the pin axis of the piece on `sq`, if it is pinned.
    pub fn pin_direction(&self, sq: Square) -> Option<Direction> {
        self.pins
            .iter()
            .find(|pin| pin.square == sq)
            .map(|pin| pin.direction)
    }

    #[inline]
    pub fn is_pinned(&self, sq: Square) -> bool {
        self.pin_direction(sq).is_some()
    }

    /// Two or more attackers: only a king move can answer.
    #[inline]
    pub fn is_double_check(&self) -> bool {
        self.checks.len() > 1
    }
}

/// Returns true if `enemy`, found `distance` squares from the king along
/// `direction`, attacks the king down that ray.
fn attacks_along(enemy: ColoredPiece, direction: Direction, distance: i8) -> bool {
    match enemy.piece {
        Piece::Rook => direction.is_orthogonal(),
        Piece::Bishop => direction.is_diagonal(),
        Piece::Queen => true,
        Piece::King => distance == 1,
        // The pawn sits one step diagonally ahead of the king from its own
        // point of view, i.e. it steps towards the king.
        Piece::Pawn => {
            distance == 1
                && direction.is_diagonal()
                && direction.dr == -enemy.color.pawn_direction()
        }
        Piece::Knight => false,
    }
}

/// Computes checks and pins for the king of `us` standing on `king`.
///
/// `king` need not be where the king actually is: the allied king is
/// transparent to the rays, so the board may still show it on its old
/// square while a candidate destination is tested.
pub fn analyze(board: &Board, king: Square, us: Color) -> Analysis {
    let mut analysis = Analysis::default();

    for direction in Direction::ALL {
        let mut possible_pin: Option<Square> = None;
        for (i, sq) in direction.ray(king).enumerate() {
            let Some(piece) = board.get(sq) else {
                continue;
            };
            if piece.color == us {
                if piece.piece == Piece::King {
                    continue;
                }
                if possible_pin.is_some() {
                    // Second allied piece: nothing comes through this ray.
                    break;
                }
                possible_pin = Some(sq);
                continue;
            }

            if attacks_along(piece, direction, i as i8 + 1) {
                match possible_pin {
                    None => {
                        analysis.in_check = true;
                        analysis.checks.push(Check {
                            attacker: sq,
                            direction,
                        });
                    }
                    Some(square) => analysis.pins.push(Pin { square, direction }),
                }
            }
            break;
        }
    }

    for jump in Direction::KNIGHT {
        let Some(sq) = jump.step(king, 1) else {
            continue;
        };
        if board.get(sq) == Some(ColoredPiece::new(us.opposite(), Piece::Knight)) {
            analysis.in_check = true;
            analysis.checks.push(Check {
                attacker: sq,
                direction: jump,
            });
        }
    }

    analysis
}

/// Every square attacked by one side.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AttackMap([bool; 64]);

impl AttackMap {
    #[inline]
    pub fn contains(&self, sq: Square) -> bool {
        self.0[sq.index() as usize]
    }

    #[inline]
    fn insert(&mut self, sq: Square) {
        self.0[sq.index() as usize] = true;
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&attacked| attacked).count()
    }
}

impl std::fmt::Debug for AttackMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(Square::all().filter(|&sq| self.contains(sq)))
            .finish()
    }
}

/// Builds the attack map of `by` with one pass over its pieces.
///
/// Pins are ignored: a pinned piece still controls its squares. Pawn
/// diagonals count whether or not anything stands there.
pub fn attacked_squares(board: &Board, by: Color) -> AttackMap {
    let mut map = AttackMap([false; 64]);

    for (from, piece) in board.pieces_of(by) {
        match piece.piece {
            Piece::Pawn => {
                for dc in [-1, 1] {
                    if let Some(to) = from.offset(by.pawn_direction(), dc) {
                        map.insert(to);
                    }
                }
            }
            Piece::Knight => {
                for to in Direction::KNIGHT.iter().filter_map(|d| d.step(from, 1)) {
                    map.insert(to);
                }
            }
            Piece::King => {
                for to in Direction::ALL.iter().filter_map(|d| d.step(from, 1)) {
                    map.insert(to);
                }
            }
            Piece::Bishop | Piece::Rook | Piece::Queen => {
                let directions: &[Direction] = match piece.piece {
                    Piece::Bishop => &Direction::DIAGONAL,
                    Piece::Rook => &Direction::ORTHOGONAL,
                    _ => &Direction::ALL,
                };
                for direction in directions {
                    for to in direction.ray(from) {
                        map.insert(to);
                        if !board.is_empty(to) {
                            break;
                        }
                    }
                }
            }
        }
    }

    map
}

/// Returns true if `sq` is attacked by any piece of `by`.
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    attacked_squares(board, by).contains(sq)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn board(diagram: &str) -> Board {
        Board::from_diagram(diagram).unwrap()
    }

    #[test]
    fn start_position_is_quiet() {
        let b = Board::initial();
        let a = analyze(&b, sq("e1"), Color::White);
        assert_eq!(a, Analysis::default());
    }

    #[test]
    fn rook_check_along_rank() {
        let b = board(
            "....k...
             ........
             ........
             ........
             ........
             ........
             ........
             ....K..r",
        );
        let a = analyze(&b, sq("e1"), Color::White);
        assert!(a.in_check);
        assert_eq!(
            a.checks,
            vec![Check {
                attacker: sq("h1"),
                direction: Direction::EAST
            }]
        );
        assert!(a.pins.is_empty());
    }

    #[test]
    fn rook_on_diagonal_does_not_check() {
        let b = board(
            "....k...
             ........
             ........
             ........
             .r......
             ........
             ........
             ....K...",
        );
        assert!(!analyze(&b, sq("e1"), Color::White).in_check);
    }

    #[test]
    fn pin_is_recorded_with_direction() {
        let b = board(
            "....r..k
             ........
             ........
             ........
             ........
             ........
             ....R...
             ....K...",
        );
        let a = analyze(&b, sq("e1"), Color::White);
        assert!(!a.in_check);
        assert_eq!(a.pin_direction(sq("e2")), Some(Direction::NORTH));
        assert!(!a.is_pinned(sq("e1")));
    }

    #[test]
    fn two_allied_blockers_cancel_the_pin() {
        let b = board(
            "....r..k
             ........
             ........
             ........
             ....B...
             ........
             ....R...
             ....K...",
        );
        let a = analyze(&b, sq("e1"), Color::White);
        assert!(a.pins.is_empty());
        assert!(!a.in_check);
    }

    #[test]
    fn enemy_blocker_shields() {
        let b = board(
            "....r..k
             ........
             ........
             ........
             ....n...
             ........
             ....R...
             ....K...",
        );
        let a = analyze(&b, sq("e1"), Color::White);
        assert!(a.pins.is_empty());
    }

    #[test]
    fn pawn_checks_only_forward_diagonals() {
        // Black pawn on d2 attacks e1.
        let b = board(
            "k.......
             ........
             ........
             ........
             ........
             ........
             ...p....
             ....K...",
        );
        let a = analyze(&b, sq("e1"), Color::White);
        assert!(a.in_check);
        assert_eq!(a.checks[0].attacker, sq("d2"));

        // White pawns only attack towards rank 8.
        let b = board(
            "........
             ........
             ........
             ....k...
             ...P....
             ........
             ........
             K.......",
        );
        assert!(analyze(&b, sq("e5"), Color::Black).in_check);
        let b = board(
            "........
             ........
             ........
             ...P....
             ....k...
             ........
             ........
             K.......",
        );
        assert!(!analyze(&b, sq("e4"), Color::Black).in_check);
    }

    #[test]
    fn knight_check_and_double_check() {
        let b = board(
            "....k...
             ........
             ........
             ........
             ........
             .....n..
             ........
             ....K..r",
        );
        let a = analyze(&b, sq("e1"), Color::White);
        assert!(a.in_check);
        assert!(a.is_double_check());
        assert!(a.checks.iter().any(|c| c.attacker == sq("f3")));
    }

    #[test]
    fn king_is_transparent_to_its_own_rays() {
        // Testing f1 while the king still stands on e1: the rook on a1
        // attacks f1 through e1.
        let b = board(
            "....k...
             ........
             ........
             ........
             ........
             ........
             ........
             r...K...",
        );
        assert!(analyze(&b, sq("f1"), Color::White).in_check);
    }

    #[test]
    fn attack_map_counts_empty_pawn_diagonals() {
        let b = board(
            "....k...
             ........
             ........
             ........
             ........
             ........
             ....p...
             ....K...",
        );
        let map = attacked_squares(&b, Color::Black);
        assert!(map.contains(sq("d1")));
        assert!(map.contains(sq("f1")));
        assert!(!map.contains(sq("e1")));
        assert!(is_square_attacked(&b, sq("f1"), Color::Black));
    }

    #[test]
    fn start_position_attack_counts() {
        let b = Board::initial();
        let white = attacked_squares(&b, Color::White);
        // Ranks 2 and 3 in full, plus b1 through g1.
        assert_eq!(white.count(), 22);
        assert!(!white.contains(sq("a1")));
        assert!(!white.contains(sq("h1")));
        assert!(white.contains(sq("d1")));
        assert_eq!(attacked_squares(&b, Color::Black).count(), 22);
    }

    #[test]
    fn attack_map_stops_sliders_at_blockers() {
        let b = board(
            "....k...
             ........
             ........
             ........
             ........
             ........
             ........
             r..N...K",
        );
        let map = attacked_squares(&b, Color::Black);
        assert!(map.contains(sq("d1")));
        assert!(!map.contains(sq("e1")));
    }
}
