//! Step vectors for rays, knight jumps and king steps.

use crate::Square;

/// A (row, column) step on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dr: i8,
    pub dc: i8,
}

impl Direction {
    #[inline]
    pub const fn new(dr: i8, dc: i8) -> Self {
        Direction { dr, dc }
    }

    pub const NORTH: Direction = Direction::new(-1, 0);
    pub const WEST: Direction = Direction::new(0, -1);
    pub const SOUTH: Direction = Direction::new(1, 0);
    pub const EAST: Direction = Direction::new(0, 1);
    pub const NORTH_WEST: Direction = Direction::new(-1, -1);
    pub const NORTH_EAST: Direction = Direction::new(-1, 1);
    pub const SOUTH_WEST: Direction = Direction::new(1, -1);
    pub const SOUTH_EAST: Direction = Direction::new(1, 1);

    /// Rook rays.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::NORTH,
        Direction::WEST,
        Direction::SOUTH,
        Direction::EAST,
    ];

    /// Bishop rays.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NORTH_WEST,
        Direction::NORTH_EAST,
        Direction::SOUTH_WEST,
        Direction::SOUTH_EAST,
    ];

    /// All eight rays, orthogonal first. Also the king's step set.
    pub const ALL: [Direction; 8] = [
        Direction::NORTH,
        Direction::WEST,
        Direction::SOUTH,
        Direction::EAST,
        Direction::NORTH_WEST,
        Direction::NORTH_EAST,
        Direction::SOUTH_WEST,
        Direction::SOUTH_EAST,
    ];

    /// Knight jumps. Never slide, never blockable.
    pub const KNIGHT: [Direction; 8] = [
        Direction::new(-2, -1),
        Direction::new(-2, 1),
        Direction::new(-1, -2),
        Direction::new(-1, 2),
        Direction::new(1, -2),
        Direction::new(1, 2),
        Direction::new(2, -1),
        Direction::new(2, 1),
    ];

    #[inline]
    pub const fn opposite(self) -> Self {
        Direction::new(-self.dr, -self.dc)
    }

    #[inline]
    pub const fn is_orthogonal(self) -> bool {
        (self.dr == 0) != (self.dc == 0)
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.dr != 0 && self.dc != 0 && self.dr.abs() == self.dc.abs()
    }

    /// Returns true if `other` runs along the same line, either way.
    #[inline]
    pub fn same_axis(self, other: Direction) -> bool {
        self == other || self == other.opposite()
    }

    /// Steps `distance` times from `from`, or `None` if that leaves the board.
    #[inline]
    pub const fn step(self, from: Square, distance: i8) -> Option<Square> {
        from.offset(self.dr * distance, self.dc * distance)
    }

    /// Iterates the squares along this ray from `from`, excluding `from`.
    pub fn ray(self, from: Square) -> impl Iterator<Item = Square> {
        (1..8).map_while(move |i| self.step(from, i))
    }
}
