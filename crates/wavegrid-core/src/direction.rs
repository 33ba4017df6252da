//! The eight compass [`Direction`]s of a square grid.

use std::fmt;

use crate::geom::Point;

/// A compass direction. `N` points toward smaller `y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    N = 0,
    NE = 1,
    E = 2,
    SE = 3,
    S = 4,
    SW = 5,
    W = 6,
    NW = 7,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// The four axis-aligned directions.
    pub const AXIS: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    /// The four diagonal directions.
    pub const DIAGONAL: [Direction; 4] =
        [Direction::NE, Direction::SE, Direction::SW, Direction::NW];

    /// Unit offset of one step in this direction.
    #[inline]
    pub const fn offset(self) -> Point {
        match self {
            Direction::N => Point::new(0, -1),
            Direction::NE => Point::new(1, -1),
            Direction::E => Point::new(1, 0),
            Direction::SE => Point::new(1, 1),
            Direction::S => Point::new(0, 1),
            Direction::SW => Point::new(-1, 1),
            Direction::W => Point::new(-1, 0),
            Direction::NW => Point::new(-1, -1),
        }
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        (self as u8) & 1 == 1
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        Self::from_index((self as u8) + 4)
    }

    /// The 3-bit index (0 = N, clockwise).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Inverse of [`index`](Self::index). Only the low three bits are used.
    #[inline]
    pub const fn from_index(i: u8) -> Direction {
        Self::ALL[(i & 7) as usize]
    }

    /// The neighbour of `p` one step in this direction.
    #[inline]
    pub fn step(self, p: Point) -> Point {
        p + self.offset()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        };
        f.write_str(s)
    }
}
