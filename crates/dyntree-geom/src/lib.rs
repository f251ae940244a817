//! Integer block positions, the six axis directions, and write bounds.
#![forbid(unsafe_code)]

mod bounds;

pub use bounds::{BlockBounds, SafeBounds};

use core::fmt;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ZERO: BlockPos = BlockPos { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The neighbouring position one block away in `dir`.
    #[inline]
    pub fn offset(self, dir: Direction) -> BlockPos {
        self + dir.normal()
    }

    #[inline]
    pub fn offset_by(self, dir: Direction, n: i32) -> BlockPos {
        let d = dir.normal();
        BlockPos::new(self.x + d.x * n, self.y + d.y * n, self.z + d.z * n)
    }

    #[inline]
    pub fn above(self) -> BlockPos {
        self.offset(Direction::Up)
    }

    #[inline]
    pub fn below(self) -> BlockPos {
        self.offset(Direction::Down)
    }

    #[inline]
    pub fn with_y(self, y: i32) -> BlockPos {
        BlockPos { y, ..self }
    }

    #[inline]
    pub fn dist_sq(self, other: BlockPos) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        let dz = i64::from(self.z - other.z);
        dx * dx + dy * dy + dz * dz
    }

    /// True when `other` shares a face with `self`.
    #[inline]
    pub fn is_face_neighbor(self, other: BlockPos) -> bool {
        self.dist_sq(other) == 1
    }

    /// The direction leading from `self` to a face neighbour, if `other` is one.
    pub fn direction_to(self, other: BlockPos) -> Option<Direction> {
        let d = other - self;
        Direction::ALL.into_iter().find(|dir| dir.normal() == d)
    }
}

impl Add for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn add(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for BlockPos {
    #[inline]
    fn add_assign(&mut self, rhs: BlockPos) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn sub(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for BlockPos {
    #[inline]
    fn sub_assign(&mut self, rhs: BlockPos) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Neg for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn neg(self) -> BlockPos {
        BlockPos::new(-self.x, -self.y, -self.z)
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<BlockPos> for (i32, i32, i32) {
    fn from(value: BlockPos) -> Self {
        (value.x, value.y, value.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Axis directions, numbered by their 3D data value (down, up, north, south, west, east).
/// North is -Z and west is -X.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[repr(u8)]
pub enum Direction {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    pub const HORIZONTAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: u8) -> Option<Direction> {
        Self::ALL.get(i as usize).copied()
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    #[inline]
    pub fn normal(self) -> BlockPos {
        match self {
            Direction::Down => BlockPos::new(0, -1, 0),
            Direction::Up => BlockPos::new(0, 1, 0),
            Direction::North => BlockPos::new(0, 0, -1),
            Direction::South => BlockPos::new(0, 0, 1),
            Direction::West => BlockPos::new(-1, 0, 0),
            Direction::East => BlockPos::new(1, 0, 0),
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Direction::Down | Direction::Up)
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction: {0}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "down" | "d" => Ok(Direction::Down),
            "up" | "u" => Ok(Direction::Up),
            "north" | "n" => Ok(Direction::North),
            "south" | "s" => Ok(Direction::South),
            "west" | "w" => Ok(Direction::West),
            "east" | "e" => Ok(Direction::East),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn opposite_is_involution(dir: Direction) {
            prop_assert_eq!(dir.opposite().opposite(), dir);
            prop_assert_ne!(dir.opposite(), dir);
        }

        #[test]
        fn index_round_trips(dir: Direction) {
            prop_assert_eq!(Direction::from_index(dir.index() as u8), Some(dir));
        }

        #[test]
        fn name_parses_back(dir: Direction) {
            prop_assert_eq!(dir.name().parse::<Direction>(), Ok(dir));
        }
    }

    #[test]
    fn from_index_rejects_fork_and_return() {
        assert_eq!(Direction::from_index(6), None);
        assert_eq!(Direction::from_index(7), None);
    }
}
