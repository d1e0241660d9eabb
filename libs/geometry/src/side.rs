//! The four sides of a cell.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::dir::Dir;

/// One of the four cardinal sides of a cell.
///
/// The discriminant order (up, right, down, left) is clockwise and is the
/// bit order used by packed placements.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// `+y`.
    Up = 0,
    /// `+x`.
    Right = 1,
    /// `-y`.
    Down = 2,
    /// `-x`.
    Left = 3,
}

impl Side {
    /// All four sides in clockwise order, starting from [`Side::Up`].
    pub const ALL: [Side; 4] = [Side::Up, Side::Right, Side::Down, Side::Left];

    /// The side facing the opposite way.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Side::Up.opposite(), Side::Down);
    /// assert_eq!(Side::Left.opposite(), Side::Right);
    /// ```
    pub const fn opposite(&self) -> Self {
        match *self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// The axis this side lies on.
    pub const fn dir(&self) -> Dir {
        match *self {
            Self::Up | Self::Down => Dir::Vert,
            Self::Left | Self::Right => Dir::Horiz,
        }
    }

    /// The bit index of this side within a placement nibble.
    #[inline]
    pub const fn index(&self) -> u8 {
        *self as u8
    }

    /// Returns `true` for [`Side::Up`] and [`Side::Left`].
    #[inline]
    pub const fn is_up_left(&self) -> bool {
        matches!(*self, Self::Up | Self::Left)
    }

    /// The unit offset `(dx, dy)` to the neighbor on this side.
    pub const fn offset(&self) -> (i32, i32) {
        match *self {
            Self::Up => (0, 1),
            Self::Right => (1, 0),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Up => write!(f, "up"),
            Self::Right => write!(f, "right"),
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
        }
    }
}
