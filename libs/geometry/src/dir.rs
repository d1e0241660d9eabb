//! Axis-aligned directions: horizontal or vertical.

use serde::{Deserialize, Serialize};

use crate::side::Side;

/// An enumeration of axis-aligned directions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
pub enum Dir {
    /// The horizontal, or x-aligned, direction.
    Horiz,
    /// The vertical, or y-aligned, direction.
    Vert,
}

impl Dir {
    /// Returns the other direction.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Dir::Vert.other(), Dir::Horiz);
    /// assert_eq!(Dir::Horiz.other(), Dir::Vert);
    /// ```
    pub const fn other(&self) -> Self {
        match *self {
            Self::Horiz => Self::Vert,
            Self::Vert => Self::Horiz,
        }
    }

    /// The two sides lying along this direction.
    ///
    /// The up/left side comes first.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Dir::Horiz.sides(), [Side::Left, Side::Right]);
    /// assert_eq!(Dir::Vert.sides(), [Side::Up, Side::Down]);
    /// ```
    pub const fn sides(&self) -> [Side; 2] {
        match *self {
            Self::Horiz => [Side::Left, Side::Right],
            Self::Vert => [Side::Up, Side::Down],
        }
    }
}

impl std::ops::Not for Dir {
    type Output = Self;
    /// Returns the other direction.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(!Dir::Vert, Dir::Horiz);
    /// assert_eq!(!Dir::Horiz, Dir::Vert);
    /// ```
    fn not(self) -> Self::Output {
        self.other()
    }
}
