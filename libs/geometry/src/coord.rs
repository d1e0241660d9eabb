//! Grid coordinates.

use serde::{Deserialize, Serialize};

use crate::dir::Dir;
use crate::side::Side;

/// The coordinate of one cell on the grid.
#[derive(
    Debug, Copy, Clone, Default, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct CellCoord {
    /// The x-coordinate of the cell.
    pub x: i32,
    /// The y-coordinate of the cell.
    pub y: i32,
}

impl CellCoord {
    /// Creates a new [`CellCoord`] from (x,y) coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin, `(0, 0)`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(CellCoord::zero(), CellCoord::new(0, 0));
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Gets the coordinate associated with direction `dir`.
    pub const fn coord(&self, dir: Dir) -> i32 {
        match dir {
            Dir::Horiz => self.x,
            Dir::Vert => self.y,
        }
    }

    /// The cell adjacent to this one on the given side.
    ///
    /// Returns `None` if that cell would lie off the edge of the grid.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let c = CellCoord::new(4, 4);
    /// assert_eq!(c.checked_neighbor(Side::Up), Some(CellCoord::new(4, 5)));
    /// assert_eq!(c.checked_neighbor(Side::Left), Some(CellCoord::new(3, 4)));
    /// assert_eq!(CellCoord::new(i32::MAX, 0).checked_neighbor(Side::Right), None);
    /// ```
    #[inline]
    pub const fn checked_neighbor(&self, side: Side) -> Option<Self> {
        let (dx, dy) = side.offset();
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }

    /// The side of `self` on which `other` lies, if the two cells are adjacent.
    pub fn side_toward(&self, other: CellCoord) -> Option<Side> {
        self.neighbors()
            .find(|(_, neighbor)| *neighbor == other)
            .map(|(side, _)| side)
    }

    /// Iterates over the neighbors of this cell with the side each lies on.
    ///
    /// Cells on the edge of the grid have fewer than four neighbors.
    pub fn neighbors(&self) -> impl Iterator<Item = (Side, CellCoord)> + '_ {
        Side::ALL
            .into_iter()
            .filter_map(move |side| Some((side, self.checked_neighbor(side)?)))
    }

    /// Adds `rhs` to this coordinate, or returns `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, rhs: CellCoord) -> Option<Self> {
        match (self.x.checked_add(rhs.x), self.y.checked_add(rhs.y)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }

    /// Subtracts `rhs` from this coordinate, or returns `None` on overflow.
    #[inline]
    pub const fn checked_sub(&self, rhs: CellCoord) -> Option<Self> {
        match (self.x.checked_sub(rhs.x), self.y.checked_sub(rhs.y)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }

    /// Splits this coordinate into the chunk containing it and the
    /// position of the cell within that chunk.
    ///
    /// `size` is the edge length of a square chunk. Negative coordinates
    /// are floored, so `-1` lies in chunk `-1`, not chunk `0`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let (chunk, local) = CellCoord::new(-1, 33).chunked(32);
    /// assert_eq!(chunk, ChunkCoord::new(-1, 1));
    /// assert_eq!(local, (31, 1));
    /// ```
    #[inline]
    pub const fn chunked(&self, size: i32) -> (ChunkCoord, (u32, u32)) {
        let chunk = ChunkCoord::new(self.x.div_euclid(size), self.y.div_euclid(size));
        let local = (self.x.rem_euclid(size) as u32, self.y.rem_euclid(size) as u32);
        (chunk, local)
    }
}

impl std::ops::Add<CellCoord> for CellCoord {
    type Output = Self;
    fn add(self, rhs: CellCoord) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign<CellCoord> for CellCoord {
    fn add_assign(&mut self, rhs: CellCoord) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub<CellCoord> for CellCoord {
    type Output = Self;
    fn sub(self, rhs: CellCoord) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::SubAssign<CellCoord> for CellCoord {
    fn sub_assign(&mut self, rhs: CellCoord) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from(value: (i32, i32)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The coordinate of a square chunk of cells.
#[derive(
    Debug, Copy, Clone, Default, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct ChunkCoord {
    /// The x-coordinate of the chunk.
    pub x: i32,
    /// The y-coordinate of the chunk.
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new [`ChunkCoord`].
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate of the lower-left cell of this chunk.
    #[inline]
    pub const fn origin(&self, size: i32) -> CellCoord {
        CellCoord::new(self.x * size, self.y * size)
    }
}
