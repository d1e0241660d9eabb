//! Manhattan rotations and reflections of grid objects.
//!
//! Rotations here turn clockwise around the origin cell, so that
//! repeated quarter turns walk the sides in the order
//! up → right → down → left → up.

use crate::coord::CellCoord;
use crate::dir::Dir;
use crate::side::Side;

/// A grid object that can be rotated by quarter turns and mirrored.
pub trait Transform: Copy {
    /// Rotates the object 90 degrees clockwise around the origin.
    fn rotate_cw(&self) -> Self;

    /// Mirrors the object across the y-axis, swapping left and right.
    fn mirror_horiz(&self) -> Self;
}

/// Negation wraps, so `i32::MIN` maps to itself.
impl Transform for CellCoord {
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(CellCoord::new(0, 1).rotate_cw(), CellCoord::new(1, 0));
    /// assert_eq!(CellCoord::new(2, 3).rotate_cw(), CellCoord::new(3, -2));
    /// ```
    #[inline]
    fn rotate_cw(&self) -> Self {
        CellCoord::new(self.y, self.x.wrapping_neg())
    }

    #[inline]
    fn mirror_horiz(&self) -> Self {
        CellCoord::new(self.x.wrapping_neg(), self.y)
    }
}

impl Transform for Side {
    #[inline]
    fn rotate_cw(&self) -> Self {
        match *self {
            Side::Up => Side::Right,
            Side::Right => Side::Down,
            Side::Down => Side::Left,
            Side::Left => Side::Up,
        }
    }

    #[inline]
    fn mirror_horiz(&self) -> Self {
        match *self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            other => other,
        }
    }
}

impl Transform for Dir {
    #[inline]
    fn rotate_cw(&self) -> Self {
        self.other()
    }

    #[inline]
    fn mirror_horiz(&self) -> Self {
        *self
    }
}
