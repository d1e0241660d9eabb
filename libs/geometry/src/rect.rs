//! Axis-aligned rectangles of cells.

use serde::{Deserialize, Serialize};

use crate::coord::CellCoord;

/// An axis-aligned rectangle of cells, specified by lower-left and
/// upper-right corners.
///
/// Both corners are inclusive: a rectangle always contains at least one cell.
#[derive(
    Debug, Default, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Rect {
    /// The lower-left corner.
    ll: CellCoord,
    /// The upper-right corner.
    ur: CellCoord,
}

impl Rect {
    /// Creates a rectangle spanning the two given corners.
    ///
    /// The corners may be given in any order; they are sorted for you.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::new(CellCoord::new(3, -1), CellCoord::new(0, 2));
    /// assert_eq!(rect.ll(), CellCoord::new(0, -1));
    /// assert_eq!(rect.ur(), CellCoord::new(3, 2));
    /// ```
    pub fn new(a: CellCoord, b: CellCoord) -> Self {
        Self {
            ll: CellCoord::new(a.x.min(b.x), a.y.min(b.y)),
            ur: CellCoord::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates a rectangle from all 4 sides (left, bottom, right, top).
    ///
    /// # Panics
    ///
    /// This method panics if `left > right` or if `bot > top`.
    ///
    /// If you want sides to be sorted for you, consider using [`Rect::new`] instead.
    #[inline]
    pub fn from_sides(left: i32, bot: i32, right: i32, top: i32) -> Self {
        assert!(
            left <= right,
            "Rect::from_sides requires that left ({}) <= right ({})",
            left,
            right
        );
        assert!(
            bot <= top,
            "Rect::from_sides requires that bot ({}) <= top ({})",
            bot,
            top
        );
        Self {
            ll: CellCoord::new(left, bot),
            ur: CellCoord::new(right, top),
        }
    }

    /// The lower-left corner.
    #[inline]
    pub const fn ll(&self) -> CellCoord {
        self.ll
    }

    /// The upper-right corner.
    #[inline]
    pub const fn ur(&self) -> CellCoord {
        self.ur
    }

    /// The left edge x-coordinate.
    #[inline]
    pub const fn left(&self) -> i32 {
        self.ll.x
    }

    /// The bottom edge y-coordinate.
    #[inline]
    pub const fn bot(&self) -> i32 {
        self.ll.y
    }

    /// The right edge x-coordinate.
    #[inline]
    pub const fn right(&self) -> i32 {
        self.ur.x
    }

    /// The top edge y-coordinate.
    #[inline]
    pub const fn top(&self) -> i32 {
        self.ur.y
    }

    /// The number of columns of cells.
    #[inline]
    pub const fn width(&self) -> u64 {
        self.ur.x.abs_diff(self.ll.x) as u64 + 1
    }

    /// The number of rows of cells.
    #[inline]
    pub const fn height(&self) -> u64 {
        self.ur.y.abs_diff(self.ll.y) as u64 + 1
    }

    /// The total number of cells covered.
    #[inline]
    pub const fn cell_count(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }

    /// Returns `true` if the cell lies inside the rectangle.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0, 0, 2, 2);
    /// assert!(rect.contains(CellCoord::new(2, 0)));
    /// assert!(!rect.contains(CellCoord::new(3, 0)));
    /// ```
    #[inline]
    pub const fn contains(&self, p: CellCoord) -> bool {
        p.x >= self.ll.x && p.x <= self.ur.x && p.y >= self.ll.y && p.y <= self.ur.y
    }

    /// Returns `true` if the cell lies on the one-cell-wide border of the rectangle.
    #[inline]
    pub const fn on_border(&self, p: CellCoord) -> bool {
        self.contains(p)
            && (p.x == self.ll.x || p.x == self.ur.x || p.y == self.ll.y || p.y == self.ur.y)
    }

    /// Iterates over every cell in the rectangle, row by row from the bottom.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let Rect { ll, ur } = *self;
        (ll.y..=ur.y).flat_map(move |y| (ll.x..=ur.x).map(move |x| CellCoord::new(x, y)))
    }

    /// Iterates over the cells of the one-cell-wide border, without repeats.
    pub fn border(&self) -> impl Iterator<Item = CellCoord> {
        let Rect { ll, ur } = *self;
        let bot = (ll.x..=ur.x).map(move |x| CellCoord::new(x, ll.y));
        let top = (ll.x..=ur.x)
            .filter(move |_| ur.y != ll.y)
            .map(move |x| CellCoord::new(x, ur.y));
        let sides = (ll.y.saturating_add(1)..ur.y).flat_map(move |y| {
            let right = (ur.x != ll.x).then_some(CellCoord::new(ur.x, y));
            std::iter::once(CellCoord::new(ll.x, y)).chain(right)
        });
        bot.chain(top).chain(sides)
    }
}
