//! 2-D integer grid geometry for cell-based layouts.
//!
//! Every coordinate addresses one cell of an unbounded grid.
//! The y-axis points up: [`Side::Up`] is `+y`.
//!
//! # Examples
//!
//! Create a [rectangle](crate::rect::Rect) of cells:
//!
//! ```
//! # use geometry::prelude::*;
//! let rect = Rect::from_sides(0, 0, 3, 2);
//! assert_eq!(rect.cell_count(), 12);
//! ```
#![warn(missing_docs)]

extern crate self as geometry;

pub mod coord;
pub mod dir;
pub mod prelude;
pub mod rect;
pub mod side;
pub mod transform;
