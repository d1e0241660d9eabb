//! An import prelude that re-exports commonly used items.

pub use crate::coord::{CellCoord, ChunkCoord};
pub use crate::dir::Dir;
pub use crate::rect::Rect;
pub use crate::side::Side;
pub use crate::transform::Transform;
