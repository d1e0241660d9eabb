//! Manhattan path rasterization.

use geometry::prelude::*;

/// Longer paths grow their buffer as they go.
const MAX_RESERVED_CELLS: usize = 1 << 16;

/// The cells of an L-shaped path from `a` to `b`, both inclusive.
///
/// The path covers the full vertical leg first when `vertical` is `true`,
/// and the full horizontal leg first otherwise. Consecutive cells are
/// always adjacent and no cell repeats.
///
/// # Example
///
/// ```
/// # use geometry::prelude::*;
/// # use cellbuf::manhattan_path;
/// let path = manhattan_path(CellCoord::new(0, 0), CellCoord::new(2, 1), true);
/// assert_eq!(
///     path,
///     [(0, 0), (0, 1), (1, 1), (2, 1)].map(CellCoord::from),
/// );
/// ```
pub fn manhattan_path(a: CellCoord, b: CellCoord, vertical: bool) -> Vec<CellCoord> {
    let first = if vertical { Dir::Vert } else { Dir::Horiz };
    let len = (a.x.abs_diff(b.x) as usize)
        .saturating_add(a.y.abs_diff(b.y) as usize)
        .saturating_add(1);
    let mut path = Vec::with_capacity(len.min(MAX_RESERVED_CELLS));
    let mut cursor = a;
    path.push(cursor);
    for dir in [first, !first] {
        let step = b.coord(dir).cmp(&cursor.coord(dir)) as i32;
        let step = match dir {
            Dir::Horiz => CellCoord::new(step, 0),
            Dir::Vert => CellCoord::new(0, step),
        };
        while cursor.coord(dir) != b.coord(dir) {
            cursor += step;
            path.push(cursor);
        }
    }
    path
}
