//! Rectangular region operations and whole-buffer transforms.

use geometry::prelude::*;
use upc::{Metal, NormalizedCell, Upc};

use crate::buffer::Buffer;
use crate::Selection;

impl Buffer {
    /// The non-empty cells inside `rect`.
    fn cells_in(&self, rect: Rect) -> Vec<(CellCoord, Upc)> {
        if rect.cell_count() <= self.cell_count() as u64 {
            rect.cells()
                .map(|coord| (coord, self.get_cell(coord)))
                .filter(|(_, cell)| !cell.is_empty())
                .collect()
        } else {
            self.iter().filter(|(coord, _)| rect.contains(*coord)).collect()
        }
    }

    /// Copies the cells inside `selection` into a new buffer, with `anchor`
    /// moved to the origin.
    ///
    /// Links between cells inside the selection are kept; links that
    /// leave it are dropped. Cells whose offset from `anchor` does not fit
    /// on the grid are left out, along with links into them.
    pub fn clone_selection(&self, selection: Selection, anchor: CellCoord) -> Buffer {
        let mut clone = Buffer::new();
        let kept = |coord: CellCoord| {
            selection.contains(coord) && coord.checked_sub(anchor).is_some()
        };
        for (coord, packed) in self.cells_in(selection) {
            let Some(dest) = coord.checked_sub(anchor) else {
                continue;
            };
            let mut cell = packed.normalize();
            for side in Side::ALL {
                if !coord.checked_neighbor(side).is_some_and(kept) {
                    if let Metal::Trace { placement, .. } = &mut cell.metal {
                        placement.set(side, false);
                    }
                    cell.si.set_link(side, false);
                }
            }
            clone.put(dest, cell);
        }
        clone
    }

    /// Writes every cell of `buffer` into this buffer, offset so that the
    /// origin of `buffer` lands on `coord`.
    ///
    /// Pasted cells replace the destination cells outright. Links that the
    /// destination does not return afterwards are retracted on both sides.
    /// Cells that would land off the edge of the grid are skipped.
    pub fn paste_at(&mut self, coord: CellCoord, buffer: &Buffer) {
        let mut pasted = Vec::with_capacity(buffer.cell_count());
        let mut skipped = 0;
        for (offset, cell) in buffer.iter() {
            let Some(dest) = coord.checked_add(offset) else {
                skipped += 1;
                continue;
            };
            self.set_cell(dest, cell.canonicalize());
            pasted.push(dest);
        }
        let pruned = self.reconcile(pasted);
        tracing::debug!(cells = buffer.cell_count(), skipped, pruned, "pasted buffer");
    }

    /// Removes every cell inside `selection`, retracting links into it
    /// from outside.
    pub fn clear_selection(&mut self, selection: Selection) {
        let cells: Vec<_> = self
            .cells_in(selection)
            .into_iter()
            .map(|(coord, _)| coord)
            .collect();
        for coord in cells {
            if selection.on_border(coord) {
                self.clear_cell(coord);
            } else {
                self.set_cell(coord, Upc::EMPTY);
            }
        }
    }

    /// Removes the cells on the one-cell-wide border of `selection`,
    /// retracting links into them from both sides.
    pub fn clear_selection_border(&mut self, selection: Selection) {
        for coord in selection.border() {
            self.clear_cell(coord);
        }
    }

    /// A copy of this buffer rotated 90 degrees clockwise around the origin.
    pub fn rotate_to_new(&self) -> Buffer {
        self.transform_to_new(|coord, cell| (coord.rotate_cw(), cell.rotate_cw()))
    }

    /// A copy of this buffer mirrored left-to-right across the y-axis.
    pub fn mirror_to_new(&self) -> Buffer {
        self.transform_to_new(|coord, cell| (coord.mirror_horiz(), cell.mirror_horiz()))
    }

    fn transform_to_new(
        &self,
        f: impl Fn(CellCoord, NormalizedCell) -> (CellCoord, NormalizedCell),
    ) -> Buffer {
        let mut out = Buffer::new();
        for (coord, cell) in self.iter() {
            let (coord, cell) = f(coord, cell.normalize());
            out.put(coord, cell);
        }
        // Links across the i32::MIN column or row have no image.
        out.prune_dangling_links();
        out
    }
}
