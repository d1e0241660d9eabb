//! Link reciprocity between neighboring cells.

use std::collections::BTreeSet;

use geometry::prelude::*;
use upc::Metal;

use crate::buffer::Buffer;

impl Buffer {
    /// Returns `true` if the metal of `coord` and of its neighbor on `side`
    /// link toward each other.
    ///
    /// A link off the edge of the grid is never returned.
    pub fn metal_linked(&self, coord: CellCoord, side: Side) -> bool {
        let Some(neighbor) = coord.checked_neighbor(side) else {
            return false;
        };
        self.cell(coord).metal.links(side) && self.cell(neighbor).metal.links(side.opposite())
    }

    /// Returns `true` if the silicon of `coord` and of its neighbor on `side`
    /// link toward each other with matching polarity.
    pub fn si_linked(&self, coord: CellCoord, side: Side) -> bool {
        let Some(neighbor) = coord.checked_neighbor(side) else {
            return false;
        };
        let here = self.cell(coord).si;
        let there = self.cell(neighbor).si;
        here.links(side)
            && there.links(side.opposite())
            && here.polarity_at(side) == there.polarity_at(side.opposite())
    }

    /// Clears every link of `coord` that its neighbor does not return.
    ///
    /// Returns the number of placement bits removed.
    pub(crate) fn prune_cell(&mut self, coord: CellCoord) -> usize {
        let mut cell = self.cell(coord);
        let mut removed = 0;
        for side in Side::ALL {
            if cell.metal.links(side) && !self.metal_linked(coord, side) {
                if let Metal::Trace { placement, .. } = &mut cell.metal {
                    placement.set(side, false);
                    removed += 1;
                }
            }
            if cell.si.links(side) && !self.si_linked(coord, side) {
                cell.si.set_link(side, false);
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!(%coord, removed, "pruned unreturned links");
            self.put(coord, cell);
        }
        removed
    }

    /// Prunes unreturned links on the given cells and on their neighbors.
    pub(crate) fn reconcile(&mut self, cells: impl IntoIterator<Item = CellCoord>) -> usize {
        let mut pending = BTreeSet::new();
        for coord in cells {
            pending.insert(coord);
            pending.extend(coord.neighbors().map(|(_, n)| n));
        }
        pending
            .into_iter()
            .map(|coord| self.prune_cell(coord))
            .sum()
    }

    /// Retracts every placement bit in the buffer that its neighbor does
    /// not return, and returns the number of bits removed.
    pub fn prune_dangling_links(&mut self) -> usize {
        let coords: Vec<_> = self.iter().map(|(coord, _)| coord).collect();
        coords.into_iter().map(|coord| self.prune_cell(coord)).sum()
    }
}
