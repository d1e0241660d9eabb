//! The addressable grid of packed cells.

use geometry::prelude::*;
use upc::{NormalizedCell, Upc};

use crate::atom::{Atom, CellPart};
use crate::store::ChunkStore;

/// An unbounded grid of packed cells.
///
/// Cloning a buffer is cheap: chunks are shared until one side writes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    store: ChunkStore<Upc>,
}

impl Buffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Default::default()
    }

    /// Gets the raw packed value of a cell.
    #[inline]
    pub fn get_cell(&self, coord: CellCoord) -> Upc {
        self.store.get(coord)
    }

    /// Sets the raw packed value of a cell, returning the previous value.
    ///
    /// No placement bookkeeping is performed: the caller is responsible
    /// for keeping links reciprocal.
    #[inline]
    pub fn set_cell(&mut self, coord: CellCoord, cell: Upc) -> Upc {
        self.store.set(coord, cell)
    }

    /// Gets the decoded contents of a cell.
    #[inline]
    pub fn cell(&self, coord: CellCoord) -> NormalizedCell {
        self.store.get(coord).normalize()
    }

    /// Encodes and stores a cell without placement bookkeeping.
    #[inline]
    pub(crate) fn put(&mut self, coord: CellCoord, cell: NormalizedCell) {
        self.store.set(coord, cell.denormalize());
    }

    /// The number of non-empty cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.store.cell_count()
    }

    /// The number of allocated chunks.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.store.chunk_count()
    }

    /// Returns `true` if every cell is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Removes every cell.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// The underlying chunk store.
    #[inline]
    pub fn store(&self) -> &ChunkStore<Upc> {
        &self.store
    }

    /// Iterates over the non-empty cells in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Upc)> + '_ {
        self.store.iter()
    }

    /// The non-empty cells, sorted by `(x, y)`.
    pub fn sorted_cells(&self) -> Vec<(CellCoord, Upc)> {
        let mut cells: Vec<_> = self.iter().collect();
        cells.sort_unstable_by_key(|(coord, _)| *coord);
        cells
    }

    /// The smallest rectangle containing every non-empty cell.
    pub fn bounds(&self) -> Option<Rect> {
        let mut cells = self.iter().map(|(coord, _)| coord);
        let first = cells.next()?;
        let (ll, ur) = cells.fold((first, first), |(ll, ur), c| {
            (
                CellCoord::new(ll.x.min(c.x), ll.y.min(c.y)),
                CellCoord::new(ur.x.max(c.x), ur.y.max(c.y)),
            )
        });
        Some(Rect::new(ll, ur))
    }

    /// Re-encodes every cell in canonical form.
    ///
    /// Invalid bit patterns become empty cells. Returns the number of cells
    /// that changed.
    pub fn fix_all_cells(&mut self) -> usize {
        let fixes: Vec<_> = self
            .iter()
            .filter_map(|(coord, cell)| {
                let canonical = cell.canonicalize();
                (canonical != cell).then_some((coord, canonical))
            })
            .collect();
        for &(coord, cell) in fixes.iter() {
            tracing::trace!(%coord, "canonicalized cell");
            self.store.set(coord, cell);
        }
        fixes.len()
    }

    /// Returns `true` if the cell hosting `atom` has that part.
    pub fn has_atom(&self, atom: Atom) -> bool {
        atom.part.exists_in(&self.cell(atom.coord))
    }

    /// The atoms hosted by a cell.
    pub fn atoms_at(&self, coord: CellCoord) -> Vec<Atom> {
        CellPart::present_in(&self.cell(coord))
            .map(|part| Atom::new(coord, part))
            .collect()
    }
}

impl FromIterator<(CellCoord, Upc)> for Buffer {
    /// Collects raw cells into a buffer; later entries overwrite earlier ones.
    fn from_iter<I: IntoIterator<Item = (CellCoord, Upc)>>(iter: I) -> Self {
        let mut buffer = Buffer::new();
        for (coord, cell) in iter {
            buffer.set_cell(coord, cell);
        }
        buffer
    }
}
