//! A per-atom highlight overlay.

use geometry::prelude::*;

use crate::atom::{Atom, CellPart};
use crate::buffer::Buffer;
use crate::store::ChunkStore;

/// An error activating an atom in a [`Mask`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum MaskError {
    /// The cell does not host the requested part.
    #[error("no {} atom at {}", .0.part, .0.coord)]
    MissingAtom(Atom),
}

/// A set of highlighted atoms, stored sparsely like a [`Buffer`].
///
/// Each cell holds one bit per [`CellPart`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mask {
    store: ChunkStore<u8>,
}

impl Mask {
    /// Creates an empty mask.
    pub fn new() -> Self {
        Default::default()
    }

    /// Highlights `atom`, which must exist in `buffer`.
    pub fn activate(&mut self, buffer: &Buffer, atom: Atom) -> Result<(), MaskError> {
        if !buffer.has_atom(atom) {
            return Err(MaskError::MissingAtom(atom));
        }
        let bits = self.store.get(atom.coord);
        self.store.set(atom.coord, bits | atom.part.bit());
        Ok(())
    }

    /// Highlights every atom in `atoms`, stopping at the first that does not exist.
    pub fn activate_all(
        &mut self,
        buffer: &Buffer,
        atoms: impl IntoIterator<Item = Atom>,
    ) -> Result<(), MaskError> {
        for atom in atoms {
            self.activate(buffer, atom)?;
        }
        Ok(())
    }

    /// Removes the highlight from `atom`.
    pub fn deactivate(&mut self, atom: Atom) {
        let bits = self.store.get(atom.coord);
        self.store.set(atom.coord, bits & !atom.part.bit());
    }

    /// Returns `true` if `atom` is highlighted.
    #[inline]
    pub fn is_active(&self, atom: Atom) -> bool {
        self.store.get(atom.coord) & atom.part.bit() != 0
    }

    /// The highlighted atoms, sorted.
    pub fn active_atoms(&self) -> Vec<Atom> {
        let mut atoms: Vec<_> = self
            .store
            .iter()
            .flat_map(|(coord, bits)| {
                CellPart::ALL
                    .into_iter()
                    .filter(move |part| bits & part.bit() != 0)
                    .map(move |part| Atom::new(coord, part))
            })
            .collect();
        atoms.sort_unstable();
        atoms
    }

    /// The number of highlighted atoms.
    pub fn active_count(&self) -> usize {
        self.store
            .iter()
            .map(|(_, bits)| bits.count_ones() as usize)
            .sum()
    }

    /// Returns `true` if nothing is highlighted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Removes every highlight.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Drops highlights on atoms that no longer exist in `buffer`.
    pub fn retain_valid(&mut self, buffer: &Buffer) {
        let stale: Vec<_> = self
            .active_atoms()
            .into_iter()
            .filter(|atom| !buffer.has_atom(*atom))
            .collect();
        for atom in stale {
            self.deactivate(atom);
        }
    }

    /// Whether `coord` has any highlighted part.
    #[inline]
    pub fn touches(&self, coord: CellCoord) -> bool {
        self.store.get(coord) != 0
    }
}
