//! Sparse chunked storage with copy-on-write sharing.
//!
//! The grid is tiled into square chunks of [`CHUNK_SIZE`] cells. Only chunks
//! holding at least one non-default value are stored, and each stored chunk
//! sits behind an [`Arc`]. Cloning a [`ChunkStore`] clones the index of
//! chunk pointers; a chunk's payload is copied only when a shared chunk is
//! written.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use geometry::prelude::*;

/// The edge length of a chunk, in cells.
pub const CHUNK_SIZE: i32 = 32;

const CHUNK_CELLS: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// A square tile of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<T> {
    cells: [T; CHUNK_CELLS],
    occupied: u16,
}

impl<T: Copy + Default + Eq> Chunk<T> {
    fn new() -> Self {
        Self {
            cells: [T::default(); CHUNK_CELLS],
            occupied: 0,
        }
    }

    #[inline]
    fn index((x, y): (u32, u32)) -> usize {
        (y * CHUNK_SIZE as u32 + x) as usize
    }

    /// Stores `value`, returning the value it replaced.
    fn replace(&mut self, index: usize, value: T) -> T {
        let old = std::mem::replace(&mut self.cells[index], value);
        let default = T::default();
        if old == default && value != default {
            self.occupied += 1;
        } else if old != default && value == default {
            self.occupied -= 1;
        }
        old
    }

    /// The number of non-default cells.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.occupied as usize
    }

    /// Iterates over the non-default cells with their offsets from the chunk origin.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (CellCoord, T)> + '_ {
        let default = T::default();
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, value)| **value != default)
            .map(|(i, value)| {
                let offset = CellCoord::new(i as i32 % CHUNK_SIZE, i as i32 / CHUNK_SIZE);
                (offset, *value)
            })
    }
}

/// A sparse map from cell coordinates to values of type `T`.
///
/// Cells that were never written, or were written with `T::default()`,
/// read back as `T::default()` and cost no memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkStore<T> {
    chunks: HashMap<ChunkCoord, Arc<Chunk<T>>>,
}

impl<T> Default for ChunkStore<T> {
    fn default() -> Self {
        Self {
            chunks: HashMap::new(),
        }
    }
}

impl<T: Copy + Default + Eq> ChunkStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Default::default()
    }

    /// Gets the value of a cell.
    #[inline]
    pub fn get(&self, coord: CellCoord) -> T {
        let (chunk, local) = coord.chunked(CHUNK_SIZE);
        self.chunks
            .get(&chunk)
            .map(|c| c.cells[Chunk::<T>::index(local)])
            .unwrap_or_default()
    }

    /// Sets the value of a cell, returning the previous value.
    ///
    /// Writing a non-default value allocates the owning chunk if needed.
    /// A chunk that becomes entirely default is dropped.
    pub fn set(&mut self, coord: CellCoord, value: T) -> T {
        let (chunk, local) = coord.chunked(CHUNK_SIZE);
        let index = Chunk::<T>::index(local);
        match self.chunks.entry(chunk) {
            Entry::Occupied(mut entry) => {
                if entry.get().cells[index] == value {
                    return value;
                }
                let chunk = Arc::make_mut(entry.get_mut());
                let old = chunk.replace(index, value);
                if chunk.occupied == 0 {
                    entry.remove();
                }
                old
            }
            Entry::Vacant(entry) => {
                if value != T::default() {
                    let mut chunk = Chunk::new();
                    chunk.replace(index, value);
                    entry.insert(Arc::new(chunk));
                }
                T::default()
            }
        }
    }

    /// The number of non-default cells.
    pub fn cell_count(&self) -> usize {
        self.chunks.values().map(|c| c.occupied()).sum()
    }

    /// The number of allocated chunks.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` if no cell holds a non-default value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Removes every cell.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Gets the chunk at the given chunk coordinate, if allocated.
    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk<T>> {
        self.chunks.get(&coord).map(|c| c.as_ref())
    }

    /// Iterates over the allocated chunks in arbitrary order.
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk<T>)> {
        self.chunks.iter().map(|(coord, c)| (*coord, c.as_ref()))
    }

    /// Iterates over every non-default cell in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, T)> + '_ {
        self.chunks.iter().flat_map(|(coord, chunk)| {
            let origin = coord.origin(CHUNK_SIZE);
            chunk
                .occupied_cells()
                .map(move |(offset, value)| (origin + offset, value))
        })
    }

    /// Returns `true` if both stores point at the same allocation for the given chunk.
    pub fn shares_chunk(&self, other: &ChunkStore<T>, coord: ChunkCoord) -> bool {
        match (self.chunks.get(&coord), other.chunks.get(&coord)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
