//! Whole-buffer net extraction.

use cellbuf::{Atom, Buffer};
use indexmap::IndexMap;
use tracing::Level;

use crate::compile::get_trace_atoms;

/// Identifies a net within a [`TraceSet`].
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct NetId(usize);

/// Every net of a buffer.
///
/// Nets are numbered in the order of their first atom, scanning cells
/// by `(x, y)`.
#[derive(Debug, Clone, Default)]
pub struct TraceSet {
    nets: Vec<Vec<Atom>>,
    index: IndexMap<Atom, NetId>,
}

impl NetId {
    /// The position of this net in its [`TraceSet`].
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl TraceSet {
    /// The number of nets.
    #[inline]
    pub fn len(&self) -> usize {
        self.nets.len()
    }

    /// Returns `true` if the buffer had no atoms.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    /// The net containing `atom`.
    #[inline]
    pub fn net_of(&self, atom: Atom) -> Option<NetId> {
        self.index.get(&atom).copied()
    }

    /// The atoms of the net containing `atom`.
    pub fn trace_of(&self, atom: Atom) -> Option<&[Atom]> {
        self.net_of(atom).map(|id| self.net(id))
    }

    /// The atoms of a net.
    #[inline]
    pub fn net(&self, id: NetId) -> &[Atom] {
        &self.nets[id.0]
    }

    /// Returns `true` if both atoms exist and lie on the same net.
    pub fn connected(&self, a: Atom, b: Atom) -> bool {
        match (self.net_of(a), self.net_of(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Iterates over the nets in order.
    pub fn iter(&self) -> impl Iterator<Item = (NetId, &[Atom])> {
        self.nets
            .iter()
            .enumerate()
            .map(|(i, atoms)| (NetId(i), atoms.as_slice()))
    }
}

/// Partitions every atom of `buffer` into nets.
pub fn extract_all_traces(buffer: &Buffer) -> TraceSet {
    let _guard = tracing::span!(Level::DEBUG, "extracting traces").entered();
    let mut set = TraceSet::default();
    for (coord, _) in buffer.sorted_cells() {
        for atom in buffer.atoms_at(coord) {
            if set.index.contains_key(&atom) {
                continue;
            }
            let id = NetId(set.nets.len());
            let atoms = get_trace_atoms(buffer, atom);
            for &member in atoms.iter() {
                set.index.insert(member, id);
            }
            set.nets.push(atoms);
        }
    }
    tracing::info!(nets = set.len(), atoms = set.index.len(), "extracted traces");
    set
}
