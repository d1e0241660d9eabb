//! Flood-fill over the atom adjacency graph.

use std::collections::{HashSet, VecDeque};

use cellbuf::{Atom, Buffer, CellPart};
use geometry::prelude::*;
use upc::{NormalizedCell, Silicon};

/// The silicon-layer sides through which `part` of `cell` conducts.
fn si_sides(cell: &NormalizedCell, part: CellPart) -> Vec<Side> {
    match (part, cell.si) {
        (CellPart::Si, Silicon::NP { .. }) => Side::ALL.to_vec(),
        (CellPart::Si, si @ Silicon::Mosfet { .. }) => match si.ec_dir() {
            Some(ec_dir) => (!ec_dir).sides().to_vec(),
            None => Vec::new(),
        },
        (CellPart::EcUpLeft, si @ Silicon::Mosfet { .. }) => {
            si.ec_dir().map(|d| vec![d.sides()[0]]).unwrap_or_default()
        }
        (CellPart::EcDownRight, si @ Silicon::Mosfet { .. }) => {
            si.ec_dir().map(|d| vec![d.sides()[1]]).unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// The atoms directly connected to `atom`.
///
/// Links count only when both cells link toward each other, and silicon
/// links only when their polarities agree. A MOSFET's gate and its two EC
/// terminals are three separate nodes.
pub fn atom_neighbors(buffer: &Buffer, atom: Atom) -> Vec<Atom> {
    let coord = atom.coord;
    let cell = buffer.cell(coord);
    let mut out = Vec::new();
    if !atom.part.exists_in(&cell) {
        return out;
    }

    if atom.part == CellPart::Metal {
        for (side, neighbor) in coord.neighbors() {
            if buffer.metal_linked(coord, side) {
                out.push(Atom::metal(neighbor));
            }
        }
        if cell.metal.has_via() && matches!(cell.si, Silicon::NP { .. }) {
            out.push(Atom::si(coord));
        }
        return out;
    }

    for side in si_sides(&cell, atom.part) {
        let Some(neighbor) = coord.checked_neighbor(side) else {
            continue;
        };
        if !buffer.si_linked(coord, side) {
            continue;
        }
        if let Some(part) = CellPart::si_part_at(&buffer.cell(neighbor).si, side.opposite()) {
            out.push(Atom::new(neighbor, part));
        }
    }
    if atom.part == CellPart::Si && cell.metal.has_via() && !cell.si.is_mosfet() {
        out.push(Atom::metal(coord));
    }
    out
}

/// Returns every atom electrically connected to `seed`, in breadth-first
/// order starting with `seed` itself.
///
/// A seed naming a part that its cell does not have yields an empty trace.
pub fn get_trace_atoms(buffer: &Buffer, seed: Atom) -> Vec<Atom> {
    if !buffer.has_atom(seed) {
        tracing::debug!(%seed, "seed atom does not exist");
        return Vec::new();
    }

    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();
    let mut trace = Vec::new();
    queue.push_back(seed);
    visited.insert(seed);

    while let Some(atom) = queue.pop_front() {
        trace.push(atom);
        for next in atom_neighbors(buffer, atom) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    trace
}
