//! Connectivity extraction.
//!
//! A trace (or net) is the set of [atoms](cellbuf::Atom) mutually reachable
//! through reciprocal links, vias and MOSFET terminals. The gate of a
//! MOSFET never conducts into its EC channel, and its two EC terminals
//! never conduct into each other.
//!
//! ```
//! use cellbuf::{Atom, Buffer};
//! use geometry::prelude::*;
//!
//! let mut buffer = Buffer::new();
//! buffer.draw_metal(CellCoord::new(0, 0), CellCoord::new(4, 0), false);
//! let atoms = trace::get_trace_atoms(&buffer, Atom::metal(CellCoord::new(2, 0)));
//! assert_eq!(atoms.len(), 5);
//! ```
#![warn(missing_docs)]

pub mod compile;
pub mod net;
pub mod socket;

pub use compile::{atom_neighbors, get_trace_atoms};
pub use net::{extract_all_traces, NetId, TraceSet};
pub use socket::{Pin, Socket};

#[cfg(test)]
mod tests;
