//! An unbounded grid of packed layout cells.
//!
//! A [`Buffer`] stores [`Upc`](upc::Upc) cells in copy-on-write chunks
//! and provides the drawing, clearing, linking and region operations of a
//! layout editor. Every editing operation keeps placement links
//! reciprocal: if a cell links toward a neighbor, the neighbor links back.
//!
//! ```
//! use cellbuf::Buffer;
//! use geometry::prelude::*;
//!
//! let mut buffer = Buffer::new();
//! buffer.draw_metal(CellCoord::new(0, 0), CellCoord::new(3, 0), false);
//! assert_eq!(buffer.cell_count(), 4);
//! assert!(buffer.metal_linked(CellCoord::new(1, 0), Side::Right));
//!
//! let snapshot = buffer.clone();
//! buffer.clear_cell_metal(CellCoord::new(2, 0));
//! assert!(!buffer.cell(CellCoord::new(1, 0)).metal.links(Side::Right));
//! assert_eq!(snapshot.cell_count(), 4);
//! ```
#![warn(missing_docs)]

pub mod atom;
pub mod buffer;
mod edit;
pub mod legacy;
mod links;
pub mod mask;
pub mod path;
mod region;
pub mod serialize;
pub mod store;
pub mod validation;

pub use atom::{Atom, CellPart};
pub use buffer::Buffer;
pub use legacy::{import_legacy_json, LegacyImportError};
pub use mask::{Mask, MaskError};
pub use path::manhattan_path;
pub use serialize::DecodeError;
pub use store::{ChunkStore, CHUNK_SIZE};
pub use validation::{Cause, IssueSet, Severity, ValidatorIssue};

/// A rectangular selection of cells, both corners inclusive.
pub type Selection = geometry::rect::Rect;

#[cfg(test)]
mod tests;
