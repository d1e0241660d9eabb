//! The universal packed cell (UPC).
//!
//! A layout cell has two layers. The metal layer is either absent or a trace,
//! optionally with a via bridging it to the silicon below. The silicon layer is
//! absent, a doped N/P region, or a MOSFET junction. [`Upc`] packs both layers
//! into four bytes; [`NormalizedCell`] is the structured view used while editing.
//!
//! ```
//! use upc::{Metal, NormalizedCell, Placement, Silicon, Upc};
//!
//! let cell = NormalizedCell::new(
//!     Metal::trace("UD".parse().unwrap()),
//!     Silicon::np(true, Placement::CENTER),
//! );
//! let packed = cell.denormalize();
//! assert_eq!(packed.normalize(), cell);
//! assert_eq!(Upc::from_bits(0xFFFF_FFFF).normalize(), NormalizedCell::EMPTY);
//! ```
#![warn(missing_docs)]

pub mod cell;
pub mod packed;
pub mod placement;

pub use cell::{Metal, NormalizedCell, Silicon};
pub use packed::{InvalidUpc, Upc};
pub use placement::{ParsePlacementError, Placement};

/// The size of a packed cell in bytes.
pub const UPC_BYTES: usize = 4;

#[cfg(test)]
mod tests;
