//! Atoms: the independently connectable nodes of a cell.

use std::fmt::Display;

use geometry::prelude::*;
use serde::{Deserialize, Serialize};
use upc::{NormalizedCell, Silicon};

/// A part of a cell that can carry its own signal.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum CellPart {
    /// The metal layer.
    Metal,
    /// The silicon layer. For a MOSFET, this is the gate.
    Si,
    /// The up (vertical channel) or left (horizontal channel) EC terminal of a MOSFET.
    EcUpLeft,
    /// The down (vertical channel) or right (horizontal channel) EC terminal of a MOSFET.
    EcDownRight,
}

/// A cell part at a particular coordinate.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Atom {
    /// The cell hosting the atom.
    pub coord: CellCoord,
    /// Which part of the cell.
    pub part: CellPart,
}

impl CellPart {
    /// Every cell part.
    pub const ALL: [CellPart; 4] = [
        CellPart::Metal,
        CellPart::Si,
        CellPart::EcUpLeft,
        CellPart::EcDownRight,
    ];

    /// A distinct bit for this part, for packing part sets into a byte.
    #[inline]
    pub const fn bit(&self) -> u8 {
        match *self {
            Self::Metal => 1,
            Self::Si => 2,
            Self::EcUpLeft => 4,
            Self::EcDownRight => 8,
        }
    }

    /// The EC terminal facing `side`.
    #[inline]
    pub const fn ec_facing(side: Side) -> Self {
        if side.is_up_left() {
            Self::EcUpLeft
        } else {
            Self::EcDownRight
        }
    }

    /// Returns `true` if a cell with the given contents hosts this part.
    pub fn exists_in(&self, cell: &NormalizedCell) -> bool {
        match *self {
            Self::Metal => cell.metal.is_present(),
            Self::Si => cell.si.is_present(),
            Self::EcUpLeft | Self::EcDownRight => cell.si.is_mosfet(),
        }
    }

    /// The parts hosted by a cell with the given contents.
    pub fn present_in(cell: &NormalizedCell) -> impl Iterator<Item = CellPart> + '_ {
        Self::ALL.into_iter().filter(move |part| part.exists_in(cell))
    }

    /// The silicon-layer part of `si` that a link arriving through `side` lands on.
    ///
    /// An NP region receives every link on its single node. A MOSFET routes
    /// links on its gate axis to the gate and links on its EC axis to the
    /// terminal facing that side.
    pub fn si_part_at(si: &Silicon, side: Side) -> Option<CellPart> {
        match *si {
            Silicon::None => None,
            Silicon::NP { .. } => Some(Self::Si),
            Silicon::Mosfet { .. } => {
                if Some(side.dir()) == si.ec_dir() {
                    Some(Self::ec_facing(side))
                } else {
                    Some(Self::Si)
                }
            }
        }
    }
}

impl Atom {
    /// Creates a new atom.
    #[inline]
    pub const fn new(coord: CellCoord, part: CellPart) -> Self {
        Self { coord, part }
    }

    /// The metal atom of a cell.
    #[inline]
    pub const fn metal(coord: CellCoord) -> Self {
        Self::new(coord, CellPart::Metal)
    }

    /// The silicon atom of a cell.
    #[inline]
    pub const fn si(coord: CellCoord) -> Self {
        Self::new(coord, CellPart::Si)
    }
}

impl Display for CellPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Metal => write!(f, "metal"),
            Self::Si => write!(f, "si"),
            Self::EcUpLeft => write!(f, "ec-up-left"),
            Self::EcDownRight => write!(f, "ec-down-right"),
        }
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.coord, self.part)
    }
}
