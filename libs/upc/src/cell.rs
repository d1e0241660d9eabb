//! The structured, normalized view of a cell.

use geometry::prelude::*;
use serde::{Deserialize, Serialize};

use crate::placement::Placement;

/// The metal layer of a cell.
#[derive(Debug, Copy, Clone, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Metal {
    /// No metal.
    #[default]
    None,
    /// A metal trace.
    Trace {
        /// Whether a via bridges this metal to the silicon of the same cell.
        has_via: bool,
        /// The sides the trace extends into.
        placement: Placement,
    },
}

/// The silicon layer of a cell.
#[derive(Debug, Copy, Clone, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Silicon {
    /// No silicon.
    #[default]
    None,
    /// A doped region.
    NP {
        /// `true` for N-type, `false` for P-type.
        is_n: bool,
        /// The sides the region extends into.
        placement: Placement,
    },
    /// A transistor junction.
    ///
    /// The emitter/collector (EC) channel runs along one axis and the
    /// gate along the other. The gate never conducts into the channel.
    Mosfet {
        /// `true` for an NPN junction: an N-type channel gated by P-type silicon.
        is_npn: bool,
        /// `true` if the EC channel runs left-right.
        is_horizontal: bool,
        /// The gate sides that are linked.
        gate_placement: Placement,
        /// The EC sides that are linked.
        ec_placement: Placement,
    },
}

/// A decoded cell: its metal and silicon layers.
#[derive(Debug, Copy, Clone, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCell {
    /// The metal layer.
    pub metal: Metal,
    /// The silicon layer.
    pub si: Silicon,
}

impl Metal {
    /// A metal trace without a via.
    #[inline]
    pub const fn trace(placement: Placement) -> Self {
        Self::Trace {
            has_via: false,
            placement,
        }
    }

    /// Returns `true` if the cell has metal.
    #[inline]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Trace { .. })
    }

    /// Returns `true` if the cell has a via.
    #[inline]
    pub const fn has_via(&self) -> bool {
        matches!(self, Self::Trace { has_via: true, .. })
    }

    /// The linked sides, or `None` without metal.
    #[inline]
    pub const fn placement(&self) -> Option<Placement> {
        match *self {
            Self::Trace { placement, .. } => Some(placement),
            Self::None => None,
        }
    }

    /// Returns `true` if the metal links toward `side`.
    #[inline]
    pub fn links(&self, side: Side) -> bool {
        self.placement().is_some_and(|p| p.has(side))
    }
}

impl Silicon {
    /// An NP region.
    #[inline]
    pub const fn np(is_n: bool, placement: Placement) -> Self {
        Self::NP { is_n, placement }
    }

    /// Returns `true` if the cell has silicon.
    #[inline]
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns `true` if the cell is a transistor junction.
    #[inline]
    pub const fn is_mosfet(&self) -> bool {
        matches!(self, Self::Mosfet { .. })
    }

    /// The axis of a MOSFET's EC channel.
    #[inline]
    pub const fn ec_dir(&self) -> Option<Dir> {
        match *self {
            Self::Mosfet {
                is_horizontal: true,
                ..
            } => Some(Dir::Horiz),
            Self::Mosfet {
                is_horizontal: false,
                ..
            } => Some(Dir::Vert),
            _ => None,
        }
    }

    /// Returns `true` if the silicon links toward `side`, through any of its placements.
    pub fn links(&self, side: Side) -> bool {
        match *self {
            Self::None => false,
            Self::NP { placement, .. } => placement.has(side),
            Self::Mosfet {
                gate_placement,
                ec_placement,
                ..
            } => gate_placement.has(side) || ec_placement.has(side),
        }
    }

    /// The union of every linked side.
    pub fn all_links(&self) -> Placement {
        match *self {
            Self::None => Placement::CENTER,
            Self::NP { placement, .. } => placement,
            Self::Mosfet {
                gate_placement,
                ec_placement,
                ..
            } => gate_placement.union(ec_placement),
        }
    }

    /// The polarity of silicon reaching this cell through `side`.
    ///
    /// For a MOSFET this is the channel polarity on its EC axis and the
    /// opposite polarity on its gate axis. Returns `None` without silicon.
    pub fn polarity_at(&self, side: Side) -> Option<bool> {
        match *self {
            Self::None => None,
            Self::NP { is_n, .. } => Some(is_n),
            Self::Mosfet {
                is_npn,
                is_horizontal,
                ..
            } => {
                let on_ec = (side.dir() == Dir::Horiz) == is_horizontal;
                Some(if on_ec { is_npn } else { !is_npn })
            }
        }
    }

    /// Sets or clears the link toward `side` in whichever placement owns that side.
    pub fn set_link(&mut self, side: Side, value: bool) {
        match self {
            Self::None => {}
            Self::NP { placement, .. } => placement.set(side, value),
            Self::Mosfet {
                is_horizontal,
                gate_placement,
                ec_placement,
                ..
            } => {
                if (side.dir() == Dir::Horiz) == *is_horizontal {
                    ec_placement.set(side, value);
                } else {
                    gate_placement.set(side, value);
                }
            }
        }
    }
}

impl NormalizedCell {
    /// The empty cell.
    pub const EMPTY: Self = Self {
        metal: Metal::None,
        si: Silicon::None,
    };

    /// Creates a cell from its two layers.
    #[inline]
    pub const fn new(metal: Metal, si: Silicon) -> Self {
        Self { metal, si }
    }

    /// Returns `true` if neither layer is present.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        !self.metal.is_present() && !self.si.is_present()
    }
}

impl Transform for Metal {
    fn rotate_cw(&self) -> Self {
        match *self {
            Self::None => Self::None,
            Self::Trace { has_via, placement } => Self::Trace {
                has_via,
                placement: placement.rotate_cw(),
            },
        }
    }

    fn mirror_horiz(&self) -> Self {
        match *self {
            Self::None => Self::None,
            Self::Trace { has_via, placement } => Self::Trace {
                has_via,
                placement: placement.mirror_horiz(),
            },
        }
    }
}

impl Transform for Silicon {
    fn rotate_cw(&self) -> Self {
        match *self {
            Self::None => Self::None,
            Self::NP { is_n, placement } => Self::NP {
                is_n,
                placement: placement.rotate_cw(),
            },
            Self::Mosfet {
                is_npn,
                is_horizontal,
                gate_placement,
                ec_placement,
            } => Self::Mosfet {
                is_npn,
                is_horizontal: !is_horizontal,
                gate_placement: gate_placement.rotate_cw(),
                ec_placement: ec_placement.rotate_cw(),
            },
        }
    }

    fn mirror_horiz(&self) -> Self {
        match *self {
            Self::None => Self::None,
            Self::NP { is_n, placement } => Self::NP {
                is_n,
                placement: placement.mirror_horiz(),
            },
            Self::Mosfet {
                is_npn,
                is_horizontal,
                gate_placement,
                ec_placement,
            } => Self::Mosfet {
                is_npn,
                is_horizontal,
                gate_placement: gate_placement.mirror_horiz(),
                ec_placement: ec_placement.mirror_horiz(),
            },
        }
    }
}

impl Transform for NormalizedCell {
    fn rotate_cw(&self) -> Self {
        Self::new(self.metal.rotate_cw(), self.si.rotate_cw())
    }

    fn mirror_horiz(&self) -> Self {
        Self::new(self.metal.mirror_horiz(), self.si.mirror_horiz())
    }
}
