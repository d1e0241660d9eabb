//! The packed 4-byte encoding.

use geometry::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cell::{Metal, NormalizedCell, Silicon};
use crate::placement::Placement;

const METAL_PLACEMENT_SHIFT: u32 = 0;
const METAL: u32 = 1 << 4;
const VIA: u32 = 1 << 5;
const SI_PLACEMENT_SHIFT: u32 = 8;
const SI: u32 = 1 << 12;
const SI_N: u32 = 1 << 13;
const MOSFET: u32 = 1 << 14;
const MOSFET_HORIZ: u32 = 1 << 15;
const GATE_SHIFT: u32 = 16;

const NIBBLE: u32 = 0xF;
const METAL_BITS: u32 = NIBBLE << METAL_PLACEMENT_SHIFT | METAL | VIA;
const SI_BITS: u32 = NIBBLE << SI_PLACEMENT_SHIFT | SI | SI_N | MOSFET | MOSFET_HORIZ;
const GATE_BITS: u32 = NIBBLE << GATE_SHIFT;
const DEFINED_BITS: u32 = METAL_BITS | SI_BITS | GATE_BITS;

/// A universal packed cell.
///
/// Bit `n` of the cell is bit `n % 8` of byte `n / 8`, so the bytes can be
/// uploaded as a texel regardless of host endianness.
///
/// | bits | field |
/// |---|---|
/// | 0..3 | metal placement |
/// | 4 | metal present |
/// | 5 | via |
/// | 8..11 | silicon placement, or EC placement of a MOSFET |
/// | 12 | silicon present |
/// | 13 | N polarity, or NPN for a MOSFET |
/// | 14 | MOSFET |
/// | 15 | MOSFET EC channel is horizontal |
/// | 16..19 | gate placement |
///
/// All other bits are reserved and must be zero.
#[derive(
    Debug, Copy, Clone, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct Upc(pub [u8; 4]);

/// A packed cell whose bits fall outside the defined variant space.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[error("invalid packed cell {0:#010x}")]
pub struct InvalidUpc(pub u32);

impl Upc {
    /// The empty cell.
    pub const EMPTY: Self = Self([0; 4]);

    /// Creates a packed cell from its 32 raw bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits.to_le_bytes())
    }

    /// The 32 raw bits of this cell.
    #[inline]
    pub const fn bits(&self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    /// Returns `true` if every bit is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bits() == 0
    }

    /// Returns `true` if the bits decode to a cell.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.try_normalize().is_ok()
    }

    /// Decodes the cell, rejecting reserved or inconsistent bit patterns.
    pub fn try_normalize(&self) -> Result<NormalizedCell, InvalidUpc> {
        let bits = self.bits();
        let invalid = InvalidUpc(bits);
        if bits & !DEFINED_BITS != 0 {
            return Err(invalid);
        }

        let nibble = |shift: u32| Placement::from_bits(((bits >> shift) & NIBBLE) as u8);

        let metal = if bits & METAL != 0 {
            Metal::Trace {
                has_via: bits & VIA != 0,
                placement: nibble(METAL_PLACEMENT_SHIFT),
            }
        } else if bits & METAL_BITS != 0 {
            return Err(invalid);
        } else {
            Metal::None
        };

        let si = if bits & SI == 0 {
            if bits & (SI_BITS | GATE_BITS) != 0 {
                return Err(invalid);
            }
            Silicon::None
        } else if bits & MOSFET == 0 {
            if bits & (MOSFET_HORIZ | GATE_BITS) != 0 {
                return Err(invalid);
            }
            Silicon::NP {
                is_n: bits & SI_N != 0,
                placement: nibble(SI_PLACEMENT_SHIFT),
            }
        } else {
            let is_horizontal = bits & MOSFET_HORIZ != 0;
            let ec_dir = if is_horizontal { Dir::Horiz } else { Dir::Vert };
            let ec_placement = nibble(SI_PLACEMENT_SHIFT);
            let gate_placement = nibble(GATE_SHIFT);
            if !ec_placement.only_along(ec_dir)
                || !gate_placement.only_along(!ec_dir)
                || metal.has_via()
            {
                return Err(invalid);
            }
            Silicon::Mosfet {
                is_npn: bits & SI_N != 0,
                is_horizontal,
                gate_placement,
                ec_placement,
            }
        };

        Ok(NormalizedCell { metal, si })
    }

    /// Decodes the cell, treating invalid bit patterns as the empty cell.
    #[inline]
    pub fn normalize(&self) -> NormalizedCell {
        match self.try_normalize() {
            Ok(cell) => cell,
            Err(err) => {
                tracing::trace!("{err}; treating as empty");
                NormalizedCell::EMPTY
            }
        }
    }

    /// Re-encodes the cell in its canonical form.
    ///
    /// Valid cells are returned unchanged; invalid ones become [`Upc::EMPTY`].
    #[inline]
    pub fn canonicalize(&self) -> Upc {
        self.normalize().denormalize()
    }
}

impl NormalizedCell {
    /// Encodes the cell.
    ///
    /// Structured values that have no valid encoding are canonicalized:
    /// MOSFET placements are restricted to their axes and a via sharing a
    /// cell with a MOSFET is dropped.
    pub fn denormalize(&self) -> Upc {
        let mut bits = 0u32;
        let mosfet = self.si.is_mosfet();

        if let Metal::Trace { has_via, placement } = self.metal {
            bits |= METAL | (placement.bits() as u32) << METAL_PLACEMENT_SHIFT;
            if has_via && !mosfet {
                bits |= VIA;
            }
        }

        match self.si {
            Silicon::None => {}
            Silicon::NP { is_n, placement } => {
                bits |= SI | (placement.bits() as u32) << SI_PLACEMENT_SHIFT;
                if is_n {
                    bits |= SI_N;
                }
            }
            Silicon::Mosfet {
                is_npn,
                is_horizontal,
                gate_placement,
                ec_placement,
            } => {
                let ec_dir = if is_horizontal { Dir::Horiz } else { Dir::Vert };
                let ec = ec_placement.restricted_to(ec_dir);
                let gate = gate_placement.restricted_to(!ec_dir);
                bits |= SI | MOSFET;
                bits |= (ec.bits() as u32) << SI_PLACEMENT_SHIFT;
                bits |= (gate.bits() as u32) << GATE_SHIFT;
                if is_npn {
                    bits |= SI_N;
                }
                if is_horizontal {
                    bits |= MOSFET_HORIZ;
                }
            }
        }

        Upc::from_bits(bits)
    }
}

impl From<NormalizedCell> for Upc {
    #[inline]
    fn from(value: NormalizedCell) -> Self {
        value.denormalize()
    }
}

impl From<Upc> for NormalizedCell {
    #[inline]
    fn from(value: Upc) -> Self {
        value.normalize()
    }
}

impl From<[u8; 4]> for Upc {
    #[inline]
    fn from(value: [u8; 4]) -> Self {
        Self(value)
    }
}
