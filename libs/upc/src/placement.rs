//! Four-way placements.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use geometry::prelude::*;
use serde::{Deserialize, Serialize};

/// Which neighbors a trace extends into from the center of its cell.
///
/// The center itself is implied by the layer being present, so an
/// all-`false` placement is a lone dot.
#[derive(Debug, Copy, Clone, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Extends toward `+y`.
    pub up: bool,
    /// Extends toward `+x`.
    pub right: bool,
    /// Extends toward `-y`.
    pub down: bool,
    /// Extends toward `-x`.
    pub left: bool,
}

/// A placement string contained a character other than `U`, `R`, `D`, `L` or `C`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid placement character `{0}`")]
pub struct ParsePlacementError(pub char);

impl Placement {
    /// A lone center with no links.
    pub const CENTER: Self = Self {
        up: false,
        right: false,
        down: false,
        left: false,
    };

    /// Links on every side.
    pub const ALL: Self = Self {
        up: true,
        right: true,
        down: true,
        left: true,
    };

    /// Builds a placement from the low four bits of `bits`,
    /// in [`Side`] index order.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            up: bits & 1 != 0,
            right: bits & 2 != 0,
            down: bits & 4 != 0,
            left: bits & 8 != 0,
        }
    }

    /// The placement packed into the low four bits of a byte.
    #[inline]
    pub const fn bits(&self) -> u8 {
        (self.up as u8) | (self.right as u8) << 1 | (self.down as u8) << 2 | (self.left as u8) << 3
    }

    /// A placement linking exactly the given sides.
    pub fn from_sides(sides: impl IntoIterator<Item = Side>) -> Self {
        sides.into_iter().fold(Self::CENTER, |p, side| p.with(side))
    }

    /// A placement linking both sides of the given axis.
    pub fn along(dir: Dir) -> Self {
        Self::from_sides(dir.sides())
    }

    /// Returns `true` if the placement links toward `side`.
    #[inline]
    pub const fn has(&self, side: Side) -> bool {
        match side {
            Side::Up => self.up,
            Side::Right => self.right,
            Side::Down => self.down,
            Side::Left => self.left,
        }
    }

    /// Sets or clears the link toward `side`.
    #[inline]
    pub fn set(&mut self, side: Side, value: bool) {
        match side {
            Side::Up => self.up = value,
            Side::Right => self.right = value,
            Side::Down => self.down = value,
            Side::Left => self.left = value,
        }
    }

    /// Returns a copy with the link toward `side` set.
    #[inline]
    pub fn with(mut self, side: Side) -> Self {
        self.set(side, true);
        self
    }

    /// Returns a copy with the link toward `side` cleared.
    #[inline]
    pub fn without(mut self, side: Side) -> Self {
        self.set(side, false);
        self
    }

    /// The union of two placements.
    #[inline]
    pub const fn union(&self, other: Placement) -> Self {
        Self::from_bits(self.bits() | other.bits())
    }

    /// Iterates over the linked sides in clockwise order from [`Side::Up`].
    pub fn sides(&self) -> impl Iterator<Item = Side> + '_ {
        Side::ALL.into_iter().filter(|side| self.has(*side))
    }

    /// Returns `true` if no side is linked.
    #[inline]
    pub const fn is_center(&self) -> bool {
        self.bits() == 0
    }

    /// Returns `true` if every linked side lies along `dir`.
    pub fn only_along(&self, dir: Dir) -> bool {
        self.sides().all(|side| side.dir() == dir)
    }

    /// The placement restricted to the sides lying along `dir`.
    pub fn restricted_to(&self, dir: Dir) -> Self {
        Self::from_sides(self.sides().filter(|side| side.dir() == dir))
    }
}

impl Transform for Placement {
    fn rotate_cw(&self) -> Self {
        Self::from_sides(self.sides().map(|side| side.rotate_cw()))
    }

    fn mirror_horiz(&self) -> Self {
        Self::from_sides(self.sides().map(|side| side.mirror_horiz()))
    }
}

impl Display for Placement {
    /// Writes the linked sides as a subset of `URDL`, or `C` for a lone center.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_center() {
            return write!(f, "C");
        }
        for side in self.sides() {
            let c = match side {
                Side::Up => 'U',
                Side::Right => 'R',
                Side::Down => 'D',
                Side::Left => 'L',
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    /// Parses any combination of `U`, `R`, `D`, `L` and `C` (case-insensitive).
    ///
    /// `C` and the empty string both denote a lone center.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut placement = Self::CENTER;
        for c in s.chars() {
            match c.to_ascii_uppercase() {
                'U' => placement.up = true,
                'R' => placement.right = true,
                'D' => placement.down = true,
                'L' => placement.left = true,
                'C' => {}
                _ => return Err(ParsePlacementError(c)),
            }
        }
        Ok(placement)
    }
}
