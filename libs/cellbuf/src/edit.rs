//! Drawing and clearing operations that keep links reciprocal.

use geometry::prelude::*;
use tracing::debug;
use upc::{Metal, Placement, Silicon};

use crate::buffer::Buffer;
use crate::path::manhattan_path;

/// Returns `true` if `si` can take a link through `side` from silicon of polarity `is_n`.
fn si_accepts(si: &Silicon, side: Side, is_n: bool) -> bool {
    match *si {
        Silicon::None => true,
        _ => si.polarity_at(side) == Some(is_n),
    }
}

impl Buffer {
    /// Draws silicon of polarity `paint_n` along the Manhattan path from `a` to `b`.
    ///
    /// Empty cells on the path become NP regions. Existing silicon of the same
    /// polarity is extended. A path running straight across a lone strip of
    /// opposite-polarity silicon turns that cell into a MOSFET gated by the
    /// path. Links that the cells on either side cannot accept are skipped.
    pub fn draw_si(&mut self, a: CellCoord, b: CellCoord, vertical: bool, paint_n: bool) {
        let path = manhattan_path(a, b, vertical);
        for (i, &coord) in path.iter().enumerate() {
            if i > 0 && i + 1 < path.len() {
                let back = coord.side_toward(path[i - 1]);
                let ahead = coord.side_toward(path[i + 1]);
                if let (Some(back), Some(ahead)) = (back, ahead) {
                    if back.dir() == ahead.dir() {
                        self.try_place_mosfet(coord, back.dir(), paint_n);
                    }
                }
            }
            self.materialize_si(coord, paint_n);
            if i > 0 {
                self.link_si(path[i - 1], coord, paint_n);
            }
        }
    }

    /// Draws metal along the Manhattan path from `a` to `b`.
    pub fn draw_metal(&mut self, a: CellCoord, b: CellCoord, vertical: bool) {
        let path = manhattan_path(a, b, vertical);
        for (i, &coord) in path.iter().enumerate() {
            self.materialize_metal(coord);
            if i > 0 {
                self.link_metal(path[i - 1], coord);
            }
        }
    }

    /// Removes silicon from every cell of the Manhattan path from `a` to `b`.
    pub fn clear_si(&mut self, a: CellCoord, b: CellCoord, vertical: bool) {
        for coord in manhattan_path(a, b, vertical) {
            self.clear_cell_si(coord);
        }
    }

    /// Removes metal from every cell of the Manhattan path from `a` to `b`.
    pub fn clear_metal(&mut self, a: CellCoord, b: CellCoord, vertical: bool) {
        for coord in manhattan_path(a, b, vertical) {
            self.clear_cell_metal(coord);
        }
    }

    /// Places a via, creating a metal dot if the cell has no metal.
    ///
    /// MOSFET cells cannot carry a via; returns `false` if none was placed.
    pub fn draw_via(&mut self, coord: CellCoord) -> bool {
        let mut cell = self.cell(coord);
        if cell.si.is_mosfet() {
            debug!(%coord, "refusing via on a MOSFET");
            return false;
        }
        cell.metal = match cell.metal {
            Metal::None => Metal::Trace {
                has_via: true,
                placement: Placement::CENTER,
            },
            Metal::Trace { placement, .. } => Metal::Trace {
                has_via: true,
                placement,
            },
        };
        self.put(coord, cell);
        true
    }

    /// Removes the via of a cell, keeping its metal.
    pub fn clear_via(&mut self, coord: CellCoord) {
        let mut cell = self.cell(coord);
        if let Metal::Trace { has_via, .. } = &mut cell.metal {
            *has_via = false;
        }
        self.put(coord, cell);
    }

    /// Links the silicon of `from` directly to the silicon of `to`.
    ///
    /// `to` receives silicon of polarity `paint_n` if it has none. Without a
    /// `from` cell, this only starts a fresh trace at `to`. Returns `false`
    /// if the cells are not adjacent or cannot be linked.
    pub fn draw_si_link(&mut self, from: Option<CellCoord>, to: CellCoord, paint_n: bool) -> bool {
        self.materialize_si(to, paint_n);
        match from {
            None => true,
            Some(from) if from.side_toward(to).is_some() => {
                self.materialize_si(from, paint_n);
                self.link_si(from, to, paint_n)
            }
            Some(from) => {
                debug!(%from, %to, "cells are not adjacent");
                false
            }
        }
    }

    /// Links the metal of `from` directly to the metal of `to`.
    ///
    /// Behaves like [`Buffer::draw_si_link`] on the metal layer.
    pub fn draw_metal_link(&mut self, from: Option<CellCoord>, to: CellCoord) -> bool {
        self.materialize_metal(to);
        match from {
            None => true,
            Some(from) if from.side_toward(to).is_some() => {
                self.materialize_metal(from);
                self.link_metal(from, to)
            }
            Some(from) => {
                debug!(%from, %to, "cells are not adjacent");
                false
            }
        }
    }

    /// Removes the silicon of one cell, along with its via and every
    /// neighboring silicon link into it.
    pub fn clear_cell_si(&mut self, coord: CellCoord) {
        let mut cell = self.cell(coord);
        for (side, neighbor) in coord.neighbors() {
            let mut other = self.cell(neighbor);
            if other.si.links(side.opposite()) {
                other.si.set_link(side.opposite(), false);
                self.put(neighbor, other);
            }
        }
        cell.si = Silicon::None;
        if let Metal::Trace { has_via, .. } = &mut cell.metal {
            *has_via = false;
        }
        self.put(coord, cell);
    }

    /// Removes the metal of one cell, along with its via and every
    /// neighboring metal link into it.
    pub fn clear_cell_metal(&mut self, coord: CellCoord) {
        let mut cell = self.cell(coord);
        for (side, neighbor) in coord.neighbors() {
            let mut other = self.cell(neighbor);
            if let Metal::Trace { placement, .. } = &mut other.metal {
                if placement.has(side.opposite()) {
                    placement.set(side.opposite(), false);
                    self.put(neighbor, other);
                }
            }
        }
        cell.metal = Metal::None;
        self.put(coord, cell);
    }

    /// Removes both layers of one cell and every neighboring link into it.
    pub fn clear_cell(&mut self, coord: CellCoord) {
        self.clear_cell_si(coord);
        self.clear_cell_metal(coord);
    }

    fn materialize_si(&mut self, coord: CellCoord, is_n: bool) {
        let mut cell = self.cell(coord);
        if !cell.si.is_present() {
            cell.si = Silicon::np(is_n, Placement::CENTER);
            self.put(coord, cell);
        }
    }

    fn materialize_metal(&mut self, coord: CellCoord) {
        let mut cell = self.cell(coord);
        if !cell.metal.is_present() {
            cell.metal = Metal::trace(Placement::CENTER);
            self.put(coord, cell);
        }
    }

    /// Turns a lone strip of silicon crossed by a path along `path_dir`
    /// into a MOSFET, if its contents allow it.
    fn try_place_mosfet(&mut self, coord: CellCoord, path_dir: Dir, paint_n: bool) {
        let mut cell = self.cell(coord);
        let Silicon::NP { is_n, placement } = cell.si else {
            return;
        };
        if is_n == paint_n
            || cell.metal.has_via()
            || placement.is_center()
            || !placement.only_along(!path_dir)
        {
            return;
        }
        debug!(%coord, is_npn = is_n, "placing MOSFET");
        cell.si = Silicon::Mosfet {
            is_npn: is_n,
            is_horizontal: !path_dir == Dir::Horiz,
            gate_placement: Placement::CENTER,
            ec_placement: placement,
        };
        self.put(coord, cell);
    }

    /// Links the silicon of two adjacent cells that both already have silicon.
    fn link_si(&mut self, a: CellCoord, b: CellCoord, is_n: bool) -> bool {
        let Some(side) = a.side_toward(b) else {
            return false;
        };
        let mut here = self.cell(a);
        let mut there = self.cell(b);
        if !si_accepts(&here.si, side, is_n) || !si_accepts(&there.si, side.opposite(), is_n) {
            debug!(from = %a, to = %b, is_n, "silicon link refused");
            return false;
        }
        here.si.set_link(side, true);
        there.si.set_link(side.opposite(), true);
        self.put(a, here);
        self.put(b, there);
        true
    }

    /// Links the metal of two adjacent cells that both already have metal.
    fn link_metal(&mut self, a: CellCoord, b: CellCoord) -> bool {
        let Some(side) = a.side_toward(b) else {
            return false;
        };
        let mut here = self.cell(a);
        let mut there = self.cell(b);
        match (&mut here.metal, &mut there.metal) {
            (Metal::Trace { placement: p, .. }, Metal::Trace { placement: q, .. }) => {
                p.set(side, true);
                q.set(side.opposite(), true);
            }
            _ => return false,
        }
        self.put(a, here);
        self.put(b, there);
        true
    }
}
