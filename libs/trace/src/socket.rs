//! Cells exposed to an external circuit as logic I/O.

use cellbuf::{Atom, Buffer, CellPart};
use geometry::prelude::*;
use serde::{Deserialize, Serialize};

/// One cell driven or observed from outside the layout.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Pin {
    /// The cell.
    pub coord: CellCoord,
    /// Whether a change on this pin should trigger the socket's update.
    pub trigger: bool,
    /// Whether the external circuit drives this pin high.
    pub input_high: bool,
    /// Whether the layout drives this pin high.
    pub output_high: bool,
}

/// A callback run by the simulation layer when pin state changes.
pub type UpdateFn = Box<dyn FnMut(&mut [Pin]) + Send>;

/// A group of pins with a shared update callback.
pub struct Socket {
    pins: Vec<Pin>,
    update: UpdateFn,
}

impl Pin {
    /// A pin at `coord` with every flag cleared.
    pub fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            ..Default::default()
        }
    }

    /// A pin that triggers its socket's update.
    pub fn trigger(coord: CellCoord) -> Self {
        Self {
            coord,
            trigger: true,
            ..Default::default()
        }
    }

    /// The atom this pin connects to: the metal of its cell if present,
    /// otherwise the silicon.
    pub fn atom(&self, buffer: &Buffer) -> Option<Atom> {
        let cell = buffer.cell(self.coord);
        [CellPart::Metal, CellPart::Si]
            .into_iter()
            .find(|part| part.exists_in(&cell))
            .map(|part| Atom::new(self.coord, part))
    }
}

impl Socket {
    /// Creates a socket.
    pub fn new(pins: Vec<Pin>, update: impl FnMut(&mut [Pin]) + Send + 'static) -> Self {
        Self {
            pins,
            update: Box::new(update),
        }
    }

    /// The pins of this socket.
    #[inline]
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Mutable access to the pins, for the simulation layer.
    #[inline]
    pub fn pins_mut(&mut self) -> &mut [Pin] {
        &mut self.pins
    }

    /// The atom of each pin, in pin order. See [`Pin::atom`].
    pub fn pin_atoms(&self, buffer: &Buffer) -> Vec<Option<Atom>> {
        self.pins.iter().map(|pin| pin.atom(buffer)).collect()
    }

    /// Runs the update callback over the pins.
    pub fn notify(&mut self) {
        (self.update)(&mut self.pins);
    }
}

impl std::fmt::Debug for Socket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Socket").field("pins", &self.pins).finish_non_exhaustive()
    }
}
