//! One frame of consolidated input.

use std::collections::HashMap;

use arcstr::ArcStr;
use geometry::prelude::*;
use serde::{Deserialize, Serialize};

/// The state of a button or key during one frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BoolState {
    /// Pressed during this frame.
    pub clicked: bool,
    /// Held at the end of this frame.
    pub down: bool,
    /// Released during this frame.
    pub released: bool,
}

impl BoolState {
    /// Pressed this frame and still held.
    pub const CLICKED: Self = Self {
        clicked: true,
        down: true,
        released: false,
    };

    /// Held since an earlier frame.
    pub const HELD: Self = Self {
        clicked: false,
        down: true,
        released: false,
    };

    /// Released this frame.
    pub const RELEASED: Self = Self {
        clicked: false,
        down: false,
        released: true,
    };

    /// Returns `true` if the button was down at any point this frame.
    #[inline]
    pub fn active(&self) -> bool {
        self.clicked || self.down || self.released
    }
}

/// A pointer drag in progress.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Drag {
    /// The cell under the pointer when the drag started.
    pub start: CellCoord,
    /// Whether the pointer first moved vertically.
    pub initial_impulse_vertical: bool,
}

/// Everything the editor needs to know about one frame of input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IoState {
    /// The primary pointer button.
    pub primary: BoolState,
    /// The secondary pointer button.
    pub secondary: BoolState,
    /// Keys by logical name, such as `"a"`, `"Shift"` or `"Delete"`.
    pub keys: HashMap<ArcStr, BoolState>,
    /// Keys by physical code, such as `"KeyA"` or `"ShiftLeft"`.
    pub key_codes: HashMap<ArcStr, BoolState>,
    /// The drag in progress, if any.
    pub drag: Option<Drag>,
    /// The pointer position in screen pixels.
    pub screen_point: [f64; 2],
    /// The cell under the pointer.
    pub cell: CellCoord,
    /// Wheel movement this frame.
    pub scroll_delta: f64,
}

impl IoState {
    /// The state of a key by logical name. Unknown keys are up.
    pub fn get_key(&self, key: &str) -> BoolState {
        self.keys.get(key).copied().unwrap_or_default()
    }

    /// The state of a key by physical code. Unknown codes are up.
    pub fn get_key_code(&self, code: &str) -> BoolState {
        self.key_codes.get(code).copied().unwrap_or_default()
    }

    /// Returns `true` if either shift key is held.
    pub fn shift(&self) -> bool {
        self.get_key("Shift").down
            || self.get_key_code("ShiftLeft").down
            || self.get_key_code("ShiftRight").down
    }

    /// Returns `true` if either pointer button is held.
    #[inline]
    pub fn pointer_down(&self) -> bool {
        self.primary.down || self.secondary.down
    }

    /// Where the current stroke started and which leg comes first.
    ///
    /// Without a drag, the stroke is the single cell under the pointer.
    pub fn stroke_start(&self) -> (CellCoord, bool) {
        match self.drag {
            Some(drag) => (drag.start, drag.initial_impulse_vertical),
            None => (self.cell, true),
        }
    }
}
