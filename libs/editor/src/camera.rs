//! Projection between screen, world and cell coordinates.

use geometry::prelude::*;
use serde::{Deserialize, Serialize};

/// A view onto the grid.
///
/// Screen coordinates are pixels with `y` pointing down. World
/// coordinates are in cells with `y` pointing up; cell `(x, y)` covers
/// world `[x, x + 1) × [y, y + 1)`.
pub trait Camera {
    /// Pixels per cell.
    fn scale(&self) -> f64;

    /// The world point at the center of the viewport.
    fn translation(&self) -> [f64; 2];

    /// The viewport size in pixels.
    fn size(&self) -> [f64; 2];

    /// Projects a screen point into the world.
    fn screen_to_world(&self, point: [f64; 2]) -> [f64; 2] {
        let [w, h] = self.size();
        let [tx, ty] = self.translation();
        let scale = self.scale();
        [
            tx + (point[0] - w / 2.) / scale,
            ty - (point[1] - h / 2.) / scale,
        ]
    }

    /// Projects a world point onto the screen.
    fn world_to_screen(&self, point: [f64; 2]) -> [f64; 2] {
        let [w, h] = self.size();
        let [tx, ty] = self.translation();
        let scale = self.scale();
        [
            (point[0] - tx) * scale + w / 2.,
            (ty - point[1]) * scale + h / 2.,
        ]
    }

    /// The cell containing a world point.
    fn world_to_cell(&self, point: [f64; 2]) -> CellCoord {
        CellCoord::new(point[0].floor() as i32, point[1].floor() as i32)
    }

    /// The cell under a screen point.
    fn screen_to_cell(&self, point: [f64; 2]) -> CellCoord {
        self.world_to_cell(self.screen_to_world(point))
    }

    /// Returns `true` if the screen point lies inside the viewport.
    fn contains_screen(&self, point: [f64; 2]) -> bool {
        let [w, h] = self.size();
        (0.0..w).contains(&point[0]) && (0.0..h).contains(&point[1])
    }
}

/// A plain orthographic camera.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrthoCamera {
    /// Pixels per cell.
    pub scale: f64,
    /// The world point at the center of the viewport.
    pub translation: [f64; 2],
    /// The viewport size in pixels.
    pub size: [f64; 2],
}

impl OrthoCamera {
    /// Creates a camera centered on the world origin.
    pub fn new(size: [f64; 2], scale: f64) -> Self {
        Self {
            scale,
            translation: [0., 0.],
            size,
        }
    }

    /// Zooms by `factor` while keeping the world point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: [f64; 2], factor: f64) {
        let before = self.screen_to_world(anchor);
        self.scale *= factor;
        let after = self.screen_to_world(anchor);
        self.translation[0] += before[0] - after[0];
        self.translation[1] += before[1] - after[1];
    }
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self::new([800., 600.], 16.)
    }
}

impl Camera for OrthoCamera {
    fn scale(&self) -> f64 {
        self.scale
    }

    fn translation(&self) -> [f64; 2] {
        self.translation
    }

    fn size(&self) -> [f64; 2] {
        self.size
    }
}
