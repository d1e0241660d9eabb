//! Places and removes vias.

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::io::IoState;
use crate::tool::{Tool, ToolContext, ToolOutput};

pub(crate) const NAME: &str = "via";

/// Click to place a via; secondary-click to remove one.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ViaTool {}

impl Tool for ViaTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn dispatch(
        &mut self,
        cx: &mut ToolContext<'_>,
        io: &IoState,
        _camera: &dyn Camera,
    ) -> ToolOutput {
        *cx.cursor_style = arcstr::literal!("cell");
        let Some(coord) = cx.cursor_coord else {
            return ToolOutput::NONE;
        };
        let before = cx.buffer.get_cell(coord);
        if io.primary.clicked {
            cx.buffer.draw_via(coord);
        } else if io.secondary.clicked {
            cx.buffer.clear_via(coord);
        }
        if cx.buffer.get_cell(coord) != before {
            ToolOutput::COMMIT
        } else {
            ToolOutput::NONE
        }
    }
}
