//! Paints and erases metal.

use serde::{Deserialize, Serialize};

use super::{cancel_stroke, drive_stroke, Stroke};
use crate::camera::Camera;
use crate::io::IoState;
use crate::tool::{Tool, ToolContext, ToolOutput};

pub(crate) const NAME: &str = "metal";

#[derive(Debug, Copy, Clone)]
enum Action {
    Paint,
    Clear,
}

/// Drag with the primary button to paint metal and with the secondary
/// button (or shift) to erase it.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MetalTool {
    #[serde(skip)]
    stroke: Option<Stroke<Action>>,
}

impl Tool for MetalTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn dispatch(
        &mut self,
        cx: &mut ToolContext<'_>,
        io: &IoState,
        _camera: &dyn Camera,
    ) -> ToolOutput {
        *cx.cursor_style = arcstr::literal!("crosshair");
        drive_stroke(
            &mut self.stroke,
            cx,
            io,
            |io| {
                if io.secondary.clicked || (io.primary.clicked && io.shift()) {
                    Some(Action::Clear)
                } else if io.primary.clicked {
                    Some(Action::Paint)
                } else {
                    None
                }
            },
            |buffer, action, a, b, vertical| match action {
                Action::Paint => buffer.draw_metal(a, b, vertical),
                Action::Clear => buffer.clear_metal(a, b, vertical),
            },
        )
    }

    fn deactivate(&mut self, cx: &mut ToolContext<'_>) -> ToolOutput {
        cancel_stroke(&mut self.stroke, cx);
        ToolOutput::NONE
    }
}
