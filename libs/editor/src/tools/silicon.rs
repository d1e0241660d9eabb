//! Paints and erases silicon.

use serde::{Deserialize, Serialize};

use super::{cancel_stroke, drive_stroke, Stroke};
use crate::camera::Camera;
use crate::io::IoState;
use crate::tool::{Tool, ToolContext, ToolOutput};

pub(crate) const NAME: &str = "silicon";

#[derive(Debug, Copy, Clone)]
enum Action {
    Paint { is_n: bool },
    Clear,
}

/// Drag with the primary button to paint the configured polarity, with the
/// secondary button to paint the other one. Hold shift to erase.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SiliconTool {
    #[serde(skip)]
    stroke: Option<Stroke<Action>>,
}

impl Tool for SiliconTool {
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
        let primary_n = cx.config.default_polarity_n;
        drive_stroke(
            &mut self.stroke,
            cx,
            io,
            |io| {
                let clicked = io.primary.clicked || io.secondary.clicked;
                if clicked && io.shift() {
                    Some(Action::Clear)
                } else if io.primary.clicked {
                    Some(Action::Paint { is_n: primary_n })
                } else if io.secondary.clicked {
                    Some(Action::Paint { is_n: !primary_n })
                } else {
                    None
                }
            },
            |buffer, action, a, b, vertical| match action {
                Action::Paint { is_n } => buffer.draw_si(a, b, vertical, is_n),
                Action::Clear => buffer.clear_si(a, b, vertical),
            },
        )
    }

    fn deactivate(&mut self, cx: &mut ToolContext<'_>) -> ToolOutput {
        cancel_stroke(&mut self.stroke, cx);
        ToolOutput::NONE
    }
}
