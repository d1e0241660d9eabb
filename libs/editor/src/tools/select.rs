//! Rectangular selection and the clipboard.

use cellbuf::Buffer;
use geometry::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::io::IoState;
use crate::tool::{Tool, ToolContext, ToolOutput};

pub(crate) const NAME: &str = "select";

/// Drag to select a rectangle.
///
/// | key | action |
/// |---|---|
/// | `Delete` | clear the selection |
/// | `c` | copy the selection, anchored at its lower-left corner |
/// | `p` | paste the clipboard at the cursor |
/// | `r` | rotate the clipboard clockwise |
/// | `f` | flip the clipboard left-to-right |
/// | `Escape` | drop the selection |
///
/// The clipboard is persisted as a base64 buffer.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SelectTool {
    clipboard: Option<String>,
    #[serde(skip)]
    anchor: Option<CellCoord>,
}

impl SelectTool {
    /// The clipboard contents, if any.
    pub fn clipboard(&self) -> Option<Buffer> {
        let text = self.clipboard.as_ref()?;
        match Buffer::from_base64_string(text) {
            Ok(buffer) => Some(buffer),
            Err(err) => {
                tracing::warn!("discarding unreadable clipboard: {err}");
                None
            }
        }
    }

    fn set_clipboard(&mut self, buffer: &Buffer) {
        self.clipboard = Some(buffer.to_base64_string());
    }

    fn transform_clipboard(&mut self, f: impl FnOnce(&Buffer) -> Buffer) -> ToolOutput {
        match self.clipboard() {
            Some(buffer) => {
                self.set_clipboard(&f(&buffer));
                ToolOutput::PERSIST
            }
            None => ToolOutput::NONE,
        }
    }
}

impl Tool for SelectTool {
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

        if io.primary.clicked && cx.cursor_coord.is_some() {
            self.anchor = Some(io.stroke_start().0);
        }
        if let Some(anchor) = self.anchor {
            *cx.selection = Some(Rect::new(anchor, io.cell));
            if !io.primary.down {
                self.anchor = None;
            }
        }

        if io.get_key("Escape").clicked {
            *cx.selection = None;
            return ToolOutput::NONE;
        }

        let mut out = ToolOutput::NONE;
        if let Some(selection) = *cx.selection {
            if io.get_key("Delete").clicked {
                let before = cx.buffer.clone();
                cx.buffer.clear_selection(selection);
                if *cx.buffer != before {
                    out = out.merge(ToolOutput::COMMIT);
                }
            }
            if io.get_key("c").clicked {
                let copy = cx.buffer.clone_selection(selection, selection.ll());
                tracing::debug!(cells = copy.cell_count(), "copied selection");
                self.set_clipboard(&copy);
                out = out.merge(ToolOutput::PERSIST);
            }
        }
        if io.get_key("p").clicked {
            if let (Some(coord), Some(clipboard)) = (cx.cursor_coord, self.clipboard()) {
                let before = cx.buffer.clone();
                cx.buffer.paste_at(coord, &clipboard);
                if *cx.buffer != before {
                    out = out.merge(ToolOutput::COMMIT);
                }
            }
        }
        if io.get_key("r").clicked {
            out = out.merge(self.transform_clipboard(Buffer::rotate_to_new));
        }
        if io.get_key("f").clicked {
            out = out.merge(self.transform_clipboard(Buffer::mirror_to_new));
        }
        out
    }

    fn serialize_state(&self) -> Option<Vec<u8>> {
        match serde_json::to_vec(self) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                tracing::warn!("failed to serialize select tool state: {err}");
                None
            }
        }
    }

    fn deactivate(&mut self, cx: &mut ToolContext<'_>) -> ToolOutput {
        self.anchor = None;
        *cx.selection = None;
        ToolOutput::NONE
    }
}
