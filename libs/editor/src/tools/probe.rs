//! Highlights the net under the cursor.

use cellbuf::{Atom, CellPart};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::io::IoState;
use crate::tool::{Tool, ToolContext, ToolOutput};

pub(crate) const NAME: &str = "probe";

/// Click a cell to highlight the net of its metal, or shift-click to
/// highlight the net of its silicon. Escape clears the highlight.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProbeTool {}

impl Tool for ProbeTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn dispatch(
        &mut self,
        cx: &mut ToolContext<'_>,
        io: &IoState,
        _camera: &dyn Camera,
    ) -> ToolOutput {
        *cx.cursor_style = arcstr::literal!("help");

        if io.get_key("Escape").clicked {
            cx.mask.clear();
            return ToolOutput::NONE;
        }
        let Some(coord) = cx.cursor_coord else {
            return ToolOutput::NONE;
        };
        if !io.primary.clicked {
            return ToolOutput::NONE;
        }

        let order = if io.shift() {
            [CellPart::Si, CellPart::Metal]
        } else {
            [CellPart::Metal, CellPart::Si]
        };
        cx.mask.clear();
        let Some(seed) = order
            .into_iter()
            .map(|part| Atom::new(coord, part))
            .find(|atom| cx.buffer.has_atom(*atom))
        else {
            return ToolOutput::NONE;
        };

        let atoms = trace::get_trace_atoms(cx.buffer, seed);
        tracing::debug!(%seed, atoms = atoms.len(), "probed net");
        if let Err(err) = cx.mask.activate_all(cx.buffer, atoms) {
            tracing::warn!("failed to highlight net: {err}");
        }
        ToolOutput::NONE
    }

    fn deactivate(&mut self, cx: &mut ToolContext<'_>) -> ToolOutput {
        cx.mask.clear();
        ToolOutput::NONE
    }
}
