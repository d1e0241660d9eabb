//! The built-in tools.

use cellbuf::Buffer;
use geometry::prelude::*;

use crate::io::IoState;
use crate::tool::{ToolContext, ToolOutput, ToolRegistry};

pub mod metal;
pub mod probe;
pub mod select;
pub mod silicon;
pub mod via;

pub use metal::MetalTool;
pub use probe::ProbeTool;
pub use select::SelectTool;
pub use silicon::SiliconTool;
pub use via::ViaTool;

impl ToolRegistry {
    /// A registry holding every built-in tool.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register::<SiliconTool>(silicon::NAME);
        registry.register::<MetalTool>(metal::NAME);
        registry.register::<ViaTool>(via::NAME);
        registry.register::<SelectTool>(select::NAME);
        registry.register::<ProbeTool>(probe::NAME);
        registry
    }
}

/// A drag edit in progress.
#[derive(Debug, Clone)]
pub(crate) struct Stroke<A> {
    snapshot: Buffer,
    start: CellCoord,
    vertical: bool,
    action: A,
}

/// Runs one frame of a drag edit.
///
/// The buffer is snapshotted when `begin` picks an action. Every frame
/// restores the snapshot and replays the whole path, so the buffer always
/// shows exactly one stroke. The leg order follows the drag while there is
/// one and keeps its last value otherwise. Releasing the pointer ends the
/// stroke and commits if anything changed.
pub(crate) fn drive_stroke<A: Copy>(
    stroke: &mut Option<Stroke<A>>,
    cx: &mut ToolContext<'_>,
    io: &IoState,
    begin: impl FnOnce(&IoState) -> Option<A>,
    apply: impl FnOnce(&mut Buffer, A, CellCoord, CellCoord, bool),
) -> ToolOutput {
    if stroke.is_none() && cx.cursor_coord.is_some() {
        if let Some(action) = begin(io) {
            let (start, vertical) = io.stroke_start();
            *stroke = Some(Stroke {
                snapshot: cx.buffer.clone(),
                start,
                vertical,
                action,
            });
        }
    }
    let Some(current) = stroke.as_mut() else {
        return ToolOutput::NONE;
    };

    if let Some(drag) = io.drag {
        current.vertical = drag.initial_impulse_vertical;
    }
    *cx.buffer = current.snapshot.clone();
    apply(
        &mut *cx.buffer,
        current.action,
        current.start,
        io.cell,
        current.vertical,
    );
    if io.pointer_down() {
        return ToolOutput::NONE;
    }

    let changed = *cx.buffer != current.snapshot;
    *stroke = None;
    if changed {
        ToolOutput::COMMIT
    } else {
        ToolOutput::NONE
    }
}

/// Abandons a drag edit, restoring the buffer it started from.
pub(crate) fn cancel_stroke<A>(stroke: &mut Option<Stroke<A>>, cx: &mut ToolContext<'_>) {
    if let Some(stroke) = stroke.take() {
        tracing::debug!(start = %stroke.start, "cancelled stroke");
        *cx.buffer = stroke.snapshot;
    }
}
