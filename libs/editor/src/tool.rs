//! The tool interface and registry.

use arcstr::ArcStr;
use cellbuf::{Buffer, Mask, Selection};
use geometry::prelude::*;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::io::IoState;

/// An error restoring or selecting a tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolStateError {
    /// No tool is registered under this name.
    #[error("unknown tool `{0}`")]
    UnknownTool(ArcStr),
    /// A persisted state blob does not deserialize.
    #[error("corrupt state for tool `{tool}`")]
    Corrupt {
        /// The tool.
        tool: ArcStr,
        /// The deserialization failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Opaque tool state to keep across sessions.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ToolPersist {
    /// The registry name of the tool.
    pub tool_name: ArcStr,
    /// The state, readable by [`ToolRegistry::restore`].
    pub serialized_state: Vec<u8>,
}

/// The editor state a tool may read and change.
pub struct ToolContext<'a> {
    /// The active buffer.
    pub buffer: &'a mut Buffer,
    /// The highlight overlay.
    pub mask: &'a mut Mask,
    /// The current selection.
    pub selection: &'a mut Option<Selection>,
    /// The cell under the pointer, if the pointer is over the viewport.
    pub cursor_coord: Option<CellCoord>,
    /// The pointer cursor to display.
    pub cursor_style: &'a mut ArcStr,
    /// Editor settings.
    pub config: &'a EditorConfig,
}

/// What a tool did during one dispatch.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ToolOutput {
    /// The tool finished an edit that should become an undo checkpoint.
    pub commit: bool,
    /// The tool's persisted state changed.
    pub persist_state: bool,
}

impl ToolOutput {
    /// Nothing to report.
    pub const NONE: Self = Self {
        commit: false,
        persist_state: false,
    };

    /// A finished edit.
    pub const COMMIT: Self = Self {
        commit: true,
        persist_state: false,
    };

    /// A change to the tool's own state.
    pub const PERSIST: Self = Self {
        commit: false,
        persist_state: true,
    };

    /// Combines two outputs.
    pub fn merge(self, other: ToolOutput) -> Self {
        Self {
            commit: self.commit || other.commit,
            persist_state: self.persist_state || other.persist_state,
        }
    }
}

/// An interactive editing tool.
pub trait Tool {
    /// The registry name of this tool.
    fn name(&self) -> &'static str;

    /// Handles one frame of input while the tool is active.
    fn dispatch(
        &mut self,
        cx: &mut ToolContext<'_>,
        io: &IoState,
        camera: &dyn Camera,
    ) -> ToolOutput;

    /// The state to persist, if the tool has any.
    fn serialize_state(&self) -> Option<Vec<u8>> {
        None
    }

    /// Called when another tool becomes active.
    fn deactivate(&mut self, _cx: &mut ToolContext<'_>) -> ToolOutput {
        ToolOutput::NONE
    }
}

type CreateFn = fn() -> Box<dyn Tool>;
type RestoreFn = fn(&[u8]) -> Result<Box<dyn Tool>, serde_json::Error>;

#[derive(Clone, Copy)]
struct ToolEntry {
    create: CreateFn,
    restore: RestoreFn,
}

fn create_tool<T: Tool + Default + 'static>() -> Box<dyn Tool> {
    Box::<T>::default()
}

fn restore_tool<T: Tool + DeserializeOwned + 'static>(
    bytes: &[u8],
) -> Result<Box<dyn Tool>, serde_json::Error> {
    Ok(Box::new(serde_json::from_slice::<T>(bytes)?))
}

/// Maps tool names to constructors.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    entries: IndexMap<ArcStr, ToolEntry>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool type under `name`, replacing any earlier entry.
    pub fn register<T>(&mut self, name: impl Into<ArcStr>)
    where
        T: Tool + Default + DeserializeOwned + 'static,
    {
        self.entries.insert(
            name.into(),
            ToolEntry {
                create: create_tool::<T>,
                restore: restore_tool::<T>,
            },
        );
    }

    /// Returns `true` if a tool is registered under `name`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &ArcStr> {
        self.entries.keys()
    }

    /// Creates a tool in its initial state.
    pub fn create(&self, name: &str) -> Result<Box<dyn Tool>, ToolStateError> {
        let entry = self.entry(name)?;
        Ok((entry.create)())
    }

    /// Revives a tool from a persisted state blob.
    pub fn restore(&self, name: &str, bytes: &[u8]) -> Result<Box<dyn Tool>, ToolStateError> {
        let entry = self.entry(name)?;
        (entry.restore)(bytes).map_err(|source| ToolStateError::Corrupt {
            tool: ArcStr::from(name),
            source,
        })
    }

    /// Creates every registered tool in its initial state.
    pub(crate) fn create_all(&self) -> IndexMap<ArcStr, Box<dyn Tool>> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), (entry.create)()))
            .collect()
    }

    fn entry(&self, name: &str) -> Result<&ToolEntry, ToolStateError> {
        self.entries
            .get(name)
            .ok_or_else(|| ToolStateError::UnknownTool(ArcStr::from(name)))
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}
