//! The editor state machine.

use arcstr::ArcStr;
use cellbuf::{Buffer, Mask, Selection};
use geometry::prelude::*;
use indexmap::IndexMap;
use tracing::{span, Level};

use crate::camera::Camera;
use crate::config::{ConfigError, EditorConfig};
use crate::io::IoState;
use crate::tool::{Tool, ToolContext, ToolOutput, ToolPersist, ToolRegistry, ToolStateError};

/// What the host should keep after one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorDispatchResult {
    /// A finished edit to record as an undo checkpoint.
    ///
    /// `None` while an edit is still in progress.
    pub buffer_persist: Option<Buffer>,
    /// Tool state that changed during this dispatch.
    pub tools_persist: Vec<ToolPersist>,
}

/// Owns a buffer and the tools that edit it.
pub struct Editor {
    /// The authoritative cells.
    pub buffer: Buffer,
    /// The highlight overlay.
    pub mask: Mask,
    /// The current selection.
    pub selection: Option<Selection>,
    /// The cell under the pointer, if the pointer is over the viewport.
    pub cursor_coord: Option<CellCoord>,
    /// The pointer cursor the active tool asks for.
    pub cursor_style: ArcStr,
    config: EditorConfig,
    registry: ToolRegistry,
    tools: IndexMap<ArcStr, Box<dyn Tool>>,
    active: ArcStr,
}

impl Editor {
    /// Creates an editor with the default settings and the built-in tools.
    pub fn new() -> Self {
        let config = EditorConfig::default();
        let registry = ToolRegistry::builtin();
        let tools = registry.create_all();
        Self {
            buffer: Buffer::new(),
            mask: Mask::new(),
            selection: None,
            cursor_coord: None,
            cursor_style: arcstr::literal!("default"),
            active: config.default_tool.clone(),
            config,
            registry,
            tools,
        }
    }

    /// Creates an editor with custom settings and tools.
    pub fn with_config(config: EditorConfig, registry: ToolRegistry) -> Result<Self, ConfigError> {
        config.validate(&registry)?;
        let tools = registry.create_all();
        Ok(Self {
            buffer: Buffer::new(),
            mask: Mask::new(),
            selection: None,
            cursor_coord: None,
            cursor_style: arcstr::literal!("default"),
            active: config.default_tool.clone(),
            config,
            registry,
            tools,
        })
    }

    /// The editor settings.
    #[inline]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The name of the active tool.
    #[inline]
    pub fn active_tool(&self) -> &ArcStr {
        &self.active
    }

    /// Replaces the buffer, as when stepping through undo history.
    ///
    /// Highlights on atoms that no longer exist are dropped.
    pub fn set_buffer(&mut self, buffer: Buffer) {
        self.buffer = buffer;
        self.mask.retain_valid(&self.buffer);
    }

    /// Handles one frame of input.
    pub fn dispatch_event(&mut self, io: &IoState, camera: &dyn Camera) -> EditorDispatchResult {
        let _span = span!(Level::DEBUG, "dispatch_event", tool = %self.active).entered();

        self.cursor_coord = camera.contains_screen(io.screen_point).then_some(io.cell);

        let mut result = EditorDispatchResult::default();
        if !io.primary.active() && !io.secondary.active() {
            let requested = self
                .config
                .tool_keys
                .iter()
                .find(|(key, _)| io.get_key(key).clicked)
                .map(|(_, tool)| tool.clone());
            if let Some(name) = requested {
                match self.set_active_tool(&name) {
                    Ok(persist) => result.tools_persist.extend(persist),
                    Err(err) => tracing::warn!("cannot switch tool: {err}"),
                }
                return result;
            }
        }

        let active = self.active.clone();
        let (tools, mut cx) = self.split();
        let output = match tools.get_mut(&active) {
            Some(tool) => tool.dispatch(&mut cx, io, camera),
            None => ToolOutput::NONE,
        };
        self.persist_into(&mut result, output);
        result
    }

    /// Makes `name` the active tool.
    ///
    /// Returns the outgoing tool's state, if it has any to keep.
    pub fn set_active_tool(&mut self, name: &str) -> Result<Option<ToolPersist>, ToolStateError> {
        if !self.tools.contains_key(name) {
            return Err(ToolStateError::UnknownTool(ArcStr::from(name)));
        }
        if self.active.as_str() == name {
            return Ok(None);
        }

        let previous = self.active.clone();
        let (tools, mut cx) = self.split();
        let mut persist = None;
        if let Some(tool) = tools.get_mut(&previous) {
            let output = tool.deactivate(&mut cx);
            if output.commit {
                tracing::debug!(tool = %previous, "deactivation committed an edit");
            }
            persist = tool.serialize_state().map(|serialized_state| ToolPersist {
                tool_name: previous.clone(),
                serialized_state,
            });
        }

        tracing::debug!(from = %previous, to = name, "switched tool");
        self.active = ArcStr::from(name);
        Ok(persist)
    }

    /// Replaces a tool with one revived from persisted state.
    pub fn restore_tool_state(&mut self, name: &str, bytes: &[u8]) -> Result<(), ToolStateError> {
        let tool = self.registry.restore(name, bytes)?;
        match self.tools.get_mut(name) {
            Some(slot) => *slot = tool,
            None => {
                self.tools.insert(ArcStr::from(name), tool);
            }
        }
        Ok(())
    }

    fn persist_into(&mut self, result: &mut EditorDispatchResult, output: ToolOutput) {
        if output.commit {
            self.mask.retain_valid(&self.buffer);
            result.buffer_persist = Some(self.buffer.clone());
        }
        if output.persist_state {
            if let Some(serialized_state) = self
                .tools
                .get(&self.active)
                .and_then(|tool| tool.serialize_state())
            {
                result.tools_persist.push(ToolPersist {
                    tool_name: self.active.clone(),
                    serialized_state,
                });
            }
        }
    }

    fn split(&mut self) -> (&mut IndexMap<ArcStr, Box<dyn Tool>>, ToolContext<'_>) {
        (
            &mut self.tools,
            ToolContext {
                buffer: &mut self.buffer,
                mask: &mut self.mask,
                selection: &mut self.selection,
                cursor_coord: self.cursor_coord,
                cursor_style: &mut self.cursor_style,
                config: &self.config,
            },
        )
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("buffer", &self.buffer)
            .field("mask", &self.mask)
            .field("selection", &self.selection)
            .field("cursor_coord", &self.cursor_coord)
            .field("cursor_style", &self.cursor_style)
            .field("active", &self.active)
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}
