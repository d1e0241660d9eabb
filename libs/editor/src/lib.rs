//! Input dispatch for a packed-cell layout editor.
//!
//! An [`Editor`] owns a [`Buffer`](cellbuf::Buffer) and a set of
//! [tools](Tool). The host calls [`Editor::dispatch_event`] once per frame
//! with the consolidated input and the current [`Camera`]; the result says
//! when a finished edit should become an undo checkpoint.
//!
//! ```
//! use editor::{BoolState, Editor, IoState, OrthoCamera};
//! use geometry::prelude::*;
//!
//! let mut editor = Editor::new();
//! let camera = OrthoCamera::default();
//! let mut io = IoState {
//!     screen_point: [400., 300.],
//!     primary: BoolState::CLICKED,
//!     ..Default::default()
//! };
//! assert!(editor.dispatch_event(&io, &camera).buffer_persist.is_none());
//!
//! io.primary = BoolState::RELEASED;
//! let result = editor.dispatch_event(&io, &camera);
//! assert_eq!(result.buffer_persist.map(|b| b.cell_count()), Some(1));
//! ```
#![warn(missing_docs)]

pub mod camera;
pub mod config;
pub mod editor;
pub mod io;
pub mod tool;
pub mod tools;

pub use camera::{Camera, OrthoCamera};
pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, EditorDispatchResult};
pub use io::{BoolState, Drag, IoState};
pub use tool::{Tool, ToolContext, ToolOutput, ToolPersist, ToolRegistry, ToolStateError};
