//! Editor commands and keyboard mapping.
//!
//! Every mutation reaches the editor as an [`EditorCommand`] passed to
//! [`EditorState::dispatch`](crate::EditorState::dispatch). Hosts translate
//! their own pointer and keyboard events into commands; [`command_for_key`]
//! covers the standard shortcuts.

use serde::{Deserialize, Serialize};

use crate::ops::NudgeDirection;
use crate::schema::ElementDocument;
use crate::ElementId;

fn default_text_content() -> String {
    "Text".to_string()
}

/// All commands the editor accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EditorCommand {
    /// Add a text element in the first free slot.
    AddText {
        /// Initial content.
        #[serde(default = "default_text_content")]
        content: String,
    },

    /// Add an icon element in the first free slot.
    AddIcon {
        /// Icon identifier.
        icon: String,
    },

    /// Duplicate an element next to itself.
    Duplicate {
        /// Source element.
        id: ElementId,
    },

    /// Copy an element to the clipboard.
    Copy {
        /// Element to copy.
        id: ElementId,
    },

    /// Copy an element to the clipboard and delete it.
    Cut {
        /// Element to cut.
        id: ElementId,
    },

    /// Paste the clipboard, or an explicit payload when given.
    Paste {
        /// Elements to paste instead of the clipboard contents.
        #[serde(default)]
        payload: Option<Vec<ElementDocument>>,
    },

    /// Delete an element.
    Delete {
        /// Element to delete.
        id: ElementId,
    },

    /// Nudge an element by one keyboard step.
    Nudge {
        /// Element to move.
        id: ElementId,
        /// Direction of travel.
        direction: NudgeDirection,
        /// Use the large step.
        #[serde(default)]
        large: bool,
    },

    /// Set an element's rotation.
    Rotate {
        /// Element to rotate.
        id: ElementId,
        /// Rotation in degrees.
        degrees: f32,
    },

    /// Draw an element above all others.
    BringToFront {
        /// Element to raise.
        id: ElementId,
    },

    /// Draw an element below all others.
    SendToBack {
        /// Element to lower.
        id: ElementId,
    },

    /// Begin dragging an element.
    DragStart {
        /// Element to drag.
        id: ElementId,
    },

    /// Pointer moved during a drag.
    DragMove {
        /// Proposed left edge.
        x: f32,
        /// Proposed top edge.
        y: f32,
    },

    /// Pointer released: commit the drag.
    DragEnd,

    /// Abandon the drag without committing.
    DragCancel,

    /// Begin resizing an element.
    ResizeStart {
        /// Element to resize.
        id: ElementId,
    },

    /// Handle moved during a resize.
    ResizeMove {
        /// Proposed width.
        width: f32,
        /// Proposed height.
        height: f32,
        /// New left edge, for handles that move the origin.
        #[serde(default)]
        x: Option<f32>,
        /// New top edge, for handles that move the origin.
        #[serde(default)]
        y: Option<f32>,
    },

    /// Handle released: commit the resize.
    ResizeEnd,

    /// Abandon the resize without committing.
    ResizeCancel,

    /// Batch-correct every overlapping element.
    ValidateAll,

    /// Step back through history.
    Undo,

    /// Step forward through history.
    Redo,
}

impl EditorCommand {
    /// Whether this command is part of an interactive drag or resize.
    #[must_use]
    pub const fn is_session_command(&self) -> bool {
        matches!(
            self,
            Self::DragStart { .. }
                | Self::DragMove { .. }
                | Self::DragEnd
                | Self::DragCancel
                | Self::ResizeStart { .. }
                | Self::ResizeMove { .. }
                | Self::ResizeEnd
                | Self::ResizeCancel
        )
    }
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

impl KeyModifiers {
    /// Control on most platforms, Command on macOS.
    #[must_use]
    pub const fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Map a key press to an editor command.
///
/// `selected` is the element with focus, if any. Keys that act on an
/// element yield `None` without one.
#[must_use]
pub fn command_for_key(
    key: &str,
    modifiers: KeyModifiers,
    selected: Option<ElementId>,
) -> Option<EditorCommand> {
    if let Some(direction) = NudgeDirection::from_key(key) {
        return selected.map(|id| EditorCommand::Nudge {
            id,
            direction,
            large: modifiers.shift,
        });
    }

    if modifiers.command() {
        return match key.to_ascii_lowercase().as_str() {
            "z" if modifiers.shift => Some(EditorCommand::Redo),
            "z" => Some(EditorCommand::Undo),
            "y" => Some(EditorCommand::Redo),
            "v" => Some(EditorCommand::Paste { payload: None }),
            "c" => selected.map(|id| EditorCommand::Copy { id }),
            "x" => selected.map(|id| EditorCommand::Cut { id }),
            "d" => selected.map(|id| EditorCommand::Duplicate { id }),
            _ => None,
        };
    }

    match key {
        "Delete" | "Backspace" => selected.map(|id| EditorCommand::Delete { id }),
        _ => None,
    }
}
