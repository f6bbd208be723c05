//! Input events delivered to a document.
//!
//! These are decoded by the embedding platform layer and handed to the
//! document on the frame thread.

use crate::geometry::Position;

/// Kind of device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerTool {
    #[default]
    Touch,
    Mouse,
    Other,
}

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerAction {
    PointerDown,
    PointerMove,
    PointerUp,
    ButtonPress,
    ButtonRelease,
    Scroll,
}

/// A single pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerEvent {
    /// Milliseconds, on whatever clock the platform uses
    pub timestamp: u64,
    pub tool: PointerTool,
    /// Identifies a finger or a mouse across a down/move/up sequence
    pub pointer_id: i32,
    pub action: PointerAction,
    pub left: f32,
    pub top: f32,
    /// Mouse button for button press/release, zero otherwise
    pub button: i32,
}

impl PointerEvent {
    pub fn new(pointer_id: i32, action: PointerAction, left: f32, top: f32) -> Self {
        Self {
            timestamp: 0,
            tool: PointerTool::default(),
            pointer_id,
            action,
            left,
            top,
            button: 0,
        }
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_tool(mut self, tool: PointerTool) -> Self {
        self.tool = tool;
        self
    }

    pub fn with_button(mut self, button: i32) -> Self {
        self.button = button;
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.left, self.top)
    }

    pub fn is_up(&self) -> bool {
        self.action == PointerAction::PointerUp
    }
}

/// How a responder's involvement with a pointer changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResponderEventType {
    /// The element started being hit by the pointer
    Add,
    /// The element is still hit by the pointer
    Update,
    /// The element stopped being hit, or the pointer was lifted
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyEvent {
    /// Platform key code
    pub key: i32,
    pub action: KeyAction,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: i32, action: KeyAction) -> Self {
        Self { key, action, modifiers: Modifiers::default() }
    }
}

/// Scroll offsets reported by a wheel or trackpad.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollEvent {
    pub left: f32,
    pub top: f32,
}
