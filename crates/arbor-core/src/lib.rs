//! Core types for the Arbor retained-mode scene graph.
//!
//! This crate holds the value types shared by every other Arbor crate:
//!
//! - [`geometry`]: lengths, sizes, positions and box constraints
//! - [`color`]: RGBA colors
//! - [`id`]: generational element handles
//! - [`events`]: pointer, key and scroll input events
//! - [`errors`]: the error taxonomy
//!
//! Nothing here depends on the element tree or on a drawing backend.

pub mod color;
pub mod errors;
pub mod events;
pub mod geometry;
pub mod id;

pub use color::Color;
pub use errors::{ArborError, ConfigError, ImageError, Result, TextError, TreeError};
pub use events::{
    KeyAction, KeyEvent, Modifiers, PointerAction, PointerEvent, PointerTool,
    ResponderEventType, ScrollEvent,
};
pub use geometry::{BoxConstraints, EdgeInsets, Position, Rect, Size, Value};
pub use id::ElementId;
