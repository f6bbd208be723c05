//! Error types for Arbor.
//!
//! Contract violations inside layout and paint (a size outside its
//! constraints, a paint cache replayed out of step) are assertions, not
//! errors; only conditions a caller can act on are represented here.

use crate::id::ElementId;
use thiserror::Error;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum ArborError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Image(#[from] ImageError),
}

pub type Result<T> = std::result::Result<T, ArborError>;

/// Errors from element tree mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Element {0} does not exist or was destroyed")]
    StaleElement(ElementId),

    #[error("Element {child} is already attached to {parent}")]
    AlreadyAttached { child: ElementId, parent: ElementId },

    #[error("Element {child} is not a child of {parent}")]
    NotAChild { child: ElementId, parent: ElementId },

    #[error("Attaching {ancestor} under {descendant} would create a cycle")]
    Cycle { ancestor: ElementId, descendant: ElementId },

    #[error("Element {0} is the document root and cannot be attached elsewhere")]
    IsRoot(ElementId),

    #[error("Element {0} is not a layer")]
    NotALayer(ElementId),
}

/// Errors from the text backend.
#[derive(Debug, Error, PartialEq)]
pub enum TextError {
    #[error("Invalid font size {0}: must be finite and positive")]
    InvalidFontSize(f32),

    #[error("Invalid text backend configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Errors loading image data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Could not decode image: {reason}")]
    Decode { reason: String },

    #[error("Pixel buffer of {len} bytes does not match {width}x{height} RGBA")]
    BufferSize { width: u32, height: u32, len: usize },
}

/// Errors in document configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid viewport {width}x{height}: dimensions must be finite and non-negative")]
    InvalidViewport { width: f32, height: f32 },

    #[error("Invalid default text style: {0}")]
    InvalidTextStyle(#[source] TextError),
}
