//! Drawing surface abstraction for Arbor.
//!
//! Elements never talk to a graphics backend directly. They draw into a
//! [`Canvas`], which is either the frame's [`Scene`] or a
//! [`PictureRecorder`] capturing a replayable [`Picture`].
//!
//! # Architecture
//!
//! 1. **Primitives**: rectangles, paths, lines, text runs and images
//! 2. **Canvas**: the drawing capability plus clip/transform/opacity stacks
//! 3. **Paint cache**: per repaint boundary recording and positional replay
//! 4. **Clip paths**: rectangle and rounded-rectangle clips with hit testing

mod canvas;
mod clip;
mod raster;
mod paint_cache;
mod primitives;

pub use canvas::{Canvas, Picture, PictureRecorder, Scene};
pub use clip::{add_rounded_rect, ClipPath, ClipShape, Radius};
pub use raster::{ImageData, ImagePrimitive};
pub use paint_cache::PaintCache;
pub use primitives::{
    LinePrimitive, PathPrimitive, RectPrimitive, RenderCommand, Stroke, TextPrimitive,
};
