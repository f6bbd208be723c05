//! Render primitives.
//!
//! Coordinates are local to whatever transform is current on the canvas
//! when the command is issued.

use arbor_core::{Color, Rect};
use glam::{Affine2, Vec2};
use lyon::path::{FillRule, Path};

use crate::clip::ClipPath;
use crate::raster::ImagePrimitive;

/// A single drawing command.
#[derive(Debug, Clone)]
pub enum RenderCommand {
    /// Draw a rectangle
    Rect(RectPrimitive),
    /// Draw an arbitrary path
    Path(PathPrimitive),
    /// Draw a straight line
    Line(LinePrimitive),
    /// Draw a run of text
    Text(TextPrimitive),
    /// Draw a raster image
    Image(ImagePrimitive),
    /// Intersect the clip with a path until the matching `PopClip`
    PushClip(ClipPath),
    PopClip,
    /// Concatenate a transform until the matching `PopTransform`
    PushTransform(Affine2),
    PopTransform,
    /// Multiply opacity until the matching `PopOpacity`
    PushOpacity(f32),
    PopOpacity,
}

/// Stroke style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectPrimitive {
    pub rect: Rect,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl RectPrimitive {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(left, top, width, height),
            fill: None,
            stroke: None,
        }
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

#[derive(Debug, Clone)]
pub struct PathPrimitive {
    pub path: Path,
    pub fill_rule: FillRule,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl PathPrimitive {
    pub fn new(path: Path) -> Self {
        Self {
            path,
            fill_rule: FillRule::NonZero,
            fill: None,
            stroke: None,
        }
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinePrimitive {
    pub from: Vec2,
    pub to: Vec2,
    pub stroke: Stroke,
}

impl LinePrimitive {
    pub fn new(from: Vec2, to: Vec2, stroke: Stroke) -> Self {
        Self { from, to, stroke }
    }
}

/// A run of text drawn on a single line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub left: f32,
    /// Y coordinate of the baseline
    pub baseline: f32,
    pub text: String,
    pub font_family: String,
    pub font_size: f32,
    pub letter_spacing: f32,
    pub color: Color,
}

impl TextPrimitive {
    pub fn new(left: f32, baseline: f32, text: impl Into<String>) -> Self {
        Self {
            left,
            baseline,
            text: text.into(),
            font_family: "sans-serif".to_string(),
            font_size: 16.0,
            letter_spacing: 0.0,
            color: Color::BLACK,
        }
    }

    pub fn with_font(mut self, family: impl Into<String>, size: f32) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self
    }

    pub fn with_letter_spacing(mut self, letter_spacing: f32) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}
