//! Geometry primitives used by layout.
//!
//! All coordinates are in logical pixels, with the origin at the top-left
//! corner and the y axis pointing down.

use std::ops::{Add, Sub};

/// A length that is absolute, relative to a parent dimension, or unset.
///
/// The distinction between [`Value::None`] and `Value::Abs(0.0)` matters:
/// alignment treats an unset leading inset as "align to the trailing edge".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Unset
    #[default]
    None,
    /// Fixed length in pixels
    Abs(f32),
    /// Fraction of the total dimension
    Rel(f32),
}

impl Value {
    pub const fn abs(value: f32) -> Self {
        Value::Abs(value)
    }

    pub const fn rel(fraction: f32) -> Self {
        Value::Rel(fraction)
    }

    pub const fn none() -> Self {
        Value::None
    }

    /// Resolve this value against `total`. Unset values resolve to zero.
    pub fn calc(self, total: f32) -> f32 {
        match self {
            Value::None => 0.0,
            Value::Abs(value) => value,
            Value::Rel(fraction) => fraction * total,
        }
    }

    pub fn is_none(self) -> bool {
        matches!(self, Value::None)
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns true if the point (in the size's own coordinates) lies inside.
    pub fn contains(&self, left: f32, top: f32) -> bool {
        left >= 0.0 && left <= self.width && top >= 0.0 && top <= self.height
    }
}

/// A position relative to some origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub left: f32,
    pub top: f32,
}

impl Position {
    pub const ZERO: Position = Position { left: 0.0, top: 0.0 };

    pub const fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.left + rhs.left, self.top + rhs.top)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.left - rhs.left, self.top - rhs.top)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    pub fn from_position_size(position: Position, size: Size) -> Self {
        Self::new(position.left, position.top, size.width, size.height)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn contains(&self, point: Position) -> bool {
        point.left >= self.left
            && point.left <= self.right()
            && point.top >= self.top
            && point.top <= self.bottom()
    }

    /// Intersection of two rectangles. Disjoint rectangles yield an empty rect.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Layout constraints passed from a parent to a child.
///
/// Invariant: `min_width <= max_width` and `min_height <= max_height`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxConstraints {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl BoxConstraints {
    pub const fn new(min_width: f32, max_width: f32, min_height: f32, max_height: f32) -> Self {
        Self { min_width, max_width, min_height, max_height }
    }

    /// Constraints that only allow exactly `size`.
    pub fn tight(size: Size) -> Self {
        Self::new(size.width, size.width, size.height, size.height)
    }

    /// Constraints that allow anything from zero up to `size`.
    pub fn loose(size: Size) -> Self {
        Self::new(0.0, size.width, 0.0, size.height)
    }

    /// Same maximums, minimums forced to zero.
    pub fn make_loose(&self) -> Self {
        Self::new(0.0, self.max_width, 0.0, self.max_height)
    }

    pub fn is_tight(&self) -> bool {
        self.min_width == self.max_width && self.min_height == self.max_height
    }

    pub fn max_size(&self) -> Size {
        Size::new(self.max_width, self.max_height)
    }

    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    /// Clamp `size` into these constraints.
    pub fn constrain(&self, size: Size) -> Size {
        Size::new(
            size.width.max(self.min_width).min(self.max_width),
            size.height.max(self.min_height).min(self.max_height),
        )
    }

    pub fn is_satisfied_by(&self, size: Size) -> bool {
        size.width >= self.min_width
            && size.width <= self.max_width
            && size.height >= self.min_height
            && size.height <= self.max_height
    }

    /// Shrink both bounds by the given amounts, never below zero and never
    /// letting the minimum exceed the maximum.
    pub fn deflate(&self, horiz: f32, vert: f32) -> Self {
        let max_width = (self.max_width - horiz).max(0.0);
        let max_height = (self.max_height - vert).max(0.0);
        Self::new(
            (self.min_width - horiz).max(0.0).min(max_width),
            max_width,
            (self.min_height - vert).max(0.0).min(max_height),
            max_height,
        )
    }
}

/// Per-edge insets, each resolved against the matching parent dimension.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeInsets {
    pub left: Value,
    pub top: Value,
    pub right: Value,
    pub bottom: Value,
}

impl EdgeInsets {
    pub const fn new(left: Value, top: Value, right: Value, bottom: Value) -> Self {
        Self { left, top, right, bottom }
    }

    pub const fn all(value: Value) -> Self {
        Self::new(value, value, value, value)
    }

    /// Insets from the leading edges; trailing edges unset.
    pub const fn left_top(left: Value, top: Value) -> Self {
        Self::new(left, top, Value::None, Value::None)
    }

    /// Insets from the trailing edges; leading edges unset.
    pub const fn right_bottom(right: Value, bottom: Value) -> Self {
        Self::new(Value::None, Value::None, right, bottom)
    }

    pub const fn symmetric(horiz: Value, vert: Value) -> Self {
        Self::new(horiz, vert, horiz, vert)
    }

    /// Sum of the resolved left and right insets.
    pub fn horiz(&self, total: f32) -> f32 {
        self.left.calc(total) + self.right.calc(total)
    }

    /// Sum of the resolved top and bottom insets.
    pub fn vert(&self, total: f32) -> f32 {
        self.top.calc(total) + self.bottom.calc(total)
    }
}
