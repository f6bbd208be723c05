use arbor_core::{BoxConstraints, ElementId, Position, Size, Value};

use crate::document::Document;
use crate::element::ElementBehavior;

/// Own size limits of a [`SizedBox`]. Unset values impose nothing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeConstraints {
    pub width: Value,
    pub height: Value,
    pub min_width: Value,
    pub max_width: Value,
    pub min_height: Value,
    pub max_height: Value,
}

impl SizeConstraints {
    pub fn exact(width: Value, height: Value) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn with_min(mut self, min_width: Value, min_height: Value) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    pub fn with_max(mut self, max_width: Value, max_height: Value) -> Self {
        self.max_width = max_width;
        self.max_height = max_height;
        self
    }

    /// Combine with the parent's constraints.
    ///
    /// The effective minimum is the largest lower bound, the effective
    /// maximum the smallest upper bound. The parent's bounds always win.
    pub fn resolve(&self, parent: &BoxConstraints) -> BoxConstraints {
        let (min_width, max_width) = resolve_axis(
            [self.min_width, self.width],
            [self.max_width, self.width],
            parent.min_width,
            parent.max_width,
        );
        let (min_height, max_height) = resolve_axis(
            [self.min_height, self.height],
            [self.max_height, self.height],
            parent.min_height,
            parent.max_height,
        );
        BoxConstraints::new(min_width, max_width, min_height, max_height)
    }
}

fn resolve_axis(
    lower: [Value; 2],
    upper: [Value; 2],
    parent_min: f32,
    parent_max: f32,
) -> (f32, f32) {
    let max = upper
        .iter()
        .filter(|value| !value.is_none())
        .fold(parent_max, |max, value| max.min(value.calc(parent_max)))
        .max(parent_min);
    let min = lower
        .iter()
        .filter(|value| !value.is_none())
        .fold(parent_min, |min, value| min.max(value.calc(parent_max)))
        .min(max);
    (min, max)
}

/// Sizes its child within its own limits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SizedBox {
    pub size: SizeConstraints,
}

impl SizedBox {
    pub fn new(size: SizeConstraints) -> Self {
        Self { size }
    }

    pub fn exact(width: Value, height: Value) -> Self {
        Self::new(SizeConstraints::exact(width, height))
    }
}

impl ElementBehavior for SizedBox {
    fn name(&self) -> &'static str {
        "Sized"
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let resolved = self.size.resolve(&constraints);
        let Some(child) = doc.first_child(id) else {
            return resolved.min_size();
        };
        let child_size = doc.layout_child(child, resolved);
        doc.set_rel_position(child, Position::ZERO);
        resolved.constrain(child_size)
    }
}
