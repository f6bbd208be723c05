use arbor_core::{BoxConstraints, ElementId, Position, Size};
use glam::Affine2;

use crate::document::Document;
use crate::element::ElementBehavior;

/// A repaint boundary with its own transform and opacity.
///
/// Takes its child's natural size. Changing the transform or opacity
/// through the document recomposes the frame without repainting the
/// layer's content.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub transform: Affine2,
    pub opacity: f32,
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer {
    pub fn new() -> Self {
        Self { transform: Affine2::IDENTITY, opacity: 1.0 }
    }

    pub fn with_transform(mut self, transform: Affine2) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl ElementBehavior for Layer {
    fn name(&self) -> &'static str {
        "Layer"
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let Some(child) = doc.first_child(id) else {
            return constraints.min_size();
        };
        let child_size = doc.layout_child(child, constraints.make_loose());
        doc.set_rel_position(child, Position::ZERO);
        constraints.constrain(child_size)
    }
}
