use arbor_core::{BoxConstraints, ElementId, Position, Rect, Size};
use arbor_paint::{ClipPath, Radius};

use crate::document::Document;
use crate::element::ElementBehavior;

/// Shape a [`Clip`] cuts its child to, computed from the clip's own size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Clipper {
    /// The element's bounds
    #[default]
    Rect,
    /// The element's bounds with top-left, top-right, bottom-right and
    /// bottom-left radii
    RoundedRect([Radius; 4]),
}

impl Clipper {
    pub fn clip(&self, size: Size) -> ClipPath {
        let bounds = Rect::new(0.0, 0.0, size.width, size.height);
        match self {
            Clipper::Rect => ClipPath::rect(bounds),
            Clipper::RoundedRect(radii) => ClipPath::rounded_rect(bounds, *radii),
        }
    }
}

/// Fills the space offered and clips its child to its own bounds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Clip {
    pub clipper: Clipper,
}

impl Clip {
    pub fn new(clipper: Clipper) -> Self {
        Self { clipper }
    }
}

impl ElementBehavior for Clip {
    fn name(&self) -> &'static str {
        "Clip"
    }

    fn sized_by_constraints(&self, _has_child: bool) -> bool {
        true
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let size = constraints.max_size();
        if let Some(child) = doc.first_child(id) {
            doc.layout_child(child, constraints.make_loose());
            doc.set_rel_position(child, Position::ZERO);
            doc.set_clip(child, Some(self.clipper.clip(size)));
        }
        size
    }
}
