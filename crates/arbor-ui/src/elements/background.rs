use arbor_core::{BoxConstraints, Color, ElementId, Position, Size};
use arbor_paint::{Canvas, RectPrimitive};

use crate::document::Document;
use crate::element::ElementBehavior;

/// Solid fill behind or in front of an optional child.
///
/// Without a child the background fills its constraints. With one it
/// takes the child's size.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub color: Color,
    /// Paint the fill after the child instead of before it
    pub after: bool,
}

impl Background {
    pub fn new(color: Color) -> Self {
        Self { color, after: false }
    }

    pub fn with_after(mut self, after: bool) -> Self {
        self.after = after;
        self
    }

    fn paint_fill(&self, doc: &mut Document, id: ElementId) {
        let size = doc.size_of(id);
        let color = self.color;
        doc.draw(id, move |canvas: &mut dyn Canvas| {
            canvas.draw_rect(RectPrimitive::new(0.0, 0.0, size.width, size.height).with_fill(color));
        });
    }
}

impl ElementBehavior for Background {
    fn name(&self) -> &'static str {
        "Background"
    }

    fn sized_by_constraints(&self, has_child: bool) -> bool {
        !has_child
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let Some(child) = doc.first_child(id) else {
            return constraints.max_size();
        };
        let child_size = doc.layout_child(child, constraints);
        doc.set_rel_position(child, Position::ZERO);
        constraints.constrain(child_size)
    }

    fn paint(&self, doc: &mut Document, id: ElementId) {
        if !self.after {
            self.paint_fill(doc, id);
        }
        for child in doc.child_ids(id) {
            doc.paint_element(child);
        }
        if self.after {
            self.paint_fill(doc, id);
        }
    }
}
