use arbor_core::{BoxConstraints, ElementId, Position, Size};

use crate::document::Document;
use crate::element::ElementBehavior;

/// Lets its child grow past the space the element itself is given.
///
/// The child's maximums are replaced by the given limits, when set. The
/// element's own size stays within its constraints; the child is painted
/// and hit tested at its full size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overflow {
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
}

impl Overflow {
    pub fn new(max_width: Option<f32>, max_height: Option<f32>) -> Self {
        Self { max_width, max_height }
    }

    /// Lift both limits.
    pub fn unbounded() -> Self {
        Self::new(Some(f32::INFINITY), Some(f32::INFINITY))
    }
}

impl ElementBehavior for Overflow {
    fn name(&self) -> &'static str {
        "Overflow"
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let Some(child) = doc.first_child(id) else {
            return constraints.min_size();
        };
        let max_width = self.max_width.unwrap_or(constraints.max_width);
        let max_height = self.max_height.unwrap_or(constraints.max_height);
        let child_constraints = BoxConstraints::new(
            constraints.min_width.min(max_width),
            max_width,
            constraints.min_height.min(max_height),
            max_height,
        );
        let child_size = doc.layout_child(child, child_constraints);
        doc.set_rel_position(child, Position::ZERO);
        constraints.constrain(child_size)
    }
}
