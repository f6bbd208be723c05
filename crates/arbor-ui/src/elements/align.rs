use arbor_core::{BoxConstraints, EdgeInsets, ElementId, Position, Size, Value};

use crate::document::Document;
use crate::element::ElementBehavior;
use crate::pointer_events::HitTestMode;

/// Positions its child by per-edge insets and fills the space it is offered.
///
/// A set leading inset (left or top) places the child at that offset. When
/// only the trailing inset is set, the child is placed against the trailing
/// edge. With neither set the child sits at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Align {
    pub insets: EdgeInsets,
    /// Shrink the child's constraints by the insets
    pub adjust_child: bool,
}

impl Align {
    pub fn new(insets: EdgeInsets) -> Self {
        Self { insets, adjust_child: true }
    }

    pub fn with_adjust_child(mut self, adjust_child: bool) -> Self {
        self.adjust_child = adjust_child;
        self
    }
}

/// Offset of a child of length `child` along an axis of length `total`.
fn align_offset(leading: Value, trailing: Value, total: f32, child: f32) -> f32 {
    if !leading.is_none() {
        leading.calc(total)
    } else if !trailing.is_none() {
        total - trailing.calc(total) - child
    } else {
        0.0
    }
}

impl ElementBehavior for Align {
    fn name(&self) -> &'static str {
        "Align"
    }

    fn sized_by_constraints(&self, _has_child: bool) -> bool {
        true
    }

    fn hit_test_mode(&self) -> HitTestMode {
        HitTestMode::Disabled
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let Some(child) = doc.first_child(id) else {
            return constraints.max_size();
        };
        let child_constraints = if self.adjust_child {
            constraints.make_loose().deflate(
                self.insets.horiz(constraints.max_width),
                self.insets.vert(constraints.max_height),
            )
        } else {
            constraints
        };
        let child_size = doc.layout_child(child, child_constraints);
        let left = align_offset(
            self.insets.left,
            self.insets.right,
            constraints.max_width,
            child_size.width,
        );
        let top = align_offset(
            self.insets.top,
            self.insets.bottom,
            constraints.max_height,
            child_size.height,
        );
        doc.set_rel_position(child, Position::new(left, top));
        constraints.max_size()
    }
}
