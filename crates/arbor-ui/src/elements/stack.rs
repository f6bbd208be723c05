use arbor_core::{BoxConstraints, ElementId, Position, Size};
use smallvec::SmallVec;

use crate::document::Document;
use crate::element::ElementBehavior;
use crate::pointer_events::HitTestMode;

/// Overlaps its children at the origin and fills the space it is offered.
///
/// Floating children are laid out last, bounded by the largest of the
/// other children.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    /// Lay children out with zero minimums
    pub loosen_constraints: bool,
    floating: SmallVec<[ElementId; 2]>,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    pub fn new() -> Self {
        Self { loosen_constraints: true, floating: SmallVec::new() }
    }

    pub fn with_loosen_constraints(mut self, loosen_constraints: bool) -> Self {
        self.loosen_constraints = loosen_constraints;
        self
    }

    pub fn set_floating(&mut self, child: ElementId, floating: bool) {
        self.floating.retain(|id| *id != child);
        if floating {
            self.floating.push(child);
        }
    }

    pub fn is_floating(&self, child: ElementId) -> bool {
        self.floating.contains(&child)
    }
}

impl ElementBehavior for Stack {
    fn name(&self) -> &'static str {
        "Stack"
    }

    fn sized_by_constraints(&self, _has_child: bool) -> bool {
        true
    }

    fn hit_test_mode(&self) -> HitTestMode {
        HitTestMode::Disabled
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let child_constraints =
            if self.loosen_constraints { constraints.make_loose() } else { constraints };
        let mut max_width = 0.0f32;
        let mut max_height = 0.0f32;
        let mut floating = SmallVec::<[ElementId; 2]>::new();
        for child in doc.child_ids(id) {
            if self.is_floating(child) {
                floating.push(child);
                continue;
            }
            let size = doc.layout_child(child, child_constraints);
            doc.set_rel_position(child, Position::ZERO);
            max_width = max_width.max(size.width);
            max_height = max_height.max(size.height);
        }

        if !floating.is_empty() {
            let floating_constraints = BoxConstraints::new(
                child_constraints.min_width.min(max_width),
                max_width,
                child_constraints.min_height.min(max_height),
                max_height,
            );
            for child in floating {
                doc.layout_child(child, floating_constraints);
                doc.set_rel_position(child, Position::ZERO);
            }
        }
        constraints.max_size()
    }
}
