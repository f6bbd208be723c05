use arbor_core::{BoxConstraints, ElementId, Position, Size, Value};

use crate::document::Document;
use crate::element::ElementBehavior;
use crate::pointer_events::HitTestMode;

/// Offset of a [`Translated`] child, resolved against the child's own size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Translation {
    pub left: Value,
    pub top: Value,
}

impl Translation {
    pub fn new(left: Value, top: Value) -> Self {
        Self { left, top }
    }
}

/// Shifts its child without changing the constraints it is laid out with.
///
/// The element reports the child's size grown (or shrunk) by the shift, so
/// a child moved right or down takes up more room in its parent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Translated {
    pub translation: Translation,
}

impl Translated {
    pub fn new(translation: Translation) -> Self {
        Self { translation }
    }
}

impl ElementBehavior for Translated {
    fn name(&self) -> &'static str {
        "Translated"
    }

    fn hit_test_mode(&self) -> HitTestMode {
        HitTestMode::Disabled
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let Some(child) = doc.first_child(id) else {
            return constraints.min_size();
        };
        let child_size = doc.layout_child(child, constraints);
        let left = self.translation.left.calc(child_size.width);
        let top = self.translation.top.calc(child_size.height);
        doc.set_rel_position(child, Position::new(left, top));
        constraints.constrain(Size::new(
            (child_size.width + left).max(0.0),
            (child_size.height + top).max(0.0),
        ))
    }
}
