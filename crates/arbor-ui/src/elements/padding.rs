use arbor_core::{BoxConstraints, EdgeInsets, ElementId, Position, Size};

use crate::document::Document;
use crate::element::ElementBehavior;

/// Shrinks its child's constraints by the insets and grows the child's
/// size back by the same amounts.
///
/// Insets are resolved against the maximums of the incoming constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Padding {
    pub insets: EdgeInsets,
}

impl Padding {
    pub fn new(insets: EdgeInsets) -> Self {
        Self { insets }
    }
}

impl ElementBehavior for Padding {
    fn name(&self) -> &'static str {
        "Padding"
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let left = self.insets.left.calc(constraints.max_width);
        let right = self.insets.right.calc(constraints.max_width);
        let top = self.insets.top.calc(constraints.max_height);
        let bottom = self.insets.bottom.calc(constraints.max_height);

        let Some(child) = doc.first_child(id) else {
            return constraints.constrain(Size::new(left + right, top + bottom));
        };
        let child_size = doc.layout_child(child, constraints.deflate(left + right, top + bottom));
        doc.set_rel_position(child, Position::new(left, top));
        constraints.constrain(Size::new(
            child_size.width + left + right,
            child_size.height + top + bottom,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::SizedBox;
    use crate::test_utils::test_document;
    use arbor_core::Value;

    #[test]
    fn test_wraps_child() {
        let mut doc = test_document(Size::new(500.0, 500.0));
        let child = doc.create(SizedBox::exact(Value::abs(50.0), Value::abs(20.0)));
        let padding = doc
            .create_with_child(
                Padding::new(EdgeInsets::new(
                    Value::abs(1.0),
                    Value::abs(2.0),
                    Value::abs(3.0),
                    Value::abs(4.0),
                )),
                child,
            )
            .unwrap();
        let size = doc.layout_detached(padding, BoxConstraints::loose(Size::new(200.0, 200.0))).unwrap();
        assert_eq!(size, Size::new(54.0, 26.0));
        assert_eq!(doc.rel_position(child).unwrap(), Position::new(1.0, 2.0));
    }

    #[test]
    fn test_child_constraints_shrink() {
        let mut doc = test_document(Size::new(500.0, 500.0));
        let child = doc.create(crate::elements::Stack::new());
        let padding = doc
            .create_with_child(Padding::new(EdgeInsets::all(Value::rel(0.1))), child)
            .unwrap();
        let size = doc.layout_detached(padding, BoxConstraints::tight(Size::new(100.0, 50.0))).unwrap();
        assert_eq!(size, Size::new(100.0, 50.0));
        let child_size = doc.size(child).unwrap();
        assert!((child_size.width - 80.0).abs() < 0.001);
        assert!((child_size.height - 40.0).abs() < 0.001);
    }
}
