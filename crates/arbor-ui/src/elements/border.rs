use arbor_core::{BoxConstraints, Color, ElementId, Position, Rect, Size};
use arbor_paint::{add_rounded_rect, Canvas, ClipPath, PathPrimitive, Radius, RectPrimitive};
use lyon::path::{FillRule, Path};

use crate::document::Document;
use crate::element::ElementBehavior;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSide {
    pub width: f32,
    pub color: Color,
}

impl Default for BorderSide {
    fn default() -> Self {
        Self::none()
    }
}

impl BorderSide {
    pub const fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }

    pub const fn none() -> Self {
        Self { width: 0.0, color: Color::BLACK }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxBorders {
    pub top: BorderSide,
    pub right: BorderSide,
    pub bottom: BorderSide,
    pub left: BorderSide,
}

impl BoxBorders {
    pub const fn all(side: BorderSide) -> Self {
        Self { top: side, right: side, bottom: side, left: side }
    }

    pub fn horiz(&self) -> f32 {
        self.left.width + self.right.width
    }

    pub fn vert(&self) -> f32 {
        self.top.width + self.bottom.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxRadiuses {
    pub top_left: Radius,
    pub top_right: Radius,
    pub bottom_right: Radius,
    pub bottom_left: Radius,
}

impl BoxRadiuses {
    pub const fn all(radius: Radius) -> Self {
        Self { top_left: radius, top_right: radius, bottom_right: radius, bottom_left: radius }
    }

    pub fn is_square(&self) -> bool {
        self.to_array().iter().all(Radius::is_zero)
    }

    /// Top-left, top-right, bottom-right, bottom-left.
    pub fn to_array(&self) -> [Radius; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }

    /// Radii of the edge of the content box inside the borders.
    pub fn inner(&self, borders: &BoxBorders) -> Self {
        let shrink = |radius: Radius, horiz: f32, vert: f32| {
            if radius.width <= horiz || radius.height <= vert {
                Radius::ZERO
            } else {
                Radius::new(radius.width - horiz, radius.height - vert)
            }
        };
        Self {
            top_left: shrink(self.top_left, borders.left.width, borders.top.width),
            top_right: shrink(self.top_right, borders.right.width, borders.top.width),
            bottom_right: shrink(self.bottom_right, borders.right.width, borders.bottom.width),
            bottom_left: shrink(self.bottom_left, borders.left.width, borders.bottom.width),
        }
    }
}

/// Draws borders around a child, growing the child's size by their widths.
///
/// With rounded corners the child is clipped to the inner rounded box and
/// the border is painted as a single ring in the top side's color.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Border {
    pub borders: BoxBorders,
    pub radiuses: BoxRadiuses,
}

impl Border {
    pub fn new(borders: BoxBorders) -> Self {
        Self { borders, radiuses: BoxRadiuses::default() }
    }

    pub fn with_radiuses(mut self, radiuses: BoxRadiuses) -> Self {
        self.radiuses = radiuses;
        self
    }

    fn paint_square(&self, canvas: &mut dyn Canvas, size: Size) {
        let BoxBorders { top, right, bottom, left } = self.borders;
        let inner_height = size.height - top.width - bottom.width;
        let sides = [
            (top, Rect::new(0.0, 0.0, size.width, top.width)),
            (right, Rect::new(size.width - right.width, top.width, right.width, inner_height)),
            (bottom, Rect::new(0.0, size.height - bottom.width, size.width, bottom.width)),
            (left, Rect::new(0.0, top.width, left.width, inner_height)),
        ];
        for (side, rect) in sides {
            if side.width <= 0.0 {
                continue;
            }
            canvas.draw_rect(
                RectPrimitive::new(rect.left, rect.top, rect.width, rect.height)
                    .with_fill(side.color),
            );
        }
    }

    fn paint_rounded(&self, canvas: &mut dyn Canvas, size: Size) {
        let BoxBorders { top, right, bottom, left } = self.borders;
        let mut builder = Path::builder();
        add_rounded_rect(
            &mut builder,
            &Rect::new(0.0, 0.0, size.width, size.height),
            &self.radiuses.to_array(),
        );
        add_rounded_rect(
            &mut builder,
            &Rect::new(
                left.width,
                top.width,
                size.width - left.width - right.width,
                size.height - top.width - bottom.width,
            ),
            &self.radiuses.inner(&self.borders).to_array(),
        );
        canvas.draw_path(
            PathPrimitive::new(builder.build())
                .with_fill_rule(FillRule::EvenOdd)
                .with_fill(top.color),
        );
    }
}

impl ElementBehavior for Border {
    fn name(&self) -> &'static str {
        "Border"
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let horiz = self.borders.horiz();
        let vert = self.borders.vert();
        let Some(child) = doc.first_child(id) else {
            return constraints.constrain(Size::new(horiz, vert));
        };
        let child_size = doc.layout_child(child, constraints.deflate(horiz, vert));
        doc.set_rel_position(child, Position::new(self.borders.left.width, self.borders.top.width));
        let clip = (!self.radiuses.is_square()).then(|| {
            ClipPath::rounded_rect(
                Rect::new(0.0, 0.0, child_size.width, child_size.height),
                self.radiuses.inner(&self.borders).to_array(),
            )
        });
        doc.set_clip(child, clip);
        constraints.constrain(Size::new(child_size.width + horiz, child_size.height + vert))
    }

    fn paint(&self, doc: &mut Document, id: ElementId) {
        for child in doc.child_ids(id) {
            doc.paint_element(child);
        }
        let size = doc.size_of(id);
        let border = self.clone();
        doc.draw(id, move |canvas: &mut dyn Canvas| {
            if border.radiuses.is_square() {
                border.paint_square(canvas, size);
            } else {
                border.paint_rounded(canvas, size);
            }
        });
    }
}
