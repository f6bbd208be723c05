use std::rc::Rc;

use arbor_core::{BoxConstraints, ElementId, Size};
use arbor_paint::{Canvas, LinePrimitive, Stroke, TextPrimitive};
use arbor_text::TextStyle;
use glam::Vec2;

use crate::document::Document;
use crate::element::ElementBehavior;

/// A single line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    pub style: Rc<TextStyle>,
}

impl Text {
    pub fn new(text: impl Into<String>, style: impl Into<Rc<TextStyle>>) -> Self {
        Self { text: text.into(), style: style.into() }
    }
}

impl ElementBehavior for Text {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn layout(&mut self, doc: &mut Document, _id: ElementId, constraints: BoxConstraints) -> Size {
        let backend = doc.text_backend();
        let width = backend.measure_text_width(&self.text, &self.style, None);
        let metrics = backend.line_metrics(&self.style);
        constraints.constrain(Size::new(width, metrics.height))
    }

    fn paint(&self, doc: &mut Document, id: ElementId) {
        let metrics = doc.text_backend().line_metrics(&self.style);
        let width = doc.size_of(id).width;
        let text = self.text.clone();
        let style = Rc::clone(&self.style);
        doc.draw(id, move |canvas: &mut dyn Canvas| {
            canvas.draw_text(
                TextPrimitive::new(0.0, metrics.baseline, text)
                    .with_font(style.font_family.clone(), style.font_size)
                    .with_letter_spacing(style.letter_spacing)
                    .with_color(style.color),
            );
            let underline = metrics.baseline + 1.0;
            for decoration in &style.decorations {
                canvas.draw_line(LinePrimitive::new(
                    Vec2::new(0.0, underline),
                    Vec2::new(width, underline),
                    Stroke::new(decoration.color, decoration.thickness),
                ));
            }
        });
    }
}
