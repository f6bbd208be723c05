use arbor_core::{BoxConstraints, ElementId, Position, Size};
use arbor_text::{LineMetrics, TextBackend};

use crate::document::Document;
use crate::element::ElementBehavior;
use crate::inline_layout::{layout_lines, render_spans, ParagraphLine, Span};

/// Multi-line inline content.
///
/// Every layout flows the root span into lines. The generated child
/// elements that draw them are rebuilt only when the lines differ from the
/// previous layout, so responders keep their ids across relayouts.
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub root: Span,
    /// Floor for every line's metrics. Defaults to the line metrics of the
    /// document's default text style.
    pub metrics: Option<LineMetrics>,
    lines: Vec<ParagraphLine>,
}

impl Paragraph {
    pub fn new(root: impl Into<Span>) -> Self {
        Self { root: root.into(), metrics: None, lines: Vec::new() }
    }

    pub fn with_metrics(mut self, metrics: LineMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Lines from the last layout.
    pub fn lines(&self) -> &[ParagraphLine] {
        &self.lines
    }

    fn default_metrics(&self, doc: &Document, backend: &dyn TextBackend) -> LineMetrics {
        self.metrics
            .unwrap_or_else(|| backend.line_metrics(&doc.options().default_text_style))
    }

    /// Height of the paragraph laid out at `width`.
    pub(crate) fn intrinsic_height(&self, doc: &Document, width: f32) -> f32 {
        let backend = doc.text_backend();
        let lines = layout_lines(&self.root, width, &*backend, self.default_metrics(doc, &*backend));
        lines_height(&lines)
    }

    /// Width of the widest line when nothing wraps.
    pub(crate) fn intrinsic_width(&self, doc: &Document) -> f32 {
        let backend = doc.text_backend();
        let metrics = self.default_metrics(doc, &*backend);
        layout_lines(&self.root, f32::INFINITY, &*backend, metrics)
            .iter()
            .map(ParagraphLine::width)
            .fold(0.0, f32::max)
    }
}

fn lines_height(lines: &[ParagraphLine]) -> f32 {
    lines.last().map_or(0.0, |line| line.top + line.metrics.height)
}

impl ElementBehavior for Paragraph {
    fn name(&self) -> &'static str {
        "Paragraph"
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let backend = doc.text_backend();
        let metrics = self.default_metrics(doc, &*backend);
        let lines = layout_lines(&self.root, constraints.max_width, &*backend, metrics);
        let span_count: usize = lines.iter().map(|line| line.spans.len()).sum();
        if lines != self.lines || doc.child_ids(id).len() != span_count {
            let mut children = Vec::with_capacity(span_count);
            for line in &lines {
                children.extend(render_spans(
                    doc,
                    &line.spans,
                    line.metrics,
                    Position::new(0.0, line.top),
                ));
            }
            doc.replace_generated_children(id, children);
        }
        self.lines = lines;

        let width = if constraints.max_width.is_finite() {
            constraints.max_width
        } else {
            self.lines.iter().map(ParagraphLine::width).fold(0.0, f32::max)
        };
        let height = lines_height(&self.lines);
        let child_constraints = BoxConstraints::loose(Size::new(width, height));
        for child in doc.child_ids(id) {
            doc.layout_child(child, child_constraints);
            doc.set_rel_position(child, Position::ZERO);
        }
        constraints.constrain(Size::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ResponderHandler;
    use crate::inline_layout::{Decoration, DecorationSpan, ResponderSpan, TextSpan};
    use crate::test_utils::test_document;
    use arbor_core::{Color, PointerAction, PointerEvent, ResponderEventType};
    use arbor_text::TextStyle;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn hello_world() -> Paragraph {
        Paragraph::new(DecorationSpan::new(
            vec![
                TextSpan::new("Hello, ", TextStyle::with_size(10.0)).into(),
                TextSpan::new("World!", TextStyle::with_size(10.0)).into(),
            ],
            Decoration::default(),
        ))
    }

    #[test]
    fn test_wraps_into_lines() {
        let mut doc = test_document(Size::new(500.0, 500.0));
        let paragraph = doc.create(hello_world());
        let size = doc
            .layout_detached(paragraph, BoxConstraints::loose(Size::new(40.0, 100.0)))
            .unwrap();
        assert_eq!(size, Size::new(40.0, 20.0));

        let lines = doc.element(paragraph).unwrap().as_paragraph().unwrap().lines().len();
        assert_eq!(lines, 2);
        assert_eq!(doc.children_of(paragraph).unwrap().len(), 2);
    }

    #[test]
    fn test_relayout_replaces_generated_children() {
        let mut doc = test_document(Size::new(500.0, 500.0));
        let paragraph = doc.create(hello_world());
        doc.layout_detached(paragraph, BoxConstraints::loose(Size::new(40.0, 100.0)))
            .unwrap();
        let old_children = doc.children_of(paragraph).unwrap().to_vec();

        let size = doc
            .layout_detached(paragraph, BoxConstraints::loose(Size::new(200.0, 100.0)))
            .unwrap();
        assert_eq!(size, Size::new(200.0, 10.0));
        assert_eq!(doc.children_of(paragraph).unwrap().len(), 2);
        for child in old_children {
            assert!(doc.element(child).is_err());
        }
    }

    #[test]
    fn test_unchanged_lines_keep_responder_ids() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let events = log.clone();
        let handler: ResponderHandler = Rc::new(RefCell::new(
            move |_: &mut Document, _: &PointerEvent, event_type: ResponderEventType| {
                events.borrow_mut().push(event_type)
            },
        ));
        let span = ResponderSpan::new(TextSpan::new("Hello", TextStyle::with_size(10.0)), Some(handler));
        let paragraph = doc.create(Paragraph::new(span));
        doc.set_root(paragraph).unwrap();
        doc.render();
        let children = doc.children_of(paragraph).unwrap().to_vec();

        doc.handle_pointer_event(&PointerEvent::new(1, PointerAction::PointerMove, 5.0, 5.0));
        doc.change(paragraph).unwrap();
        assert!(doc.render());
        assert_eq!(doc.children_of(paragraph).unwrap(), &children[..]);

        doc.handle_pointer_event(&PointerEvent::new(1, PointerAction::PointerMove, 6.0, 5.0));
        use ResponderEventType::{Add, Update};
        assert_eq!(*log.borrow(), vec![Add, Update]);
    }

    #[test]
    fn test_unbounded_width_uses_longest_line() {
        let mut doc = test_document(Size::new(500.0, 500.0));
        let paragraph = doc.create(hello_world());
        let size = doc
            .layout_detached(paragraph, BoxConstraints::loose(Size::new(f32::INFINITY, 100.0)))
            .unwrap();
        assert_eq!(size, Size::new(65.0, 10.0));
        assert_eq!(doc.intrinsic_width(paragraph).unwrap(), 65.0);
        assert_eq!(doc.intrinsic_height(paragraph, 40.0).unwrap(), 20.0);
    }

    #[test]
    fn test_paints_decorated_text() {
        let mut doc = test_document(Size::new(100.0, 100.0));
        let span = DecorationSpan::new(
            vec![TextSpan::new("hi", TextStyle::with_size(10.0)).into()],
            Decoration { background: Some(Color::GREEN), ..Decoration::default() },
        );
        let paragraph = doc.create(Paragraph::new(span));
        doc.set_root(paragraph).unwrap();
        doc.render();

        let scene = doc.scene();
        let rect = scene.rects().next().unwrap();
        assert_eq!((rect.rect.width, rect.rect.height), (10.0, 10.0));
        assert_eq!(scene.texts().next().unwrap().text, "hi");
    }
}
