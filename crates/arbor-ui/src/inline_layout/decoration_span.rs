use arbor_core::{Color, EdgeInsets, ElementId, Position, Value};
use arbor_text::{LineMetrics, TextBackend};

use crate::document::Document;
use crate::elements::{Background, Border, BorderSide, BoxBorders, Padding, Stack};
use crate::inline_layout::{
    calc_combined_metrics, render_spans, InlineConstraints, InlineLayoutResult, LaidOutSpan,
    Span, SpanBase,
};

/// Background, borders and insets drawn around inline content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decoration {
    pub background: Option<Color>,
    pub borders: Option<BoxBorders>,
    pub insets: Option<EdgeInsets>,
}

impl Decoration {
    /// The part of a decoration left on a line when its content is split:
    /// no right border or inset.
    pub fn left(&self) -> Self {
        let mut decoration = self.clone();
        if let Some(borders) = &mut decoration.borders {
            borders.right = BorderSide::none();
        }
        if let Some(insets) = &mut decoration.insets {
            insets.right = Value::none();
        }
        decoration
    }

    /// The part of a decoration carried to the next line: no left border
    /// or inset.
    pub fn right(&self) -> Self {
        let mut decoration = self.clone();
        if let Some(borders) = &mut decoration.borders {
            borders.left = BorderSide::none();
        }
        if let Some(insets) = &mut decoration.insets {
            insets.left = Value::none();
        }
        decoration
    }

    /// Horizontal space taken before and after the content.
    pub fn paddings(&self, total_line_width: f32) -> (f32, f32) {
        let mut before = 0.0;
        let mut after = 0.0;
        if let Some(insets) = &self.insets {
            before += insets.left.calc(total_line_width);
            after += insets.right.calc(total_line_width);
        }
        if let Some(borders) = &self.borders {
            before += borders.left.width;
            after += borders.right.width;
        }
        (before, after)
    }

    /// Vertical space taken above and below the content.
    fn vertical_paddings(&self, content_height: f32) -> (f32, f32) {
        let mut above = 0.0;
        let mut below = 0.0;
        if let Some(insets) = &self.insets {
            above += insets.top.calc(content_height);
            below += insets.bottom.calc(content_height);
        }
        if let Some(borders) = &self.borders {
            above += borders.top.width;
            below += borders.bottom.width;
        }
        (above, below)
    }

    /// The same decoration with relative insets turned into pixels.
    fn resolve(&self, total_line_width: f32, content_height: f32) -> Self {
        let mut decoration = self.clone();
        if let Some(insets) = &mut decoration.insets {
            *insets = EdgeInsets::new(
                Value::abs(insets.left.calc(total_line_width)),
                Value::abs(insets.top.calc(content_height)),
                Value::abs(insets.right.calc(total_line_width)),
                Value::abs(insets.bottom.calc(content_height)),
            );
        }
        decoration
    }
}

/// Inline content wrapped in a [`Decoration`].
///
/// The decoration's vertical insets and borders are part of the span's
/// line metrics, so a decorated run makes its line taller instead of
/// overlapping the lines around it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecorationSpan {
    pub children: Vec<Span>,
    pub decoration: Decoration,
    pub base: SpanBase,
    laid_out: Vec<LaidOutSpan>,
}

impl DecorationSpan {
    pub fn new(children: Vec<Span>, decoration: Decoration) -> Self {
        Self { children, decoration, base: SpanBase::default(), laid_out: Vec::new() }
    }

    /// Children as placed by the last layout of this span.
    pub fn laid_out(&self) -> &[LaidOutSpan] {
        &self.laid_out
    }

    pub fn layout(
        &self,
        constraints: &InlineConstraints,
        backend: &dyn TextBackend,
    ) -> InlineLayoutResult {
        let (before, after) = self.decoration.paddings(constraints.total_line_width);
        let last = self.children.len().saturating_sub(1);
        let mut laid_out = Vec::new();
        let mut remaining = Vec::new();
        let mut fit_width = 0.0;

        for (index, child) in self.children.iter().enumerate() {
            if !remaining.is_empty() {
                remaining.push(child.clone());
                continue;
            }
            let own_before = if index == 0 { before } else { 0.0 };
            let own_after = if index == last { after } else { 0.0 };
            let outer_before = if index == 0 { constraints.padding_before } else { 0.0 };
            let outer_after = if index == last { constraints.padding_after } else { 0.0 };
            let consumed = if index == 0 { 0.0 } else { constraints.padding_before };
            let child_constraints = InlineConstraints {
                remaining_line_width: constraints.remaining_line_width - consumed - fit_width,
                total_line_width: constraints.total_line_width,
                padding_before: outer_before + own_before,
                padding_after: outer_after + own_after,
            };
            match child.layout(&child_constraints, backend) {
                InlineLayoutResult::Fit { width, metrics, span } => {
                    fit_width += own_before + width + own_after;
                    laid_out.push(LaidOutSpan { span, width, metrics });
                }
                InlineLayoutResult::Split { width, metrics, fit, remainder } => {
                    fit_width += own_before + width;
                    laid_out.push(LaidOutSpan { span: fit, width, metrics });
                    remaining.push(remainder);
                }
                InlineLayoutResult::Wrap { remainder } => remaining.push(remainder),
            }
        }

        if remaining.is_empty() {
            let (span, metrics) = self.laid_out_span(self.decoration.clone(), laid_out, constraints);
            return InlineLayoutResult::fit(fit_width, metrics, span);
        }
        if laid_out.is_empty() {
            return InlineLayoutResult::wrap(self.clone());
        }

        let fit_chars: usize = laid_out.iter().map(|child| child.span.text_len()).sum();
        let remainder = DecorationSpan {
            children: remaining,
            decoration: self.decoration.right(),
            base: SpanBase::new(self.base.prev_offset + fit_chars),
            laid_out: Vec::new(),
        };
        let (fit, metrics) = self.laid_out_span(self.decoration.left(), laid_out, constraints);
        InlineLayoutResult::split(fit_width, metrics, fit, remainder)
    }

    fn laid_out_span(
        &self,
        decoration: Decoration,
        laid_out: Vec<LaidOutSpan>,
        constraints: &InlineConstraints,
    ) -> (DecorationSpan, LineMetrics) {
        let content = calc_combined_metrics(&laid_out, LineMetrics::default());
        let (above, below) = decoration.vertical_paddings(content.height);
        let span = DecorationSpan {
            children: laid_out.iter().map(|child| child.span.clone()).collect(),
            decoration: decoration.resolve(constraints.total_line_width, content.height),
            base: self.base,
            laid_out,
        };
        (span, content.add(above, below))
    }

    pub(crate) fn render(&self, doc: &mut Document) -> ElementId {
        let content = calc_combined_metrics(&self.laid_out, LineMetrics::default());
        let children = render_spans(doc, &self.laid_out, content, Position::ZERO);
        let mut container = doc.create_generated(Stack::new(), &children);
        if let Some(insets) = self.decoration.insets {
            container = doc.create_generated(Padding::new(insets), &[container]);
        }
        if let Some(color) = self.decoration.background {
            container = doc.create_generated(Background::new(color), &[container]);
        }
        if let Some(borders) = self.decoration.borders {
            container = doc.create_generated(Border::new(borders), &[container]);
        }
        container
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline_layout::TextSpan;
    use crate::test_utils::test_backend;
    use arbor_text::TextStyle;

    fn decoration() -> Decoration {
        Decoration {
            background: Some(Color::RED),
            borders: Some(BoxBorders {
                top: BorderSide::new(1.0, Color::RED),
                right: BorderSide::new(2.0, Color::RED),
                bottom: BorderSide::new(3.0, Color::BLUE),
                left: BorderSide::new(4.0, Color::BLUE),
            }),
            insets: Some(EdgeInsets::new(
                Value::abs(1.0),
                Value::abs(2.0),
                Value::abs(3.0),
                Value::abs(4.0),
            )),
        }
    }

    fn text(text: &str) -> Span {
        TextSpan::new(text, TextStyle::with_size(10.0)).into()
    }

    #[test]
    fn test_left_and_right_parts() {
        let left = decoration().left();
        assert_eq!(left.background, Some(Color::RED));
        assert_eq!(left.borders.unwrap().left.width, 4.0);
        assert_eq!(left.borders.unwrap().right.width, 0.0);
        assert_eq!(left.insets.unwrap().left, Value::abs(1.0));
        assert!(left.insets.unwrap().right.is_none());

        let right = decoration().right();
        assert_eq!(right.borders.unwrap().left.width, 0.0);
        assert_eq!(right.borders.unwrap().right.width, 2.0);
        assert!(right.insets.unwrap().left.is_none());
        assert_eq!(right.insets.unwrap().right, Value::abs(3.0));
    }

    #[test]
    fn test_paddings() {
        assert_eq!(decoration().paddings(100.0), (5.0, 5.0));
        assert_eq!(Decoration::default().paddings(100.0), (0.0, 0.0));
    }

    #[test]
    fn test_fit_includes_paddings_and_vertical_extents() {
        let backend = test_backend();
        let span = DecorationSpan::new(vec![text("ab"), text("cd")], decoration());
        match span.layout(&InlineConstraints::new(100.0, 100.0), &*backend) {
            InlineLayoutResult::Fit { width, metrics, span } => {
                assert_eq!(width, 30.0);
                assert_eq!(metrics, LineMetrics::new(20.0, 11.0, 0.0));
                let Span::Decoration(span) = span else { panic!("expected decoration") };
                assert_eq!(span.laid_out().len(), 2);
            }
            other => panic!("expected fit, got {other:?}"),
        }
    }

    #[test]
    fn test_split_moves_remaining_children() {
        let backend = test_backend();
        let span = DecorationSpan::new(vec![text("ab "), text("cd ef")], decoration());
        // "ab cd " takes 35px with the left padding; "ef" plus the right padding does not fit
        match span.layout(&InlineConstraints::new(38.0, 100.0), &*backend) {
            InlineLayoutResult::Split { width, fit, remainder, .. } => {
                assert_eq!(width, 35.0);
                assert_eq!(fit.text(), "ab cd ");
                assert_eq!(remainder.text(), "ef");
                assert_eq!(remainder.base().prev_offset, 6);
                let Span::Decoration(fit) = fit else { panic!("expected decoration") };
                assert_eq!(fit.decoration.borders.unwrap().right.width, 0.0);
                let Span::Decoration(remainder) = remainder else { panic!("expected decoration") };
                assert_eq!(remainder.decoration.borders.unwrap().left.width, 0.0);
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn test_wraps_when_nothing_fits() {
        let backend = test_backend();
        let span = DecorationSpan::new(vec![text("abc")], decoration());
        let result = span.layout(&InlineConstraints::new(10.0, 100.0), &*backend);
        assert!(matches!(result, InlineLayoutResult::Wrap { .. }));
    }
}
