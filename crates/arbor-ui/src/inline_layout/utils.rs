use arbor_core::{EdgeInsets, ElementId, Position, Value};
use arbor_text::{LineMetrics, TextBackend};
use tracing::warn;

use crate::document::Document;
use crate::elements::{Align, SizedBox};
use crate::inline_layout::{InlineConstraints, InlineLayoutResult, LaidOutSpan, Span};

/// One line of a laid out paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphLine {
    pub spans: Vec<LaidOutSpan>,
    pub metrics: LineMetrics,
    /// Distance from the top of the paragraph
    pub top: f32,
}

impl ParagraphLine {
    pub fn width(&self) -> f32 {
        self.spans.iter().map(|span| span.width).sum()
    }
}

/// Metrics of a line holding `spans`: the tallest ascent and descent, never
/// smaller than `default_metrics`.
pub fn calc_combined_metrics(spans: &[LaidOutSpan], default_metrics: LineMetrics) -> LineMetrics {
    let mut ascent = default_metrics.ascent();
    let mut descent = default_metrics.descent();
    for span in spans {
        ascent = ascent.max(span.metrics.ascent());
        descent = descent.max(span.metrics.descent());
    }
    LineMetrics::new(ascent + descent, ascent, default_metrics.x_height)
}

/// Flow `root` into lines of `total_width`.
pub fn layout_lines(
    root: &Span,
    total_width: f32,
    backend: &dyn TextBackend,
    default_metrics: LineMetrics,
) -> Vec<ParagraphLine> {
    let mut lines = Vec::new();
    let mut current: Vec<LaidOutSpan> = Vec::new();
    let mut remaining_width = total_width;
    let mut top = 0.0;
    let mut next = Some(root.clone());

    let mut finish_line = |spans: Vec<LaidOutSpan>, top: &mut f32| {
        let metrics = calc_combined_metrics(&spans, default_metrics);
        lines.push(ParagraphLine { spans, metrics, top: *top });
        *top += metrics.height;
    };

    while let Some(span) = next.take() {
        let constraints = InlineConstraints::new(remaining_width, total_width);
        match span.layout(&constraints, backend) {
            InlineLayoutResult::Fit { width, metrics, span } => {
                current.push(LaidOutSpan { span, width, metrics });
            }
            InlineLayoutResult::Split { width, metrics, fit, remainder } => {
                current.push(LaidOutSpan { span: fit, width, metrics });
                finish_line(std::mem::take(&mut current), &mut top);
                remaining_width = total_width;
                next = Some(remainder);
            }
            InlineLayoutResult::Wrap { remainder } => {
                if current.is_empty() {
                    // Wrapping again would loop; the span overflows this line instead
                    let unbounded = InlineConstraints::new(f32::INFINITY, f32::INFINITY);
                    match remainder.layout(&unbounded, backend) {
                        InlineLayoutResult::Fit { width, metrics, span } => {
                            warn!(width = total_width, overflow = width, "span overflows an empty line");
                            current.push(LaidOutSpan { span, width, metrics });
                        }
                        _ => warn!(width = total_width, "span cannot be placed on any line, dropping it"),
                    }
                    continue;
                }
                finish_line(std::mem::take(&mut current), &mut top);
                remaining_width = total_width;
                next = Some(remainder);
            }
        }
    }
    if !current.is_empty() {
        finish_line(current, &mut top);
    }
    lines
}

/// Create positioned elements for the spans of one line.
///
/// Each span is drawn inside a box of its laid out width and height, placed
/// at its horizontal position and vertically aligned within `metrics`.
pub(crate) fn render_spans(
    doc: &mut Document,
    spans: &[LaidOutSpan],
    metrics: LineMetrics,
    offset: Position,
) -> Vec<ElementId> {
    let mut left = 0.0;
    let mut children = Vec::with_capacity(spans.len());
    for laid_out in spans {
        let top = laid_out.span.vert_align().offset(&metrics, &laid_out.metrics);
        let content = laid_out.span.render(doc, laid_out.metrics);
        let sized = doc.create_generated(
            SizedBox::exact(Value::abs(laid_out.width), Value::abs(laid_out.metrics.height)),
            &[content],
        );
        let align = Align::new(EdgeInsets::left_top(
            Value::abs(left + offset.left),
            Value::abs(top + offset.top),
        ))
        .with_adjust_child(false);
        children.push(doc.create_generated(align, &[sized]));
        left += laid_out.width;
    }
    children
}
