use arbor_core::ElementId;
use arbor_text::{LineMetrics, TextBackend};

use crate::document::Document;
use crate::inline_layout::{DecorationSpan, ResponderSpan, TextSpan, VertAlign};

/// Space available to a span on the current line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineConstraints {
    pub remaining_line_width: f32,
    pub total_line_width: f32,
    /// Space the line must keep before the span's first segment. It is not
    /// part of the span's own width.
    pub padding_before: f32,
    /// Space the line must keep after the span's last segment
    pub padding_after: f32,
}

impl InlineConstraints {
    pub fn new(remaining_line_width: f32, total_line_width: f32) -> Self {
        Self { remaining_line_width, total_line_width, padding_before: 0.0, padding_after: 0.0 }
    }

    pub fn with_paddings(mut self, padding_before: f32, padding_after: f32) -> Self {
        self.padding_before = padding_before;
        self.padding_after = padding_after;
        self
    }

    pub fn at_line_start(&self) -> bool {
        self.remaining_line_width == self.total_line_width
    }
}

/// Outcome of laying out a span on a line.
#[derive(Debug, Clone)]
pub enum InlineLayoutResult {
    /// All content fits
    Fit { width: f32, metrics: LineMetrics, span: Span },
    /// `fit` fits on this line, `remainder` goes to the next one
    Split { width: f32, metrics: LineMetrics, fit: Span, remainder: Span },
    /// Nothing fits; the whole span moves to the next line
    Wrap { remainder: Span },
}

impl InlineLayoutResult {
    pub fn fit(width: f32, metrics: LineMetrics, span: impl Into<Span>) -> Self {
        InlineLayoutResult::Fit { width, metrics, span: span.into() }
    }

    pub fn split(
        width: f32,
        metrics: LineMetrics,
        fit: impl Into<Span>,
        remainder: impl Into<Span>,
    ) -> Self {
        InlineLayoutResult::Split { width, metrics, fit: fit.into(), remainder: remainder.into() }
    }

    pub fn wrap(remainder: impl Into<Span>) -> Self {
        InlineLayoutResult::Wrap { remainder: remainder.into() }
    }

    pub fn width(&self) -> f32 {
        match self {
            InlineLayoutResult::Fit { width, .. } | InlineLayoutResult::Split { width, .. } => {
                *width
            }
            InlineLayoutResult::Wrap { .. } => 0.0,
        }
    }
}

/// A span placed on a line with its measured width and metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutSpan {
    pub span: Span,
    pub width: f32,
    pub metrics: LineMetrics,
}

/// Where a derived span came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanBase {
    /// Character offset of the span's content in the span it was first
    /// derived from
    pub prev_offset: usize,
}

impl SpanBase {
    pub fn new(prev_offset: usize) -> Self {
        Self { prev_offset }
    }
}

/// A fragment of inline content.
#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    Text(TextSpan),
    Decoration(DecorationSpan),
    Responder(ResponderSpan),
}

impl From<TextSpan> for Span {
    fn from(span: TextSpan) -> Self {
        Span::Text(span)
    }
}

impl From<DecorationSpan> for Span {
    fn from(span: DecorationSpan) -> Self {
        Span::Decoration(span)
    }
}

impl From<ResponderSpan> for Span {
    fn from(span: ResponderSpan) -> Self {
        Span::Responder(span)
    }
}

impl Span {
    pub fn layout(
        &self,
        constraints: &InlineConstraints,
        backend: &dyn TextBackend,
    ) -> InlineLayoutResult {
        match self {
            Span::Text(span) => span.layout(constraints, backend),
            Span::Decoration(span) => span.layout(constraints, backend),
            Span::Responder(span) => span.layout(constraints, backend),
        }
    }

    /// Create the elements that draw this span after it was laid out with
    /// `metrics`.
    pub(crate) fn render(&self, doc: &mut Document, metrics: LineMetrics) -> ElementId {
        match self {
            Span::Text(span) => span.render(doc),
            Span::Decoration(span) => span.render(doc),
            Span::Responder(span) => span.render(doc, metrics),
        }
    }

    pub fn vert_align(&self) -> VertAlign {
        match self {
            Span::Text(span) => span.vert_align,
            Span::Decoration(_) => VertAlign::Baseline,
            Span::Responder(span) => span.child.vert_align(),
        }
    }

    pub fn base(&self) -> SpanBase {
        match self {
            Span::Text(span) => span.base,
            Span::Decoration(span) => span.base,
            Span::Responder(span) => span.base,
        }
    }

    /// Text content of the span and all its descendants.
    pub fn text(&self) -> String {
        match self {
            Span::Text(span) => span.text.clone(),
            Span::Decoration(span) => span.children.iter().map(Span::text).collect(),
            Span::Responder(span) => span.child.text(),
        }
    }

    /// Length of [`Span::text`] in characters.
    pub fn text_len(&self) -> usize {
        match self {
            Span::Text(span) => span.text.chars().count(),
            Span::Decoration(span) => span.children.iter().map(Span::text_len).sum(),
            Span::Responder(span) => span.child.text_len(),
        }
    }
}
