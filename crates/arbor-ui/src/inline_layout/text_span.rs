use std::rc::Rc;

use arbor_core::ElementId;
use arbor_text::{break_offsets, byte_offset, char_count, TextBackend, TextStyle};

use crate::document::Document;
use crate::elements::Text;
use crate::inline_layout::{InlineConstraints, InlineLayoutResult, SpanBase, VertAlign};

/// Where a text span may be broken across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineBreak {
    /// At Unicode line break opportunities
    #[default]
    Normal,
    /// Never; the span fits or wraps as a whole
    Never,
    /// Between any two characters
    Anywhere,
    /// At line break opportunities, and inside a word that cannot fit on a
    /// line of its own
    Overflow,
}

/// A run of text in a single style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub style: Rc<TextStyle>,
    pub linebreak: LineBreak,
    pub vert_align: VertAlign,
    pub base: SpanBase,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, style: impl Into<Rc<TextStyle>>) -> Self {
        Self {
            text: text.into(),
            style: style.into(),
            linebreak: LineBreak::default(),
            vert_align: VertAlign::default(),
            base: SpanBase::default(),
        }
    }

    pub fn with_linebreak(mut self, linebreak: LineBreak) -> Self {
        self.linebreak = linebreak;
        self
    }

    pub fn with_vert_align(mut self, vert_align: VertAlign) -> Self {
        self.vert_align = vert_align;
        self
    }

    pub fn layout(
        &self,
        constraints: &InlineConstraints,
        backend: &dyn TextBackend,
    ) -> InlineLayoutResult {
        if self.text.is_empty() {
            return self.fit(0.0, backend);
        }
        match self.linebreak {
            LineBreak::Never => {
                let required = constraints.remaining_line_width
                    - constraints.padding_before
                    - constraints.padding_after;
                let width = backend.measure_text_width(&self.text, &self.style, None);
                if width <= required || constraints.at_line_start() {
                    self.fit(width, backend)
                } else {
                    self.wrap()
                }
            }
            LineBreak::Anywhere => self.break_segment(self.text.len(), constraints, backend),
            LineBreak::Normal | LineBreak::Overflow => self.break_segments(constraints, backend),
        }
    }

    pub(crate) fn render(&self, doc: &mut Document) -> ElementId {
        doc.create_generated(Text::new(self.text.clone(), Rc::clone(&self.style)), &[])
    }

    /// Longest run of whole segments that fits.
    fn break_segments(
        &self,
        constraints: &InlineConstraints,
        backend: &dyn TextBackend,
    ) -> InlineLayoutResult {
        let breaks = break_offsets(&self.text);
        let count = breaks.len() - 1;
        let mut fit_width = 0.0;
        let mut paddings = 0.0;
        for i in 0..count {
            if i == 0 {
                paddings += constraints.padding_before;
            }
            if i + 1 == count {
                paddings += constraints.padding_after;
            }
            let segment = &self.text[breaks[i]..breaks[i + 1]];
            let segment_width = backend.measure_text_width(segment, &self.style, None);
            if fit_width + segment_width + paddings <= constraints.remaining_line_width {
                fit_width += segment_width;
                continue;
            }
            if i > 0 {
                return self.split(breaks[i], fit_width, backend);
            }
            if !constraints.at_line_start() {
                return self.wrap();
            }
            // A line must take at least one segment or the span would wrap forever
            return match self.linebreak {
                LineBreak::Overflow => self.break_segment(breaks[1], constraints, backend),
                _ if count == 1 => self.fit(segment_width, backend),
                _ => self.split(breaks[1], segment_width, backend),
            };
        }
        self.fit(fit_width, backend)
    }

    /// Break the first `end` bytes of the text between any two characters.
    fn break_segment(
        &self,
        end: usize,
        constraints: &InlineConstraints,
        backend: &dyn TextBackend,
    ) -> InlineLayoutResult {
        let segment = &self.text[..end];
        let chars = char_count(segment);
        let required = constraints.remaining_line_width - constraints.padding_before;
        let (fit_chars, fit_width) = backend.break_text_at_width(segment, &self.style, required);

        if fit_chars == chars {
            if fit_width <= required - constraints.padding_after {
                return if end == self.text.len() {
                    self.fit(fit_width, backend)
                } else {
                    self.split(end, fit_width, backend)
                };
            }
            // Fits only without the trailing padding: move the last character on
            if chars > 1 {
                let width = backend.measure_text_width(segment, &self.style, Some(chars - 1));
                return self.split(byte_offset(&self.text, chars - 1), width, backend);
            }
        }

        if fit_chars == 0 || fit_chars == chars {
            if !constraints.at_line_start() {
                return self.wrap();
            }
            let width = backend.measure_text_width(segment, &self.style, Some(1));
            let first = byte_offset(&self.text, 1);
            return if first == self.text.len() {
                self.fit(width, backend)
            } else {
                self.split(first, width, backend)
            };
        }
        self.split(byte_offset(&self.text, fit_chars), fit_width, backend)
    }

    fn derive(&self, start: usize, end: usize) -> TextSpan {
        TextSpan {
            text: self.text[start..end].to_string(),
            style: Rc::clone(&self.style),
            linebreak: self.linebreak,
            vert_align: self.vert_align,
            base: SpanBase::new(self.base.prev_offset + char_count(&self.text[..start])),
        }
    }

    fn fit(&self, width: f32, backend: &dyn TextBackend) -> InlineLayoutResult {
        InlineLayoutResult::fit(width, backend.line_metrics(&self.style), self.clone())
    }

    /// Split at byte offset `at`.
    fn split(&self, at: usize, width: f32, backend: &dyn TextBackend) -> InlineLayoutResult {
        InlineLayoutResult::split(
            width,
            backend.line_metrics(&self.style),
            self.derive(0, at),
            self.derive(at, self.text.len()),
        )
    }

    fn wrap(&self) -> InlineLayoutResult {
        InlineLayoutResult::wrap(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline_layout::Span;
    use crate::test_utils::test_backend;

    // The test backend advances 5px per character at font size 10.
    fn span(text: &str, linebreak: LineBreak) -> TextSpan {
        TextSpan::new(text, TextStyle::with_size(10.0)).with_linebreak(linebreak)
    }

    fn text_of(span: &Span) -> &str {
        match span {
            Span::Text(span) => &span.text,
            _ => panic!("expected a text span"),
        }
    }

    fn expect_split(result: InlineLayoutResult) -> (f32, String, String) {
        match result {
            InlineLayoutResult::Split { width, fit, remainder, .. } => {
                (width, text_of(&fit).to_string(), text_of(&remainder).to_string())
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    const HELLO_WORLD: &str = "Hello, World!";
    const HELLO_WIDTH: f32 = 35.0;

    #[test]
    fn test_normal_fit() {
        let backend = test_backend();
        let result = span(HELLO_WORLD, LineBreak::Normal)
            .layout(&InlineConstraints::new(1000.0, 1000.0), &*backend);
        match result {
            InlineLayoutResult::Fit { width, metrics, span } => {
                assert_eq!(width, 65.0);
                assert_eq!(metrics.height, 10.0);
                assert_eq!(text_of(&span), HELLO_WORLD);
            }
            other => panic!("expected fit, got {other:?}"),
        }
    }

    #[test]
    fn test_normal_wrap() {
        let backend = test_backend();
        let result = span(HELLO_WORLD, LineBreak::Normal)
            .layout(&InlineConstraints::new(0.0, 1000.0), &*backend);
        assert!(matches!(result, InlineLayoutResult::Wrap { .. }));
    }

    #[test]
    fn test_normal_split_at_word() {
        let backend = test_backend();
        let result = span(HELLO_WORLD, LineBreak::Normal)
            .layout(&InlineConstraints::new(HELLO_WIDTH, 1000.0), &*backend);
        let (width, fit, remainder) = expect_split(result);
        assert_eq!(width, HELLO_WIDTH);
        assert_eq!(fit, "Hello, ");
        assert_eq!(remainder, "World!");
    }

    #[test]
    fn test_normal_fits_one_segment_at_line_start() {
        let backend = test_backend();
        let constraints = InlineConstraints::new(HELLO_WIDTH - 10.0, HELLO_WIDTH - 10.0);
        let result = span("Hello, ", LineBreak::Normal).layout(&constraints, &*backend);
        assert!(matches!(result, InlineLayoutResult::Fit { width, .. } if width == HELLO_WIDTH));

        let result = span(HELLO_WORLD, LineBreak::Normal).layout(&constraints, &*backend);
        let (_, fit, remainder) = expect_split(result);
        assert_eq!(fit, "Hello, ");
        assert_eq!(remainder, "World!");
    }

    #[test]
    fn test_normal_padding_after_applies_to_last_segment() {
        let backend = test_backend();
        let constraints = InlineConstraints::new(70.0, 1000.0).with_paddings(0.0, 10.0);
        let (width, fit, _) =
            expect_split(span(HELLO_WORLD, LineBreak::Normal).layout(&constraints, &*backend));
        assert_eq!(width, HELLO_WIDTH);
        assert_eq!(fit, "Hello, ");
    }

    #[test]
    fn test_never_wraps_unless_at_line_start() {
        let backend = test_backend();
        let text = span(HELLO_WORLD, LineBreak::Never);
        let result = text.layout(&InlineConstraints::new(HELLO_WIDTH - 1.0, 1000.0), &*backend);
        assert!(matches!(result, InlineLayoutResult::Wrap { .. }));
        let result = text.layout(
            &InlineConstraints::new(HELLO_WIDTH - 1.0, HELLO_WIDTH - 1.0),
            &*backend,
        );
        assert!(matches!(result, InlineLayoutResult::Fit { .. }));
    }

    #[test]
    fn test_anywhere_split() {
        let backend = test_backend();
        let result = span("Hello, ", LineBreak::Anywhere)
            .layout(&InlineConstraints::new(20.0, 20.0), &*backend);
        let (width, fit, remainder) = expect_split(result);
        assert_eq!(width, 20.0);
        assert_eq!(fit, "Hell");
        assert_eq!(remainder, "o, ");
    }

    #[test]
    fn test_anywhere_wrap() {
        let backend = test_backend();
        let result = span("Hello, ", LineBreak::Anywhere)
            .layout(&InlineConstraints::new(1.0, 2.0), &*backend);
        assert!(matches!(result, InlineLayoutResult::Wrap { .. }));
    }

    #[test]
    fn test_anywhere_forces_one_char_at_line_start() {
        let backend = test_backend();
        let result = span("Hello, ", LineBreak::Anywhere)
            .layout(&InlineConstraints::new(1.0, 1.0), &*backend);
        let (width, fit, _) = expect_split(result);
        assert_eq!(width, 5.0);
        assert_eq!(fit, "H");
    }

    #[test]
    fn test_anywhere_moves_last_char_for_padding() {
        let backend = test_backend();
        let constraints =
            InlineConstraints::new(HELLO_WIDTH + 30.0, HELLO_WIDTH + 30.0).with_paddings(20.0, 20.0);
        let result = span("Hello, ", LineBreak::Anywhere).layout(&constraints, &*backend);
        let (_, fit, remainder) = expect_split(result);
        assert_eq!(fit, "Hello,");
        assert_eq!(remainder, " ");
    }

    #[test]
    fn test_overflow_breaks_inside_word() {
        let backend = test_backend();
        let text = span(HELLO_WORLD, LineBreak::Overflow);

        let constraints = InlineConstraints::new(HELLO_WIDTH + 20.0, HELLO_WIDTH + 20.0);
        let (_, fit, _) = expect_split(text.layout(&constraints, &*backend));
        assert_eq!(fit, "Hello, ");

        let constraints = InlineConstraints::new(20.0, 20.0);
        let (_, fit, remainder) = expect_split(text.layout(&constraints, &*backend));
        assert_eq!(fit, "Hell");
        assert_eq!(remainder, "o, World!");
    }

    #[test]
    fn test_empty_text_fits() {
        let backend = test_backend();
        let result = span("", LineBreak::Normal).layout(&InlineConstraints::new(0.0, 100.0), &*backend);
        assert!(matches!(result, InlineLayoutResult::Fit { width, .. } if width == 0.0));
    }

    #[test]
    fn test_derived_offsets() {
        let backend = test_backend();
        let result = span("añb cd", LineBreak::Anywhere)
            .layout(&InlineConstraints::new(10.0, 10.0), &*backend);
        match result {
            InlineLayoutResult::Split { fit, remainder, .. } => {
                assert_eq!(text_of(&fit), "añ");
                assert_eq!(fit.base().prev_offset, 0);
                assert_eq!(text_of(&remainder), "b cd");
                assert_eq!(remainder.base().prev_offset, 2);
            }
            other => panic!("expected split, got {other:?}"),
        }
    }
}
