use arbor_text::LineMetrics;

/// Vertical position of a span within its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertAlign {
    /// Span baseline on the line baseline
    #[default]
    Baseline,
    Top,
    Center,
    Bottom,
    /// Middle of the span on the middle of the line's x-height
    TextCenter,
}

impl VertAlign {
    /// Offset of the span's top from the line's top.
    pub fn offset(self, line: &LineMetrics, span: &LineMetrics) -> f32 {
        match self {
            VertAlign::Baseline => line.baseline - span.baseline,
            VertAlign::Top => 0.0,
            VertAlign::Center => (line.height - span.height) / 2.0,
            VertAlign::Bottom => line.height - span.height,
            VertAlign::TextCenter => {
                (line.baseline - line.x_height / 2.0 - span.height / 2.0).round()
            }
        }
    }
}
