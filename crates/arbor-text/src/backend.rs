//! Text measurement backends.

use arbor_core::TextError;

use crate::metrics::LineMetrics;
use crate::style::TextStyle;

/// The measurement capability layout depends on.
///
/// Character counts are in Unicode scalar values, not bytes.
pub trait TextBackend {
    /// Width of the first `chars` characters of `text`, or of all of it.
    fn measure_text_width(&self, text: &str, style: &TextStyle, chars: Option<usize>) -> f32;

    /// How many leading characters of `text` fit in `max_width`, and their width.
    fn break_text_at_width(&self, text: &str, style: &TextStyle, max_width: f32) -> (usize, f32);

    fn line_metrics(&self, style: &TextStyle) -> LineMetrics;
}

/// Ratios used to estimate glyph geometry from the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApproximateTextConfig {
    /// Average advance of a character
    pub advance_factor: f32,
    pub ascent_factor: f32,
    pub descent_factor: f32,
    pub x_height_factor: f32,
}

impl Default for ApproximateTextConfig {
    fn default() -> Self {
        Self {
            advance_factor: 0.55,
            ascent_factor: 0.8,
            descent_factor: 0.2,
            x_height_factor: 0.5,
        }
    }
}

/// Estimates text geometry from the font size alone.
///
/// Every character gets the same advance, so measurements are stable and
/// predictable, which is what headless layout and tests need.
#[derive(Debug, Clone)]
pub struct ApproximateTextBackend {
    config: ApproximateTextConfig,
}

impl ApproximateTextBackend {
    pub fn new(config: ApproximateTextConfig) -> Result<Self, TextError> {
        let factors = [
            ("advance_factor", config.advance_factor),
            ("ascent_factor", config.ascent_factor),
            ("descent_factor", config.descent_factor),
            ("x_height_factor", config.x_height_factor),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(TextError::InvalidConfig {
                    reason: format!("{name} must be finite and non-negative, got {value}"),
                });
            }
        }
        if config.advance_factor == 0.0 {
            return Err(TextError::InvalidConfig {
                reason: "advance_factor must be positive".to_string(),
            });
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ApproximateTextConfig {
        &self.config
    }

    fn advance(&self, style: &TextStyle) -> f32 {
        style.font_size * self.config.advance_factor + style.letter_spacing
    }
}

impl TextBackend for ApproximateTextBackend {
    fn measure_text_width(&self, text: &str, style: &TextStyle, chars: Option<usize>) -> f32 {
        let total = text.chars().count();
        let count = chars.map_or(total, |chars| chars.min(total));
        count as f32 * self.advance(style)
    }

    fn break_text_at_width(&self, text: &str, style: &TextStyle, max_width: f32) -> (usize, f32) {
        let advance = self.advance(style);
        let mut width = 0.0;
        let mut count = 0;
        for _ in text.chars() {
            if width + advance > max_width {
                break;
            }
            width += advance;
            count += 1;
        }
        (count, width)
    }

    fn line_metrics(&self, style: &TextStyle) -> LineMetrics {
        let ascent = style.font_size * self.config.ascent_factor;
        let descent = style.font_size * self.config.descent_factor;
        LineMetrics::new(ascent + descent, ascent, style.font_size * self.config.x_height_factor)
            .scale(style.line_height)
    }
}
