//! Text styles.

use arbor_core::{Color, TextError};

/// A line drawn under a text run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextDecoration {
    pub color: Color,
    pub thickness: f32,
}

/// How a run of text is drawn and measured.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextStyle {
    pub font_family: String,
    /// Font size in pixels
    pub font_size: f32,
    pub color: Color,
    /// Extra advance added after every character
    pub letter_spacing: f32,
    /// Multiplier applied to the font's natural line height
    pub line_height: f32,
    pub decorations: Vec<TextDecoration>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 16.0,
            color: Color::BLACK,
            letter_spacing: 0.0,
            line_height: 1.0,
            decorations: Vec::new(),
        }
    }
}

impl TextStyle {
    pub fn with_size(font_size: f32) -> Self {
        Self { font_size, ..Self::default() }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }

    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_letter_spacing(mut self, letter_spacing: f32) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    pub fn with_decoration(mut self, decoration: TextDecoration) -> Self {
        self.decorations.push(decoration);
        self
    }

    pub fn validate(&self) -> Result<(), TextError> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(TextError::InvalidFontSize(self.font_size));
        }
        Ok(())
    }
}
