//! Document configuration.

use arbor_core::{ConfigError, Size};
use arbor_text::TextStyle;

/// Options for a [`crate::Document`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentOptions {
    /// Size of the surface the root is laid out into
    pub viewport: Size,
    /// Style whose line metrics are the floor for every paragraph line
    pub default_text_style: TextStyle,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            viewport: Size::new(800.0, 600.0),
            default_text_style: TextStyle::default(),
        }
    }
}

impl DocumentOptions {
    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_viewport(self.viewport)?;
        self.default_text_style.validate().map_err(ConfigError::InvalidTextStyle)
    }
}

pub(crate) fn validate_viewport(viewport: Size) -> Result<(), ConfigError> {
    let valid = |value: f32| value.is_finite() && value >= 0.0;
    if !valid(viewport.width) || !valid(viewport.height) {
        return Err(ConfigError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(())
}
