//! Vertical line metrics.

/// Vertical extents of a line or of a span within a line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineMetrics {
    pub height: f32,
    /// Distance from the top of the line to the baseline
    pub baseline: f32,
    pub x_height: f32,
}

impl LineMetrics {
    pub const fn new(height: f32, baseline: f32, x_height: f32) -> Self {
        Self { height, baseline, x_height }
    }

    pub fn ascent(&self) -> f32 {
        self.baseline
    }

    pub fn descent(&self) -> f32 {
        self.height - self.baseline
    }

    /// Grow the line by extra space above and below the text.
    pub fn add(&self, ascent: f32, descent: f32) -> Self {
        Self::new(self.height + ascent + descent, self.baseline + ascent, self.x_height)
    }

    /// Scale the height by `ratio`, splitting the extra space evenly above
    /// and below the text.
    pub fn scale(&self, ratio: f32) -> Self {
        let extra = self.height * (ratio - 1.0);
        Self::new(self.height + extra, self.baseline + extra / 2.0, self.x_height)
    }
}
