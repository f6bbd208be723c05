//! Per repaint boundary picture cache.
//!
//! A changed boundary records every draw call into its own [`Picture`] and
//! replays it onto the real surface. An unchanged boundary replays the
//! pictures by position, so the sequence of draw calls in an unchanged frame
//! must match the sequence recorded by the last changed frame.

use tracing::warn;

use crate::canvas::{Canvas, Picture, PictureRecorder};

#[derive(Debug)]
pub struct PaintCache {
    pictures: Vec<Picture>,
    cursor: usize,
    is_changed: bool,
}

impl Default for PaintCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PaintCache {
    /// A new cache starts out changed: there is nothing to replay yet.
    pub fn new() -> Self {
        Self {
            pictures: Vec::new(),
            cursor: 0,
            is_changed: true,
        }
    }

    /// Begin a frame for this boundary.
    pub fn restart(&mut self, is_changed: bool) {
        self.is_changed = is_changed;
        if is_changed {
            self.pictures.clear();
        }
        self.cursor = 0;
    }

    pub fn is_changed(&self) -> bool {
        self.is_changed
    }

    /// Number of pictures recorded by the last changed frame.
    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Draw one unit of content onto `surface`.
    ///
    /// `painter` only runs when the boundary is changed, or when an
    /// unchanged frame asks for more pictures than were recorded.
    pub fn paint<F>(&mut self, surface: &mut dyn Canvas, painter: F)
    where
        F: FnOnce(&mut dyn Canvas),
    {
        if !self.is_changed {
            if let Some(picture) = self.pictures.get(self.cursor) {
                surface.draw_picture(picture);
                self.cursor += 1;
                return;
            }
            debug_assert!(
                false,
                "paint cache replay out of step: call {} but only {} pictures recorded",
                self.cursor,
                self.pictures.len()
            );
            warn!(
                cursor = self.cursor,
                recorded = self.pictures.len(),
                "paint cache replay out of step, recording again"
            );
        }

        let mut recorder = PictureRecorder::new();
        painter(&mut recorder);
        let picture = recorder.finish();
        surface.draw_picture(&picture);
        if self.cursor < self.pictures.len() {
            self.pictures[self.cursor] = picture;
        } else {
            self.pictures.push(picture);
        }
        self.cursor += 1;
    }

    /// End a frame. In an unchanged frame every recorded picture must have
    /// been replayed.
    pub fn finish(&mut self) {
        if self.is_changed || self.cursor == self.pictures.len() {
            return;
        }
        debug_assert!(
            false,
            "paint cache replayed {} of {} pictures",
            self.cursor,
            self.pictures.len()
        );
        warn!(
            replayed = self.cursor,
            recorded = self.pictures.len(),
            "paint cache frame ended early, dropping stale pictures"
        );
        self.pictures.truncate(self.cursor);
    }
}
