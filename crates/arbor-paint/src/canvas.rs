//! Drawing surfaces.

use std::rc::Rc;

use arbor_core::Size;
use glam::Affine2;

use crate::clip::ClipPath;
use crate::raster::ImagePrimitive;
use crate::primitives::{LinePrimitive, PathPrimitive, RectPrimitive, RenderCommand, TextPrimitive};

/// Something elements can draw into.
///
/// Implementors only provide [`Canvas::push`]; every drawing helper is
/// expressed as a command.
pub trait Canvas {
    fn push(&mut self, command: RenderCommand);

    fn draw_rect(&mut self, rect: RectPrimitive) {
        self.push(RenderCommand::Rect(rect));
    }

    fn draw_path(&mut self, path: PathPrimitive) {
        self.push(RenderCommand::Path(path));
    }

    fn draw_line(&mut self, line: LinePrimitive) {
        self.push(RenderCommand::Line(line));
    }

    fn draw_text(&mut self, text: TextPrimitive) {
        self.push(RenderCommand::Text(text));
    }

    fn draw_image(&mut self, image: ImagePrimitive) {
        self.push(RenderCommand::Image(image));
    }

    fn push_clip(&mut self, clip: ClipPath) {
        self.push(RenderCommand::PushClip(clip));
    }

    fn pop_clip(&mut self) {
        self.push(RenderCommand::PopClip);
    }

    fn push_transform(&mut self, transform: Affine2) {
        self.push(RenderCommand::PushTransform(transform));
    }

    fn pop_transform(&mut self) {
        self.push(RenderCommand::PopTransform);
    }

    fn push_opacity(&mut self, opacity: f32) {
        self.push(RenderCommand::PushOpacity(opacity));
    }

    fn pop_opacity(&mut self) {
        self.push(RenderCommand::PopOpacity);
    }

    /// Replay a recorded picture.
    fn draw_picture(&mut self, picture: &Picture) {
        for command in picture.commands() {
            self.push(command.clone());
        }
    }
}

/// An immutable, cheaply clonable recording of drawing commands.
#[derive(Debug, Clone)]
pub struct Picture {
    commands: Rc<[RenderCommand]>,
}

impl Default for Picture {
    fn default() -> Self {
        Self { commands: Rc::from(Vec::new()) }
    }
}

impl Picture {
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Canvas that records into a [`Picture`].
#[derive(Debug, Default)]
pub struct PictureRecorder {
    commands: Vec<RenderCommand>,
}

impl PictureRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Picture {
        Picture { commands: self.commands.into() }
    }
}

impl Canvas for PictureRecorder {
    fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }
}

/// The command list for one frame, handed to the platform for presentation.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub commands: Vec<RenderCommand>,
    pub width: f32,
    pub height: f32,
}

impl Scene {
    pub fn new(size: Size) -> Self {
        Self {
            commands: Vec::new(),
            width: size.width,
            height: size.height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Drop all commands and resize for the next frame.
    pub fn reset(&mut self, size: Size) {
        self.commands.clear();
        self.width = size.width;
        self.height = size.height;
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate over the rectangles drawn this frame.
    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            RenderCommand::Rect(rect) => Some(rect),
            _ => None,
        })
    }

    /// Iterate over the images drawn this frame.
    pub fn images(&self) -> impl Iterator<Item = &ImagePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            RenderCommand::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Iterate over the text runs drawn this frame.
    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            RenderCommand::Text(text) => Some(text),
            _ => None,
        })
    }
}

impl Canvas for Scene {
    fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::Color;

    #[test]
    fn test_recorder_replay() {
        let mut recorder = PictureRecorder::new();
        recorder.draw_rect(RectPrimitive::new(0.0, 0.0, 10.0, 10.0).with_fill(Color::RED));
        recorder.draw_text(TextPrimitive::new(0.0, 12.0, "hi"));
        let picture = recorder.finish();
        assert_eq!(picture.len(), 2);

        let mut scene = Scene::new(Size::new(100.0, 100.0));
        scene.draw_picture(&picture);
        scene.draw_picture(&picture);
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.rects().count(), 2);
        assert_eq!(scene.texts().next().map(|t| t.text.as_str()), Some("hi"));
    }

    #[test]
    fn test_scene_reset() {
        let mut scene = Scene::new(Size::new(10.0, 10.0));
        scene.push_opacity(0.5);
        scene.pop_opacity();
        scene.reset(Size::new(20.0, 30.0));
        assert!(scene.is_empty());
        assert_eq!(scene.size(), Size::new(20.0, 30.0));
    }
}
