//! Decoded raster images and the command that draws them.

use std::fmt;
use std::rc::Rc;

use arbor_core::{ImageError, Rect, Size};
use tracing::debug;

/// RGBA8 pixels shared between every element and command showing them.
#[derive(Clone, PartialEq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Rc<[u8]>,
}

impl ImageData {
    /// Wrap an RGBA8 buffer of `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(ImageError::BufferSize { width, height, len: pixels.len() });
        }
        Ok(Self { width, height, pixels: pixels.into() })
    }

    /// Decode an encoded PNG or JPEG.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|err| ImageError::Decode { reason: err.to_string() })?
            .into_rgba8();
        let (width, height) = decoded.dimensions();
        debug!(width, height, "decoded image");
        Ok(Self { width, height, pixels: decoded.into_raw().into() })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Natural size in logical pixels.
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// True if both share one pixel buffer.
    pub fn same_pixels(&self, other: &ImageData) -> bool {
        Rc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Draw `image` scaled into `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePrimitive {
    pub image: ImageData,
    pub rect: Rect,
}

impl ImagePrimitive {
    pub fn new(image: ImageData, rect: Rect) -> Self {
        Self { image, rect }
    }
}
