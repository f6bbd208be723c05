use arbor_core::{BoxConstraints, ElementId, Position, Rect, Size};
use arbor_paint::{Canvas, ClipPath, ImageData, ImagePrimitive};

use crate::document::Document;
use crate::element::ElementBehavior;

/// How an image is scaled into the element's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageFit {
    /// Natural size
    None,
    /// The image's `custom_size`
    CustomSize,
    /// Scaled to cover the box, keeping the aspect ratio; the excess is clipped
    Cover,
    /// Scaled to fit inside the box, keeping the aspect ratio
    #[default]
    Contain,
    /// Stretched to the box
    Fill,
    /// Natural size, or `Contain` when the image is larger than the box
    ScaleDown,
}

/// Where an image of `image_size` is drawn inside `bounds`. The result is
/// always centered in the bounds.
pub fn fit_image(bounds: Size, image_size: Size, fit: ImageFit, custom_size: Size) -> Rect {
    let ratio_to = |pick: fn(f32, f32) -> f32| {
        let ratio = pick(image_size.width / bounds.width, image_size.height / bounds.height);
        if ratio.is_finite() && ratio > 0.0 {
            Size::new(image_size.width / ratio, image_size.height / ratio)
        } else {
            Size::ZERO
        }
    };
    let size = match fit {
        ImageFit::None => image_size,
        ImageFit::CustomSize => custom_size,
        ImageFit::Cover => ratio_to(f32::min),
        ImageFit::Contain => ratio_to(f32::max),
        ImageFit::Fill => bounds,
        ImageFit::ScaleDown => {
            if image_size.width > bounds.width || image_size.height > bounds.height {
                ratio_to(f32::max)
            } else {
                image_size
            }
        }
    };
    let position = Position::new(
        (bounds.width - size.width) / 2.0,
        (bounds.height - size.height) / 2.0,
    );
    Rect::from_position_size(position, size)
}

/// Draws a decoded image.
///
/// Takes the image's natural size (or `custom_size`) within its
/// constraints. `Cover`, `Contain` and `Fill` grow to the bounded
/// maximums instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Image {
    pub source: Option<ImageData>,
    pub fit: ImageFit,
    pub custom_size: Size,
}

impl Image {
    pub fn new(source: ImageData) -> Self {
        Self { source: Some(source), ..Self::default() }
    }

    pub fn with_fit(mut self, fit: ImageFit) -> Self {
        self.fit = fit;
        self
    }

    pub fn with_custom_size(mut self, custom_size: Size) -> Self {
        self.custom_size = custom_size;
        self.fit = ImageFit::CustomSize;
        self
    }
}

impl ElementBehavior for Image {
    fn name(&self) -> &'static str {
        "Image"
    }

    fn layout(&mut self, _doc: &mut Document, _id: ElementId, constraints: BoxConstraints) -> Size {
        let Some(source) = &self.source else {
            return constraints.min_size();
        };
        let natural = match self.fit {
            ImageFit::CustomSize => self.custom_size,
            _ => source.size(),
        };
        let fills = matches!(self.fit, ImageFit::Cover | ImageFit::Contain | ImageFit::Fill);
        let pick = |max: f32, natural: f32| if fills && max.is_finite() { max } else { natural };
        constraints.constrain(Size::new(
            pick(constraints.max_width, natural.width),
            pick(constraints.max_height, natural.height),
        ))
    }

    fn paint(&self, doc: &mut Document, id: ElementId) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let bounds = doc.size_of(id);
        let rect = fit_image(bounds, source.size(), self.fit, self.custom_size);
        let overflows = rect.left < 0.0
            || rect.top < 0.0
            || rect.right() > bounds.width
            || rect.bottom() > bounds.height;
        doc.draw(id, move |canvas: &mut dyn Canvas| {
            if overflows {
                canvas.push_clip(ClipPath::from_size(bounds));
            }
            canvas.draw_image(ImagePrimitive::new(source, rect));
            if overflows {
                canvas.pop_clip();
            }
        });
    }
}
