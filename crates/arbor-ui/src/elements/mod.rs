//! Element variants.
//!
//! Each variant owns only its properties. Children live in the document's
//! arena; a variant reaches them through the id it is laid out or painted
//! with.

mod align;
mod background;
mod border;
mod clip;
mod flex;
mod image;
mod layer;
mod overflow;
mod padding;
mod paragraph;
mod responder;
mod sized;
mod stack;
mod text;
mod translated;

pub use align::Align;
pub use background::Background;
pub use border::{Border, BorderSide, BoxBorders, BoxRadiuses};
pub use clip::{Clip, Clipper};
pub use flex::{Flex, FlexAlign, FlexChild, FlexDirection, FlexJustify};
pub use image::{fit_image, Image, ImageFit};
pub use layer::Layer;
pub use overflow::Overflow;
pub use padding::Padding;
pub use paragraph::Paragraph;
pub use responder::{Responder, ResponderHandler};
pub use sized::{SizeConstraints, SizedBox};
pub use stack::Stack;
pub use text::Text;
pub use translated::{Translated, Translation};
