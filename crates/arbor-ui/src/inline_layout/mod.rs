//! Inline layout: flowing spans of styled content into lines.
//!
//! A [`Span`] is laid out against the space left on the current line and
//! answers with an [`InlineLayoutResult`]: it fits, it splits into a part
//! that fits and a remainder, or it wraps to the next line entirely. A
//! paragraph drives that loop and renders every laid out span as a
//! positioned element.

mod decoration_span;
mod responder_span;
mod span;
mod text_span;
mod utils;
mod vert_align;

pub use decoration_span::{Decoration, DecorationSpan};
pub use responder_span::ResponderSpan;
pub use span::{InlineConstraints, InlineLayoutResult, LaidOutSpan, Span, SpanBase};
pub use text_span::{LineBreak, TextSpan};
pub use utils::{calc_combined_metrics, layout_lines, ParagraphLine};
pub(crate) use utils::render_spans;
pub use vert_align::VertAlign;
