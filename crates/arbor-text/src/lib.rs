//! Text measurement for Arbor.
//!
//! Layout never shapes glyphs itself. It asks a [`TextBackend`] three
//! questions: how wide is this text, how many characters fit in a width,
//! and what are the line metrics of a style. [`ApproximateTextBackend`]
//! answers them from per-character estimates, which is enough for tests
//! and for headless layout.
//!
//! Break opportunities between words come from the Unicode line breaking
//! algorithm (UAX #14), see [`break_offsets`].

mod backend;
mod breaks;
mod metrics;
mod style;

pub use backend::{ApproximateTextBackend, ApproximateTextConfig, TextBackend};
pub use breaks::{break_offsets, byte_offset, char_count};
pub use metrics::LineMetrics;
pub use style::{TextDecoration, TextStyle};
