//! Line break opportunities and character offsets.

use smallvec::SmallVec;
use unicode_linebreak::linebreaks;

/// Byte offsets where a line may break, as defined by UAX #14.
///
/// The result always starts with `0` and ends with `text.len()`, so
/// consecutive pairs delimit the unbreakable segments of `text`. Empty text
/// yields `[0]`.
pub fn break_offsets(text: &str) -> SmallVec<[usize; 16]> {
    let mut offsets = SmallVec::new();
    offsets.push(0);
    for (offset, _) in linebreaks(text) {
        if offset > 0 {
            offsets.push(offset);
        }
    }
    offsets
}

/// Number of characters in `text`.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the character at `char_index`, or `text.len()` past the end.
pub fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
