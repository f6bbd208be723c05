//! Retained-mode element tree for Arbor.
//!
//! A [`Document`] owns an arena of elements. Each frame it lays out the
//! parts of the tree that changed, paints the tree into a
//! [`arbor_paint::Scene`] replaying cached pictures where it can, and
//! routes pointer input to the responders under the pointer.
//!
//! # Architecture
//!
//! 1. **Elements**: a closed set of variants ([`ElementKind`]) with
//!    constraint based layout
//! 2. **Document**: tree mutation, relayout and repaint boundaries, the
//!    frame pipeline
//! 3. **Inline layout**: spans flowed into paragraph lines
//! 4. **Pointer events**: hit testing and add/update/remove dispatch
//!
//! # Example
//!
//! ```
//! use arbor_core::{Color, Size};
//! use arbor_ui::elements::{Background, Stack};
//! use arbor_ui::Document;
//!
//! let mut doc = Document::with_defaults().unwrap();
//! let fill = doc.create(Background::new(Color::RED));
//! let root = doc.create_with_child(Stack::new(), fill).unwrap();
//! doc.set_root(root).unwrap();
//! assert!(doc.render());
//! assert_eq!(doc.size(fill).unwrap(), Size::new(800.0, 600.0));
//! ```

mod document;
mod element;
pub mod elements;
pub mod inline_layout;
mod options;
pub mod pointer_events;
mod signal;
mod tree;

pub use document::Document;
pub use element::ElementKind;
pub use options::DocumentOptions;
pub use pointer_events::{HitTestMode, PointerEventManager};
pub use signal::SubscriptionToken;

#[cfg(test)]
pub(crate) mod test_utils {
    use std::rc::Rc;

    use arbor_core::Size;
    use arbor_text::{ApproximateTextBackend, ApproximateTextConfig, TextStyle};

    use crate::{Document, DocumentOptions};

    /// Every character is half the font size wide.
    pub(crate) fn test_backend() -> Rc<ApproximateTextBackend> {
        let config = ApproximateTextConfig { advance_factor: 0.5, ..Default::default() };
        Rc::new(ApproximateTextBackend::new(config).unwrap())
    }

    pub(crate) fn test_document(viewport: Size) -> Document {
        let options = DocumentOptions {
            viewport,
            default_text_style: TextStyle::with_size(10.0),
        };
        Document::new(options, test_backend()).unwrap()
    }
}
