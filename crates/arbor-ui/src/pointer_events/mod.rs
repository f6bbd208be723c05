//! Pointer input dispatch.
//!
//! A pointer event is hit tested against the laid out tree, and every
//! responder under the pointer is told whether the pointer was added to it,
//! moved over it, or left it.

mod hit_tester;
mod pointer_event_manager;

pub(crate) use hit_tester::hit_test;
pub use pointer_event_manager::{reconcile, PointerEventManager};

/// How an element takes part in hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitTestMode {
    /// Keep the element and keep testing the elements behind it
    PassThrough,
    /// Keep the element and continue with its ancestors only
    #[default]
    PassToParent,
    /// Keep the element and stop
    Absorb,
    /// Not hit testable; its children still are
    Disabled,
}
