use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use arbor_core::{BoxConstraints, ElementId, PointerEvent, Position, ResponderEventType, Size};

use crate::document::Document;
use crate::element::ElementBehavior;
use crate::pointer_events::HitTestMode;

/// Callback receiving pointer notifications for a responder, with the
/// document it belongs to.
pub type ResponderHandler =
    Rc<RefCell<dyn FnMut(&mut Document, &PointerEvent, ResponderEventType)>>;

/// Receives add/update/remove notifications for pointers over its child.
#[derive(Clone)]
pub struct Responder {
    pub mode: HitTestMode,
    pub handler: Option<ResponderHandler>,
}

impl Default for Responder {
    fn default() -> Self {
        Self { mode: HitTestMode::PassToParent, handler: None }
    }
}

impl Responder {
    pub fn new<F>(handler: F) -> Self
    where
        F: FnMut(&mut Document, &PointerEvent, ResponderEventType) + 'static,
    {
        Self { handler: Some(Rc::new(RefCell::new(handler))), ..Self::default() }
    }

    /// Share an existing handler, as split inline spans do.
    pub fn from_handler(handler: ResponderHandler) -> Self {
        Self { handler: Some(handler), ..Self::default() }
    }

    pub fn with_mode(mut self, mode: HitTestMode) -> Self {
        self.mode = mode;
        self
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder")
            .field("mode", &self.mode)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl ElementBehavior for Responder {
    fn name(&self) -> &'static str {
        "Responder"
    }

    fn hit_test_mode(&self) -> HitTestMode {
        self.mode
    }

    fn layout(&mut self, doc: &mut Document, id: ElementId, constraints: BoxConstraints) -> Size {
        let Some(child) = doc.first_child(id) else {
            return constraints.min_size();
        };
        let child_size = doc.layout_child(child, constraints.make_loose());
        doc.set_rel_position(child, Position::ZERO);
        constraints.constrain(child_size)
    }
}
