use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::{ElementId, PointerEvent, ResponderEventType};
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::document::Document;
use crate::signal::{Handler, Signal, SubscriptionToken, TokenSource};

pub(crate) type PointerHandler = Handler<Document, PointerEvent>;

/// Responder notifications for one pointer event, in delivery order.
///
/// On pointer-up every previously hit element is removed regardless of
/// `hits`. Otherwise elements no longer hit are removed first, then every
/// hit element is added or updated, frontmost first. `prev` is replaced
/// with the new hit set, or cleared on pointer-up.
pub fn reconcile(
    prev: &mut Vec<ElementId>,
    hits: Vec<ElementId>,
    is_up: bool,
) -> Vec<(ElementId, ResponderEventType)> {
    let mut calls = Vec::with_capacity(prev.len() + hits.len());
    if is_up {
        calls.extend(prev.drain(..).map(|id| (id, ResponderEventType::Remove)));
        return calls;
    }
    for id in prev.iter() {
        if !hits.contains(id) {
            calls.push((*id, ResponderEventType::Remove));
        }
    }
    for id in &hits {
        let event_type = if prev.contains(id) {
            ResponderEventType::Update
        } else {
            ResponderEventType::Add
        };
        calls.push((*id, event_type));
    }
    *prev = hits;
    calls
}

/// Pointer listeners and the per-pointer hit state.
///
/// The [`crate::Document`] drives a dispatch. It runs the before
/// listeners, asks [`PointerEventManager::update_hits`] which responders to
/// notify, then runs the per-pointer and after listeners. Every listener
/// gets the document, so it can change the tree mid-dispatch.
#[derive(Debug, Default)]
pub struct PointerEventManager {
    tokens: TokenSource,
    before: Signal<Document, PointerEvent>,
    after: Signal<Document, PointerEvent>,
    pointers: IndexMap<i32, Signal<Document, PointerEvent>>,
    /// Present while a pointer is tracked, even when it hits nothing
    prev_hits: IndexMap<i32, Vec<ElementId>>,
}

impl PointerEventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to every pointer event. Listeners added with `after_elements`
    /// run after the responders, the others before hit testing.
    pub fn add_handler<F>(&mut self, handler: F, after_elements: bool) -> SubscriptionToken
    where
        F: FnMut(&mut Document, &PointerEvent) + 'static,
    {
        let token = self.tokens.next();
        let signal = if after_elements { &mut self.after } else { &mut self.before };
        let handler: PointerHandler = Rc::new(RefCell::new(handler));
        signal.connect(token, handler);
        token
    }

    /// Listen to the events of one pointer until it is lifted.
    pub fn start_tracking_pointer<F>(&mut self, pointer_id: i32, handler: F) -> SubscriptionToken
    where
        F: FnMut(&mut Document, &PointerEvent) + 'static,
    {
        let token = self.tokens.next();
        let handler: PointerHandler = Rc::new(RefCell::new(handler));
        self.pointers.entry(pointer_id).or_default().connect(token, handler);
        token
    }

    /// Returns false if the token is not connected.
    pub fn remove_handler(&mut self, token: SubscriptionToken) -> bool {
        if self.before.disconnect(token) || self.after.disconnect(token) {
            return true;
        }
        let Some(pointer_id) = self
            .pointers
            .iter_mut()
            .find_map(|(pointer_id, signal)| signal.disconnect(token).then_some(*pointer_id))
        else {
            return false;
        };
        if self.pointers.get(&pointer_id).is_some_and(Signal::is_empty) {
            self.pointers.shift_remove(&pointer_id);
        }
        true
    }

    /// Elements the pointer hit on its last event, or `None` if the pointer
    /// is not tracked.
    pub fn hit_elements(&self, pointer_id: i32) -> Option<&[ElementId]> {
        self.prev_hits.get(&pointer_id).map(Vec::as_slice)
    }

    pub fn tracked_pointers(&self) -> impl Iterator<Item = i32> + '_ {
        self.prev_hits.keys().copied()
    }

    pub fn is_connected(&self, token: SubscriptionToken) -> bool {
        self.before.contains(token)
            || self.after.contains(token)
            || self.pointers.values().any(|signal| signal.contains(token))
    }

    pub(crate) fn before_handlers(&self) -> Vec<(SubscriptionToken, PointerHandler)> {
        self.before.handlers()
    }

    pub(crate) fn after_handlers(&self) -> Vec<(SubscriptionToken, PointerHandler)> {
        self.after.handlers()
    }

    pub(crate) fn pointer_handlers(&self, pointer_id: i32) -> Vec<(SubscriptionToken, PointerHandler)> {
        self.pointers.get(&pointer_id).map(Signal::handlers).unwrap_or_default()
    }

    pub(crate) fn update_hits(
        &mut self,
        event: &PointerEvent,
        hits: Vec<ElementId>,
    ) -> SmallVec<[(ElementId, ResponderEventType); 8]> {
        let is_up = event.is_up();
        let prev = self.prev_hits.entry(event.pointer_id).or_default();
        let calls = reconcile(prev, hits, is_up);
        if is_up {
            self.prev_hits.shift_remove(&event.pointer_id);
        }
        calls.into_iter().collect()
    }

    /// Drop the listeners of a lifted pointer.
    pub(crate) fn finish(&mut self, event: &PointerEvent) {
        if event.is_up() {
            self.pointers.shift_remove(&event.pointer_id);
        }
    }
}
