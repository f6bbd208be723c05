//! Subscription registry for event callbacks.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::warn;

/// Handle returned when subscribing; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

/// Hands out tokens that are unique within one owner.
#[derive(Debug, Default)]
pub(crate) struct TokenSource {
    next: u64,
}

impl TokenSource {
    pub(crate) fn next(&mut self) -> SubscriptionToken {
        self.next += 1;
        SubscriptionToken(self.next)
    }
}

/// A callback given mutable access to the context that owns the signal.
pub(crate) type Handler<C, E> = Rc<RefCell<dyn FnMut(&mut C, &E)>>;

/// An ordered list of callbacks for one kind of event.
///
/// Callbacks run in the order they were connected. Disconnecting keeps the
/// relative order of the remaining callbacks.
pub(crate) struct Signal<C, E> {
    handlers: IndexMap<SubscriptionToken, Handler<C, E>>,
}

impl<C, E> Default for Signal<C, E> {
    fn default() -> Self {
        Self { handlers: IndexMap::new() }
    }
}

impl<C, E> Signal<C, E> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn connect(&mut self, token: SubscriptionToken, handler: Handler<C, E>) {
        self.handlers.insert(token, handler);
    }

    /// Returns false if the token was not connected to this signal.
    pub(crate) fn disconnect(&mut self, token: SubscriptionToken) -> bool {
        self.handlers.shift_remove(&token).is_some()
    }

    pub(crate) fn contains(&self, token: SubscriptionToken) -> bool {
        self.handlers.contains_key(&token)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// The connected callbacks, detached from the signal so they can run
    /// while its owner is borrowed mutably.
    pub(crate) fn handlers(&self) -> Vec<(SubscriptionToken, Handler<C, E>)> {
        self.handlers.iter().map(|(token, handler)| (*token, Rc::clone(handler))).collect()
    }
}

impl<C, E> fmt::Debug for Signal<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal").field("handlers", &self.handlers.len()).finish()
    }
}

/// Run `handlers` in order against `ctx`.
///
/// A callback disconnected by an earlier one in the same dispatch is
/// skipped. Callbacks connected during the dispatch first run on the next
/// one.
pub(crate) fn dispatch<C, E>(
    ctx: &mut C,
    handlers: Vec<(SubscriptionToken, Handler<C, E>)>,
    event: &E,
    is_connected: impl Fn(&C, SubscriptionToken) -> bool,
) {
    for (token, handler) in handlers {
        if !is_connected(ctx, token) {
            continue;
        }
        match handler.try_borrow_mut() {
            Ok(mut handler) => (&mut *handler)(ctx, event),
            Err(_) => warn!(?token, "handler is already running"),
        }
    }
}
