use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{Event, SimError};

/// A handler invoked synchronously for every event published under the
/// subscribed `event_type`. Boxed as a trait object behind an `Rc<RefCell<_>>`
/// so that a component can close over its own mutable state while still
/// allowing the bus to re-enter `publish` from inside a handler (spec §5:
/// re-entrant publishes complete depth-first before the outer publish
/// returns).
pub type Handler = Rc<RefCell<dyn FnMut(&Event)>>;

/// Opaque receipt returned by [`EventBus::subscribe`], recording which
/// event type a handler was registered under. Carries no handler identity
/// beyond that — the bus has no `unsubscribe` (spec never requires one).
#[derive(Debug, Clone)]
pub struct Subscription {
    pub event_type: &'static str,
}

/// Synchronous, single-threaded publish/subscribe registry (spec §4.1).
///
/// `publish` dispatches to the handlers registered for `event.event_type()`
/// in subscription order, with no fan-out to wildcard or parent types.
/// Handler panics are not caught here: the bus never swallows errors.
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<HashMap<&'static str, Vec<Handler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `event_type`. Returns `Err` if `event_type`
    /// is empty (spec §4.1).
    pub fn subscribe(&self, event_type: &'static str, handler: Handler) -> Result<Subscription, SimError> {
        if event_type.is_empty() {
            return Err(SimError::EmptyEventType);
        }
        self.handlers
            .borrow_mut()
            .entry(event_type)
            .or_default()
            .push(handler);
        Ok(Subscription { event_type })
    }

    /// Dispatches `event` to every handler subscribed to its `event_type`,
    /// in subscription order. The handler list is cloned (cheap `Rc` clones)
    /// out from behind the borrow before invoking any handler, so a handler
    /// may call `publish` again without double-borrowing `self.handlers`.
    pub fn publish(&self, event: &Event) {
        let handlers: Vec<Handler> = self
            .handlers
            .borrow()
            .get(event.event_type())
            .cloned()
            .unwrap_or_default();
        for handler in handlers {
            (handler.borrow_mut())(event);
        }
    }

    pub fn subscriber_count(&self, event_type: &str) -> usize {
        self.handlers
            .borrow()
            .get(event_type)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field(
                "event_types",
                &self.handlers.borrow().keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Convenience constructor for wrapping a closure as a [`Handler`].
pub fn handler<F: FnMut(&Event) + 'static>(f: F) -> Handler {
    Rc::new(RefCell::new(f))
}
