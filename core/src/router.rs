use std::collections::HashSet;
use std::rc::Rc;

use serde::Serialize;
use sim_types::{EventBus, Handler};

/// A single `(component, event_type)` pair produced by registration, in the
/// order it was wired (spec §9: "wiring is explicit and ordered").
#[derive(Debug, Clone, Serialize)]
pub struct WiredSubscription {
    pub component: String,
    pub event_type: &'static str,
}

/// Wires components onto an [`EventBus`] deterministically: components are
/// registered in the order given, and each component's own subscription
/// list is preserved in order (spec §9). Detects accidental duplicate
/// wiring of the same component/event_type pair.
#[derive(Debug)]
pub struct EngineRouter {
    bus: Rc<EventBus>,
    wiring: Vec<WiredSubscription>,
    seen: HashSet<(String, &'static str)>,
}

impl EngineRouter {
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            wiring: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Registers one component's subscriptions, in the order given.
    ///
    /// # Panics
    /// Panics if the same `(component, event_type)` pair is registered
    /// twice — this is a wiring bug, not a runtime condition.
    pub fn register(&mut self, component: &str, subscriptions: Vec<(&'static str, Handler)>) {
        for (event_type, handler) in subscriptions {
            let key = (component.to_string(), event_type);
            if !self.seen.insert(key) {
                panic!("duplicate subscription detected: component={component} event_type={event_type}");
            }
            self.bus
                .subscribe(event_type, handler)
                .expect("subscription event_type is a non-empty static tag");
            self.wiring.push(WiredSubscription {
                component: component.to_string(),
                event_type,
            });
        }
    }

    pub fn wiring(&self) -> &[WiredSubscription] {
        &self.wiring
    }
}
