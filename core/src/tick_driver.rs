use std::cell::RefCell;
use std::rc::Rc;

use sim_types::{handler, EngineState, Event, EventBus, EventKind, Handler};

/// Subscribes to `run_started` and, on receipt, publishes exactly
/// `max_ticks` `engine_tick` events, each carrying a freshly allocated tick
/// and sequence (spec §4.2). Because the bus dispatches synchronously and
/// depth-first, every tick's downstream reactions (market data, strategy,
/// execution) complete before this loop advances to the next tick.
pub struct TickDriverComponent {
    bus: Rc<EventBus>,
    state: Rc<RefCell<EngineState>>,
    max_ticks: u64,
}

impl std::fmt::Debug for TickDriverComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickDriverComponent")
            .field("max_ticks", &self.max_ticks)
            .finish()
    }
}

impl TickDriverComponent {
    pub fn new(bus: Rc<EventBus>, state: Rc<RefCell<EngineState>>, max_ticks: u64) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self { bus, state, max_ticks }))
    }

    pub fn subscriptions(this: &Rc<RefCell<Self>>) -> Vec<(&'static str, Handler)> {
        let driver = Rc::clone(this);
        vec![(
            "system.run_started",
            handler(move |_event: &Event| driver.borrow_mut().on_run_started()),
        )]
    }

    fn on_run_started(&mut self) {
        for _ in 0..self.max_ticks {
            let tick = match self.state.borrow_mut().next_tick() {
                Ok(tick) => tick,
                Err(err) => {
                    tracing::error!(error = %err, "tick driver failed to advance tick");
                    return;
                }
            };
            let sequence = match self.state.borrow_mut().next_sequence() {
                Ok(sequence) => sequence,
                Err(err) => {
                    tracing::error!(error = %err, "tick driver failed to allocate sequence");
                    return;
                }
            };
            self.bus.publish(&Event::new(sequence, EventKind::EngineTick { tick: tick.value() }));
        }
    }
}
