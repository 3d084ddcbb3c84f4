use std::cell::RefCell;
use std::rc::Rc;

use sim_types::{EngineState, Event, EventBus, EventKind, SimResult};

/// Explicit start/stop controller (spec §4.2). `start` resets tick and
/// sequence to zero, enters the running state, allocates a sequence, and
/// publishes `run_started`. `stop` allocates a sequence while still running,
/// exits the running state, then publishes `run_stopped`. Double-start or
/// double-stop is a lifecycle error (spec §7).
#[derive(Debug)]
pub struct EngineLifecycle {
    bus: Rc<EventBus>,
    state: Rc<RefCell<EngineState>>,
}

impl EngineLifecycle {
    pub fn new(bus: Rc<EventBus>, state: Rc<RefCell<EngineState>>) -> Self {
        Self { bus, state }
    }

    pub fn start(&self) -> SimResult<()> {
        self.state.borrow_mut().reset_and_start()?;
        let sequence = self.state.borrow_mut().next_sequence()?;
        self.bus.publish(&Event::new(sequence, EventKind::RunStarted));
        tracing::info!(run_id = %self.state.borrow().run_id(), "engine.started");
        Ok(())
    }

    pub fn stop(&self) -> SimResult<()> {
        let sequence = self.state.borrow_mut().next_sequence()?;
        self.state.borrow_mut().mark_stopped()?;
        self.bus.publish(&Event::new(sequence, EventKind::RunStopped));
        tracing::info!(run_id = %self.state.borrow().run_id(), "engine.stopped");
        Ok(())
    }
}
