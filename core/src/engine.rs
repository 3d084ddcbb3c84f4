use std::cell::RefCell;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::rc::Rc;

use sim_types::{EngineState, Event, EventBus, EventKind, SimResult};

use crate::lifecycle::EngineLifecycle;

/// Top-level run driver (spec §7: "the engine catches, emits `engine_error`
/// ... and re-raises; the lifecycle is force-stopped").
///
/// `start()` triggers the entire synchronous tick loop as one nested
/// dispatch of `run_started` (the tick driver component does the actual
/// tick emission), so wrapping that single call in [`catch_unwind`] is
/// sufficient to observe a panic from anywhere in the run.
#[derive(Debug)]
pub struct Engine {
    bus: Rc<EventBus>,
    state: Rc<RefCell<EngineState>>,
    lifecycle: EngineLifecycle,
}

impl Engine {
    pub fn new(bus: Rc<EventBus>, state: Rc<RefCell<EngineState>>) -> Self {
        let lifecycle = EngineLifecycle::new(Rc::clone(&bus), Rc::clone(&state));
        Self { bus, state, lifecycle }
    }

    /// Runs to completion (or to a fatal handler panic). On panic: emits
    /// `engine_error`, force-stops the lifecycle if still running, then
    /// resumes the panic so the caller observes the original failure.
    pub fn run(&self) -> SimResult<()> {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.lifecycle.start()));

        match outcome {
            Ok(start_result) => start_result?,
            Err(panic_payload) => {
                let message = panic_message(&panic_payload);
                tracing::error!(%message, "engine.crashed");
                if self.state.borrow().is_running() {
                    if let Ok(sequence) = self.state.borrow_mut().next_sequence() {
                        self.bus.publish(&Event::new(
                            sequence,
                            EventKind::EngineError {
                                error_type: "panic".to_string(),
                                message,
                            },
                        ));
                    }
                    let _ = self.lifecycle.stop();
                }
                resume_unwind(panic_payload);
            }
        }

        if self.state.borrow().is_running() {
            self.lifecycle.stop()?;
        }
        Ok(())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
