use crate::{Sequence, SimError, Tick};

/// `{ run_id, tick, sequence, is_running }` (spec §3). Tick and sequence only
/// advance while `is_running`; sequence is strictly increasing across every
/// event emitted within a run (spec §8 invariant 1).
///
/// Shared (via `Rc<RefCell<EngineState>>`) by every component that allocates
/// a sequence number when it emits an event — the order book adapter, the
/// replay adapter, the paper execution adapter, and the strategy all mint
/// sequence numbers from the same counter, which is what makes dispatch
/// order and sequence order coincide (spec §4.11).
#[derive(Debug, Clone)]
pub struct EngineState {
    run_id: String,
    tick: Tick,
    sequence: Sequence,
    is_running: bool,
}

impl EngineState {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            tick: Tick::default(),
            sequence: Sequence::default(),
            is_running: false,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Allocates and returns the next sequence number. Only valid while the
    /// engine is running.
    pub fn next_sequence(&mut self) -> Result<Sequence, SimError> {
        if !self.is_running {
            return Err(SimError::Lifecycle(
                "cannot allocate sequence while engine is not running".into(),
            ));
        }
        self.sequence = self.sequence.next();
        Ok(self.sequence)
    }

    /// Allocates and returns the next tick. Only valid while the engine is
    /// running.
    pub fn next_tick(&mut self) -> Result<Tick, SimError> {
        if !self.is_running {
            return Err(SimError::Lifecycle(
                "cannot advance tick while engine is not running".into(),
            ));
        }
        self.tick = self.tick.next();
        Ok(self.tick)
    }

    /// Transitions the engine into the running state, resetting tick and
    /// sequence counters. Errors if already running (spec §7 lifecycle
    /// errors). Called by [`crate::EngineLifecycle`]-equivalent orchestration
    /// in the composition-root crate, never by domain components directly.
    pub fn reset_and_start(&mut self) -> Result<(), SimError> {
        if self.is_running {
            return Err(SimError::Lifecycle("engine already running".into()));
        }
        self.tick = Tick::default();
        self.sequence = Sequence::default();
        self.is_running = true;
        Ok(())
    }

    /// Transitions the engine out of the running state. Errors if already
    /// stopped (spec §7 lifecycle errors).
    pub fn mark_stopped(&mut self) -> Result<(), SimError> {
        if !self.is_running {
            return Err(SimError::Lifecycle("engine already stopped".into()));
        }
        self.is_running = false;
        Ok(())
    }
}
