//! Graceful shutdown signal for the engine's collaborator layer (spec §5:
//! "external callers may request a run to stop").
//!
//! The engine itself has no timers or background workers, so only the
//! synchronous form is carried: a run either completes its ticks or is
//! asked to stop, and stop is observed at the next `lifecycle.stop()` call.

use serde::{Deserialize, Serialize};

/// A component that can shut down immediately without async operations.
pub trait SyncShutdown {
    type Result;
    fn shutdown(&mut self) -> Self::Result;
}

/// Marker signal that a graceful shutdown should be initiated.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize,
)]
pub struct Shutdown;
