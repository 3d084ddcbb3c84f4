use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Monotonically increasing replay-ordering key allocated by [`crate::EngineState`].
///
/// `Sequence` is the sole ordering key for event replay (spec §3, §5, §8
/// invariant 1): persisted events form the strictly increasing run `1, 2, 3, …`
/// with no gaps.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Sequence(pub u64);

impl Sequence {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Sequence(self.0 + 1)
    }
}

/// A scalar tick counter; one iteration of the engine loop, not wall time.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(pub u64);

impl Tick {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Tick(self.0 + 1)
    }
}

/// Fixed epsilon used for all float equality/executability comparisons
/// (spec §4.7, §4.8, §9).
pub const EPS: f64 = 1e-12;

pub fn approx_ge(a: f64, b: f64) -> bool {
    a + EPS >= b
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS
}

pub fn approx_zero(a: f64) -> bool {
    a.abs() <= EPS
}
