use sim_types::SimError;

use super::delta::OrderBookDelta;

/// A lazy, finite, non-restartable sequence of [`OrderBookDelta`]s
/// (spec §4.5). Implemented directly as a Rust `Iterator`: `next()` returning
/// `None` signals exhaustion, matching the "further ticks are no-ops" rule
/// the replay adapter applies once the source is drained.
pub trait ReplayDataSource: Iterator<Item = Result<OrderBookDelta, SimError>> {}

impl<T> ReplayDataSource for T where T: Iterator<Item = Result<OrderBookDelta, SimError>> {}

/// An in-memory replay source, useful for tests and for `InMemory`/fixture
/// driven runs.
#[derive(Debug, Clone)]
pub struct InMemoryReplayDataSource {
    deltas: std::vec::IntoIter<OrderBookDelta>,
}

impl InMemoryReplayDataSource {
    pub fn new(deltas: Vec<OrderBookDelta>) -> Self {
        Self {
            deltas: deltas.into_iter(),
        }
    }
}

impl Iterator for InMemoryReplayDataSource {
    type Item = Result<OrderBookDelta, SimError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.deltas.next().map(Ok)
    }
}
