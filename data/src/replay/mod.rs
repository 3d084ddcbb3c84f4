pub mod adapter;
pub mod datasource;
pub mod delta;
pub mod jsonl;

pub use adapter::ReplayMarketDataAdapter;
pub use datasource::{InMemoryReplayDataSource, ReplayDataSource};
pub use delta::{normalize_l2_delta, OrderBookDelta};
pub use jsonl::JsonlReplayDataSource;
