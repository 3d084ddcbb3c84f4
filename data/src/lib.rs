#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments)]

//! L2 order book reconstruction and replay market-data adapters.
//!
//! Two halves: [`book`] owns the per-symbol depth map and the adapter that
//! folds level updates into best-bid-ask events; [`replay`] owns the lazy
//! delta source abstraction and the adapter that drip-feeds deltas one per
//! engine tick.

pub mod book;
pub mod replay;

pub use book::{adapter::OrderBookAdapter, BestBidAsk, LevelUpdate, OrderBook};
pub use replay::{
    InMemoryReplayDataSource, JsonlReplayDataSource, OrderBookDelta, ReplayDataSource,
    ReplayMarketDataAdapter,
};
