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

//! Core event, sequencing and bus primitives shared by every component of
//! the market-making simulation engine.
//!
//! This crate carries no domain logic (no order book, no risk, no
//! strategy) — it is the substrate every other crate in the workspace
//! depends on: the event envelope and its closed set of variants, the
//! synchronous pub/sub bus, and the run-scoped tick/sequence counters.

pub mod bus;
pub mod error;
pub mod event;
pub mod sequence;
pub mod state;

pub use bus::{handler, EventBus, Handler, Subscription};
pub use error::{SimError, SimResult};
pub use event::{
    BookSide, Event, EventKind, Liquidity, OrderStatus, OrderType, Side, TimeInForce,
};
pub use sequence::{approx_eq, approx_ge, approx_zero, Sequence, Tick, EPS};
pub use state::EngineState;
