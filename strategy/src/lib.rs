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

//! Strategy component contract for the simulation engine.
//!
//! A strategy is a consumer of market/order events and a producer of
//! `order.submitted`/`order.cancel_requested` intents, mediated entirely by
//! the event bus (SPEC_FULL.md §9: strategy and execution hold no reference
//! to each other). This crate carries no concrete strategy — see
//! `sim-strategies` for `FixedSpreadMarketMaker`.

use sim_types::Handler;

/// Capability contract a strategy component exposes to the router: the set
/// of `(event_type, handler)` pairs it wants registered, in order.
///
/// Concrete strategies implement this as an inherent `subscriptions`
/// function taking `&Rc<RefCell<Self>>` (since a handler closure must
/// capture a cloned `Rc` to mutate strategy state); this trait documents
/// the shape every such function follows.
pub trait StrategyComponent {
    fn subscriptions(&self) -> Vec<(&'static str, Handler)>;
}
