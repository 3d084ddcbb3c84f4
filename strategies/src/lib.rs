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

//! Concrete strategy implementations. Currently a single fixed-spread
//! market maker (spec §4.10).

pub mod fixed_spread;

pub use fixed_spread::{FixedSpreadConfig, FixedSpreadMarketMaker};
