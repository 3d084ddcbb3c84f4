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

//! Pre-trade risk checks and inventory/reservation accounting for the paper
//! execution adapter.

pub mod limits;
pub mod manager;
pub mod reason;

pub use limits::RiskLimits;
pub use manager::RiskManager;
pub use reason::RejectReason;
