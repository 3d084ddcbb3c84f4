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

//! Risk/inventory time series, summary statistics, and artifact sinks for a
//! completed or in-flight run (spec §4.16).

pub mod collector;
pub mod series;
pub mod sink;

pub use collector::RiskInventoryCollector;
pub use series::{RiskInventorySeries, RiskInventorySummary};
pub use sink::{AnalyticsError, JsonRiskInventorySink, RiskInventorySink};
