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

//! Composition root of the market-making simulation engine.
//!
//! Everything downstream of this crate (types, data, risk, strategy,
//! strategies, execution, analytics) is a library of components that only
//! know how to subscribe to and publish on an [`sim_types::EventBus`]. This
//! crate is the one place that knows how to wire them together for a given
//! [`run::RunSpec`]: [`lifecycle`] and [`tick_driver`] drive the run,
//! [`router`] records the wiring, [`journal`] persists every event, and
//! [`run::assembly`] is the single function that builds all of it from a
//! run mode.

pub mod engine;
pub mod error;
pub mod journal;
pub mod lifecycle;
pub mod logging;
pub mod router;
pub mod run;
pub mod shutdown;
pub mod tick_driver;

pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use journal::EventJournal;
pub use lifecycle::EngineLifecycle;
pub use router::{EngineRouter, WiredSubscription};
pub use run::{assemble_run, RunArtifacts, RunHandle, RunSpec};
pub use tick_driver::TickDriverComponent;
