//! Standardized logging configuration for the simulation engine.
//!
//! ## Standard logging (human-readable)
//! ```rust,ignore
//! use sim_core::logging::init_logging;
//!
//! init_logging();
//! tracing::info!("run starting");
//! ```
//!
//! ## JSON logging (aggregators / observability)
//! ```rust,ignore
//! use sim_core::logging::init_json_logging;
//!
//! init_json_logging();
//! tracing::info!("run starting");
//! ```
//!
//! Both default to `info` and honor `RUST_LOG` (e.g.
//! `RUST_LOG=sim_core=debug,sim_execution=warn`).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer())
        .init()
}

pub fn init_json_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
        .init()
}
