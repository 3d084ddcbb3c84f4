//! Top-level error surface for the engine boundary (spec §7, §4.0).
//!
//! Validation and lifecycle failures from the lower crates all funnel
//! through [`sim_types::SimError`]; this enum exists so the composition
//! root has a single `Result` type that also covers artifact I/O and
//! summary-sink failures, without each of those crates needing to know
//! about each other's error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Sim(#[from] sim_types::SimError),

    #[error(transparent)]
    Analytics(#[from] sim_analytics::AnalyticsError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
