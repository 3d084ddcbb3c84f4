//! Run spec, on-disk artifact layout, wiring snapshot, and the composition
//! function that wires a complete engine from the three together (spec
//! §4.12-§4.15).

pub mod artifacts;
pub mod assembly;
pub mod meta;
pub mod spec;

pub use artifacts::{validate_run_id, RunArtifacts};
pub use assembly::{assemble_run, RunHandle};
pub use meta::{ComponentDescriptor, WiringSnapshot};
pub use spec::{
    ExecutionKind, ExecutionSpec, FixedSpreadParams, MarketDataSpec, ReplayL2Spec, RiskLimitsSpec,
    RunMode, RunSpec, StrategyKind, StrategySpec,
};
