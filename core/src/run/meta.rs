use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use sim_types::SimResult;

use crate::router::WiredSubscription;

/// One entry in `meta.json`'s `components` list: a component's kind tag and
/// the module it lives in, for provenance (spec §6).
#[derive(Debug, Clone, Serialize)]
pub struct ComponentDescriptor {
    pub r#type: String,
    pub module: String,
}

impl ComponentDescriptor {
    pub fn new(r#type: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            module: module.into(),
        }
    }
}

/// `meta.json`: the wiring snapshot and provenance record written once at
/// assembly time (spec §6).
#[derive(Debug, Clone, Serialize)]
pub struct WiringSnapshot {
    pub run_id: String,
    pub spec_hash: String,
    pub symbol: String,
    pub mode: String,
    pub strategy_kind: String,
    pub execution_kind: String,
    pub components: Vec<ComponentDescriptor>,
    pub router_wiring: Vec<WiredSubscription>,
}

impl WiringSnapshot {
    pub fn write_to(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }
}
