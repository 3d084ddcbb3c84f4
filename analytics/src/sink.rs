use std::fs::File;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::series::RiskInventorySummary;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("io error writing risk/inventory summary: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error serializing risk/inventory summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Emission contract for the risk/inventory summary artifact (spec §4.16).
/// A full columnar parquet writer is outside this crate's dependency stack;
/// [`JsonRiskInventorySink`] is the implementation actually wired in, and is
/// the documented substitute for `risk_inventory.parquet`.
pub trait RiskInventorySink {
    fn write(&self, summary: &RiskInventorySummary) -> Result<(), AnalyticsError>;
}

/// Writes `risk_inventory_summary.json`: compact, sorted-key JSON, matching
/// the journal's serialization convention (spec §4.11).
#[derive(Debug, Clone)]
pub struct JsonRiskInventorySink {
    path: std::path::PathBuf,
}

impl JsonRiskInventorySink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl RiskInventorySink for JsonRiskInventorySink {
    fn write(&self, summary: &RiskInventorySummary) -> Result<(), AnalyticsError> {
        let value = serde_json::to_value(summary)?;
        let body = serde_json::to_string(&value)?;
        let mut file = File::create(&self.path)?;
        file.write_all(body.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }
}
