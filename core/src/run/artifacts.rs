use std::path::PathBuf;

use sim_types::{SimError, SimResult};

/// Enforces the same conservative charset as the system this was distilled
/// from: letters, digits, underscore, hyphen, `1..=128` characters. Rejects
/// anything a path-join could turn into an escape (`..`, `/`, `\`).
pub fn validate_run_id(run_id: &str) -> SimResult<()> {
    let valid = !run_id.is_empty()
        && run_id.len() <= 128
        && run_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SimError::InvalidRunId(run_id.to_string()))
    }
}

/// Path-bearing view of a run directory's on-disk contract (spec §6).
/// Computes paths only; does not create the directory or any file under
/// it, that is the external run manager's responsibility (spec §1).
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    run_dir: PathBuf,
}

impl RunArtifacts {
    /// Builds the artifact path set for `run_id` under `runs_dir`, after
    /// validating `run_id`'s charset.
    pub fn for_run(runs_dir: impl Into<PathBuf>, run_id: &str) -> SimResult<Self> {
        validate_run_id(run_id)?;
        Ok(Self {
            run_dir: runs_dir.into().join(run_id),
        })
    }

    pub fn run_dir(&self) -> &PathBuf {
        &self.run_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.run_dir.join("config.json")
    }

    pub fn meta_path(&self) -> PathBuf {
        self.run_dir.join("meta.json")
    }

    pub fn events_path(&self) -> PathBuf {
        self.run_dir.join("events.jsonl")
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.run_dir.join("metrics.json")
    }

    pub fn evaluation_path(&self) -> PathBuf {
        self.run_dir.join("evaluation.json")
    }

    pub fn risk_inventory_summary_path(&self) -> PathBuf {
        self.run_dir.join("risk_inventory_summary.json")
    }

    pub fn risk_inventory_parquet_path(&self) -> PathBuf {
        self.run_dir.join("risk_inventory.parquet")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_escape_run_ids() {
        assert!(validate_run_id("../etc").is_err());
        assert!(validate_run_id("foo/bar").is_err());
        assert!(validate_run_id("").is_err());
    }

    #[test]
    fn accepts_conservative_charset() {
        assert!(validate_run_id("run-2026_07_30").is_ok());
    }

    #[test]
    fn computes_paths_under_run_dir() {
        let artifacts = RunArtifacts::for_run("/tmp/runs", "run-1").unwrap();
        assert_eq!(artifacts.config_path(), PathBuf::from("/tmp/runs/run-1/config.json"));
        assert_eq!(artifacts.events_path(), PathBuf::from("/tmp/runs/run-1/events.jsonl"));
    }
}
