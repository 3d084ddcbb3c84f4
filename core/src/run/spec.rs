use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sim_risk::RiskLimits;
use sim_strategies::FixedSpreadConfig;
use sim_types::SimResult;

/// Which market-data components are wired for a run (spec §6). Determines
/// the component list a run assembles: `paper_replay_l2` wires the replay
/// adapter and book adapter; `paper_external_bbo` expects the caller to
/// publish `market.best_bid_ask` directly; `paper_no_marketdata` wires
/// neither (diagnostics only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    PaperNoMarketdata,
    PaperExternalBbo,
    PaperReplayL2,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::PaperNoMarketdata => "paper_no_marketdata",
            RunMode::PaperExternalBbo => "paper_external_bbo",
            RunMode::PaperReplayL2 => "paper_replay_l2",
        }
    }
}

/// `marketdata.replay_l2` sub-object: path to a JSONL replay file and an
/// optional free-form format tag (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayL2Spec {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// `marketdata` section of the run spec (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDataSpec {
    pub mode: RunMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_l2: Option<ReplayL2Spec>,
}

/// Execution venue kind. Only one exists (spec §6); kept as an enum for the
/// same reason the original does: new venues are additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionKind {
    Paper,
}

impl ExecutionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionKind::Paper => "paper",
        }
    }
}

/// Pre-trade risk limits as they appear in a run spec. Spec.md's
/// `execution` section does not name a risk sub-object even though a risk
/// manager is mandatory (spec §4.8); this is a supplemented, additive field
/// on `execution` rather than a new top-level section, so that an
/// `ExecutionSpec` alone carries everything needed to build the paper
/// adapter (see DESIGN.md Open Questions).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskLimitsSpec {
    pub max_order_qty: f64,
    pub max_abs_inventory: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_order_notional: Option<f64>,
}

impl From<RiskLimitsSpec> for RiskLimits {
    fn from(spec: RiskLimitsSpec) -> Self {
        RiskLimits::new(spec.max_order_qty, spec.max_abs_inventory, spec.max_order_notional)
    }
}

/// `execution` section of the run spec (spec §6, risk sub-object
/// supplemented).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSpec {
    pub kind: ExecutionKind,
    pub risk: RiskLimitsSpec,
}

/// Strategy kind. Only `fixed_spread` exists (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    FixedSpread,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::FixedSpread => "fixed_spread",
        }
    }
}

/// `strategy.fixed_spread` parameters (spec §6). Mirrors
/// [`sim_strategies::FixedSpreadConfig`] minus `symbol`, which the run spec
/// carries once at the top level and the assembly step injects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FixedSpreadParams {
    pub spread: f64,
    pub order_size: f64,
    pub max_inventory: f64,
    pub inventory_skew_k: f64,
    pub min_mid_move: f64,
    pub min_ticks_between_quotes: u64,
}

impl FixedSpreadParams {
    pub fn into_config(self, symbol: impl Into<String>) -> FixedSpreadConfig {
        FixedSpreadConfig {
            symbol: symbol.into(),
            spread: self.spread,
            order_size: self.order_size,
            max_inventory: self.max_inventory,
            inventory_skew_k: self.inventory_skew_k,
            min_mid_move: self.min_mid_move,
            min_ticks_between_quotes: self.min_ticks_between_quotes,
        }
    }
}

/// `strategy` section of the run spec (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySpec {
    pub kind: StrategyKind,
    pub fixed_spread: FixedSpreadParams,
}

/// Canonical, `serde`-deserializable model of `config.json` (spec §6).
/// `fingerprint()` is the sha256 of this value's sorted-key, whitespace-free
/// JSON encoding, matching `config_hash()` in the system this was
/// distilled from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSpec {
    pub schema_version: u32,
    pub symbol: String,
    pub created_at_utc: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    pub marketdata: MarketDataSpec,
    pub execution: ExecutionSpec,
    pub strategy: StrategySpec,
}

impl RunSpec {
    /// sha256 hex digest of the canonical (sorted-key, compact) JSON
    /// encoding of this spec. Relies on `serde_json::Value::Object`'s
    /// default `BTreeMap` backing (no "preserve_order" feature) for key
    /// ordering, same as [`sim_types::Event::to_journal_value`].
    pub fn fingerprint(&self) -> SimResult<String> {
        let canonical = serde_json::to_value(self)?;
        let compact = serde_json::to_string(&canonical)?;
        let digest = Sha256::digest(compact.as_bytes());
        Ok(hex::encode(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunSpec {
        RunSpec {
            schema_version: 1,
            symbol: "BTC-USD".to_string(),
            created_at_utc: "2026-01-01T00:00:00Z".parse().unwrap(),
            seed: Some(7),
            tags: BTreeMap::new(),
            marketdata: MarketDataSpec {
                mode: RunMode::PaperReplayL2,
                replay_l2: Some(ReplayL2Spec { path: "replay.jsonl".to_string(), format: None }),
            },
            execution: ExecutionSpec {
                kind: ExecutionKind::Paper,
                risk: RiskLimitsSpec { max_order_qty: 10.0, max_abs_inventory: 20.0, max_order_notional: None },
            },
            strategy: StrategySpec {
                kind: StrategyKind::FixedSpread,
                fixed_spread: FixedSpreadParams {
                    spread: 0.1,
                    order_size: 1.0,
                    max_inventory: 5.0,
                    inventory_skew_k: 0.0,
                    min_mid_move: 0.0,
                    min_ticks_between_quotes: 1,
                },
            },
        }
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let spec = sample();
        assert_eq!(spec.fingerprint().unwrap(), spec.fingerprint().unwrap());
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let mut spec = sample();
        let base = spec.fingerprint().unwrap();
        spec.symbol = "ETH-USD".to_string();
        assert_ne!(base, spec.fingerprint().unwrap());
    }

    #[test]
    fn run_mode_serializes_to_snake_case() {
        assert_eq!(serde_json::to_string(&RunMode::PaperReplayL2).unwrap(), "\"paper_replay_l2\"");
    }
}
