//! Assembly-level integration tests (spec §8): build a complete run from a
//! [`RunSpec`] the way an external run manager would, run it to completion,
//! and check the on-disk artifacts it produces.

use std::collections::BTreeMap;
use std::io::Write;

use sim_analytics::JsonRiskInventorySink;
use sim_core::run::{
    assemble_run, ExecutionKind, ExecutionSpec, FixedSpreadParams, MarketDataSpec, ReplayL2Spec,
    RiskLimitsSpec, RunArtifacts, RunMode, RunSpec, StrategyKind, StrategySpec,
};

fn write_replay_fixture(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("replay.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    // Seeds two bid and two ask levels, modifies the second level on each
    // side, then deletes the second level on each side (spec §8 S1).
    writeln!(
        file,
        r#"{{"symbol":"BTC-USD","bid_updates":[[100.0,1.0],[99.0,2.0]],"ask_updates":[[101.0,1.0],[102.0,2.0]]}}"#
    )
    .unwrap();
    writeln!(
        file,
        r#"{{"symbol":"BTC-USD","bid_updates":[[99.0,3.0]],"ask_updates":[[102.0,3.0]]}}"#
    )
    .unwrap();
    writeln!(
        file,
        r#"{{"symbol":"BTC-USD","bid_updates":[[99.0,0.0]],"ask_updates":[[102.0,0.0]]}}"#
    )
    .unwrap();
    path
}

fn replay_spec(replay_path: &std::path::Path) -> RunSpec {
    RunSpec {
        schema_version: 1,
        symbol: "BTC-USD".to_string(),
        created_at_utc: chrono::Utc::now(),
        seed: None,
        tags: BTreeMap::new(),
        marketdata: MarketDataSpec {
            mode: RunMode::PaperReplayL2,
            replay_l2: Some(ReplayL2Spec {
                path: replay_path.to_string_lossy().into_owned(),
                format: None,
            }),
        },
        execution: ExecutionSpec {
            kind: ExecutionKind::Paper,
            risk: RiskLimitsSpec {
                max_order_qty: 100.0,
                max_abs_inventory: 100.0,
                max_order_notional: None,
            },
        },
        strategy: StrategySpec {
            kind: StrategyKind::FixedSpread,
            fixed_spread: FixedSpreadParams {
                spread: 0.2,
                order_size: 1.0,
                max_inventory: 10.0,
                inventory_skew_k: 0.0,
                min_mid_move: 0.0,
                min_ticks_between_quotes: 1,
            },
        },
    }
}

fn read_journal_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn replay_smoke_produces_order_book_levels_and_bbo() {
    let runs_dir = tempfile::tempdir().unwrap();
    let replay_path = write_replay_fixture(runs_dir.path());
    let spec = replay_spec(&replay_path);

    let artifacts = RunArtifacts::for_run(runs_dir.path(), "run-s1").unwrap();
    std::fs::create_dir_all(artifacts.run_dir()).unwrap();

    let handle = assemble_run(&spec, "run-s1", 3, &artifacts, false).unwrap();
    handle.run().unwrap();

    let events = read_journal_lines(&artifacts.events_path());
    assert!(!events.is_empty(), "journal must not be empty");

    let level_events = events
        .iter()
        .filter(|e| e["event_type"] == "market.order_book_level")
        .count();
    assert!(level_events >= 1, "expected at least one order_book_level event");

    let bbo_events = events
        .iter()
        .filter(|e| e["event_type"] == "market.best_bid_ask")
        .count();
    assert!(bbo_events >= 1, "expected at least one best_bid_ask event");

    assert!(artifacts.config_path().exists());
    assert!(artifacts.meta_path().exists());
}

#[test]
fn sequence_is_strictly_increasing_across_the_whole_journal() {
    let runs_dir = tempfile::tempdir().unwrap();
    let replay_path = write_replay_fixture(runs_dir.path());
    let spec = replay_spec(&replay_path);

    let artifacts = RunArtifacts::for_run(runs_dir.path(), "run-seq").unwrap();
    std::fs::create_dir_all(artifacts.run_dir()).unwrap();

    let handle = assemble_run(&spec, "run-seq", 3, &artifacts, false).unwrap();
    handle.run().unwrap();

    let events = read_journal_lines(&artifacts.events_path());
    let sequences: Vec<u64> = events.iter().map(|e| e["sequence"].as_u64().unwrap()).collect();
    for pair in sequences.windows(2) {
        assert!(pair[1] > pair[0], "sequence must be strictly increasing: {sequences:?}");
    }
}

#[test]
fn meta_json_records_the_fixed_component_wiring_order() {
    let runs_dir = tempfile::tempdir().unwrap();
    let replay_path = write_replay_fixture(runs_dir.path());
    let spec = replay_spec(&replay_path);

    let artifacts = RunArtifacts::for_run(runs_dir.path(), "run-meta").unwrap();
    std::fs::create_dir_all(artifacts.run_dir()).unwrap();

    let handle = assemble_run(&spec, "run-meta", 1, &artifacts, false).unwrap();
    handle.run().unwrap();

    let meta: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(artifacts.meta_path()).unwrap()).unwrap();
    assert_eq!(meta["run_id"], "run-meta");
    assert_eq!(meta["mode"], "paper_replay_l2");
    assert_eq!(meta["strategy_kind"], "fixed_spread");
    assert_eq!(meta["execution_kind"], "paper");

    let components = meta["components"].as_array().unwrap();
    let kinds: Vec<&str> = components.iter().map(|c| c["type"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        vec![
            "event_journal",
            "tick_driver",
            "replay_adapter",
            "book_adapter",
            "strategy",
            "execution",
            "risk_inventory_collector",
        ]
    );
}

#[test]
fn paper_no_marketdata_mode_wires_strategy_and_execution_only() {
    let runs_dir = tempfile::tempdir().unwrap();
    let mut spec = replay_spec(&runs_dir.path().join("unused.jsonl"));
    spec.marketdata = MarketDataSpec {
        mode: RunMode::PaperNoMarketdata,
        replay_l2: None,
    };

    let artifacts = RunArtifacts::for_run(runs_dir.path(), "run-diag").unwrap();
    std::fs::create_dir_all(artifacts.run_dir()).unwrap();

    let handle = assemble_run(&spec, "run-diag", 2, &artifacts, false).unwrap();
    handle.run().unwrap();

    let meta: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(artifacts.meta_path()).unwrap()).unwrap();
    let kinds: Vec<&str> = meta["components"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["event_journal", "tick_driver", "strategy", "execution", "risk_inventory_collector"]
    );
}

#[test]
fn risk_inventory_summary_writes_alongside_other_artifacts() {
    let runs_dir = tempfile::tempdir().unwrap();
    let replay_path = write_replay_fixture(runs_dir.path());
    let spec = replay_spec(&replay_path);

    let artifacts = RunArtifacts::for_run(runs_dir.path(), "run-summary").unwrap();
    std::fs::create_dir_all(artifacts.run_dir()).unwrap();

    let handle = assemble_run(&spec, "run-summary", 3, &artifacts, false).unwrap();
    handle.run().unwrap();

    let sink = JsonRiskInventorySink::new(artifacts.risk_inventory_summary_path());
    handle.write_risk_inventory_summary(&sink).unwrap();

    assert!(artifacts.risk_inventory_summary_path().exists());
}
