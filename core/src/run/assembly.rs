use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::rc::Rc;

use sim_analytics::{RiskInventoryCollector, RiskInventorySink, RiskInventorySummary};
use sim_data::{JsonlReplayDataSource, OrderBookAdapter, ReplayMarketDataAdapter};
use sim_execution::{FillModel, PaperExecutionAdapter, TopOfBookCappedFillModel};
use sim_risk::{RiskLimits, RiskManager};
use sim_strategies::FixedSpreadMarketMaker;
use sim_types::{EngineState, EventBus, SimError};

use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::journal::EventJournal;
use crate::router::{EngineRouter, WiredSubscription};
use crate::tick_driver::TickDriverComponent;

use super::artifacts::{validate_run_id, RunArtifacts};
use super::meta::{ComponentDescriptor, WiringSnapshot};
use super::spec::{RunMode, RunSpec};

/// Everything a completed assembly hands back: the bus/state the caller may
/// inspect, the driver to run to completion, and handles onto the two
/// components whose state outlives the run (execution, for final
/// positions; the risk/inventory collector, for the summary artifact).
#[derive(Debug)]
pub struct RunHandle {
    pub bus: Rc<EventBus>,
    pub state: Rc<RefCell<EngineState>>,
    pub execution: Rc<RefCell<PaperExecutionAdapter>>,
    pub collector: Rc<RefCell<RiskInventoryCollector>>,
    pub wiring: Vec<WiredSubscription>,
    engine: Engine,
}

impl RunHandle {
    /// Runs the assembled engine to completion (spec §7: errors/panics
    /// propagate after the `engine_error` event and a forced stop).
    pub fn run(&self) -> EngineResult<()> {
        self.engine.run().map_err(EngineError::from)
    }

    /// Summarizes the risk/inventory collector's recorded series and writes
    /// it through `sink` (spec §4.16).
    pub fn write_risk_inventory_summary(&self, sink: &dyn RiskInventorySink) -> EngineResult<()> {
        let collector = self.collector.borrow();
        let summary = RiskInventorySummary::summarize(collector.series(), collector.max_inventory());
        sink.write(&summary).map_err(EngineError::from)
    }
}

/// Wires a complete run from `spec` (spec §4.15, §6's run-mode component
/// lists): event journal and tick driver always first, then mode-specific
/// market data, then strategy, execution, and the risk/inventory collector
/// last. Writes `config.json` and `meta.json` under `artifacts` before
/// returning. Does not start the engine; call [`RunHandle::run`] for that.
pub fn assemble_run(
    spec: &RunSpec,
    run_id: &str,
    max_ticks: u64,
    artifacts: &RunArtifacts,
    durable_journal: bool,
) -> EngineResult<RunHandle> {
    validate_run_id(run_id)?;

    let bus = Rc::new(EventBus::new());
    let state = Rc::new(RefCell::new(EngineState::new(run_id)));
    let mut router = EngineRouter::new(Rc::clone(&bus));
    let mut components = Vec::new();

    let journal = EventJournal::create(artifacts.events_path(), durable_journal)?;
    router.register("event_journal", EventJournal::subscriptions(&journal));
    components.push(ComponentDescriptor::new("event_journal", "sim_core::journal"));

    let tick_driver = TickDriverComponent::new(Rc::clone(&bus), Rc::clone(&state), max_ticks);
    router.register("tick_driver", TickDriverComponent::subscriptions(&tick_driver));
    components.push(ComponentDescriptor::new("tick_driver", "sim_core::tick_driver"));

    match spec.marketdata.mode {
        RunMode::PaperReplayL2 => {
            let replay_spec = spec.marketdata.replay_l2.as_ref().ok_or_else(|| {
                SimError::UnknownRunMode(
                    "paper_replay_l2 requires marketdata.replay_l2".to_string(),
                )
            })?;
            let file = File::open(&replay_spec.path)?;
            let source = JsonlReplayDataSource::new(BufReader::new(file));
            let replay_adapter = ReplayMarketDataAdapter::new(Rc::clone(&bus), Rc::clone(&state), source);
            router.register("replay_adapter", ReplayMarketDataAdapter::subscriptions(&replay_adapter));
            components.push(ComponentDescriptor::new("replay_adapter", "sim_data::replay::adapter"));

            let book_adapter = OrderBookAdapter::new(Rc::clone(&bus), Rc::clone(&state));
            router.register("book_adapter", OrderBookAdapter::subscriptions(&book_adapter));
            components.push(ComponentDescriptor::new("book_adapter", "sim_data::book::adapter"));
        }
        RunMode::PaperExternalBbo | RunMode::PaperNoMarketdata => {}
    }

    // Strategy, execution, and the risk/inventory collector are wired in
    // every mode: `paper_no_marketdata` still exercises the strategy and
    // execution wiring for diagnostics (spec §6), and the collector is
    // included by default whenever a strategy is present (spec §9).
    let strategy_cfg = spec.strategy.fixed_spread.into_config(spec.symbol.clone());
    let strategy = FixedSpreadMarketMaker::new(Rc::clone(&bus), Rc::clone(&state), run_id.to_string(), strategy_cfg);
    router.register("strategy", FixedSpreadMarketMaker::subscriptions(&strategy));
    components.push(ComponentDescriptor::new("strategy", "sim_strategies::fixed_spread"));

    let risk_limits: RiskLimits = spec.execution.risk.into();
    let fill_model: Box<dyn FillModel> = Box::new(TopOfBookCappedFillModel);
    let execution = PaperExecutionAdapter::new(Rc::clone(&bus), Rc::clone(&state), RiskManager::new(risk_limits), fill_model);
    router.register("execution", PaperExecutionAdapter::subscriptions(&execution));
    components.push(ComponentDescriptor::new("execution", "sim_execution::adapter"));

    let collector = RiskInventoryCollector::new(spec.symbol.clone(), risk_limits, spec.strategy.fixed_spread.max_inventory);
    router.register("risk_inventory_collector", RiskInventoryCollector::subscriptions(&collector));
    components.push(ComponentDescriptor::new("risk_inventory_collector", "sim_analytics::collector"));

    let engine = Engine::new(Rc::clone(&bus), Rc::clone(&state));
    let wiring = router.wiring().to_vec();

    let config_json = serde_json::to_string_pretty(spec)?;
    std::fs::write(artifacts.config_path(), config_json)?;

    let snapshot = WiringSnapshot {
        run_id: run_id.to_string(),
        spec_hash: spec.fingerprint()?,
        symbol: spec.symbol.clone(),
        mode: spec.marketdata.mode.as_str().to_string(),
        strategy_kind: spec.strategy.kind.as_str().to_string(),
        execution_kind: spec.execution.kind.as_str().to_string(),
        components,
        router_wiring: wiring.clone(),
    };
    snapshot.write_to(artifacts.meta_path())?;

    Ok(RunHandle {
        bus,
        state,
        execution,
        collector,
        wiring,
        engine,
    })
}
