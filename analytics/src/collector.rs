use std::cell::RefCell;
use std::rc::Rc;

use sim_execution::Position;
use sim_risk::{RiskLimits, RiskManager};
use sim_types::{handler, Event, EventKind, EventBus, Handler};

use crate::series::RiskInventorySeries;

/// Passive observer that mirrors inventory, reservations, and mark-to-market
/// PnL for a single symbol from the public event stream alone (spec §4.16).
/// It owns its own [`RiskManager`]/[`Position`] instances, fed the same
/// limits as the execution-side risk manager, so its reserved/inventory
/// bookkeeping is derived purely from `order.accepted`/`order.fill`/
/// `order.canceled`, never from a shared reference (spec §9: components
/// communicate only through the bus).
pub struct RiskInventoryCollector {
    symbol: String,
    max_inventory: f64,
    risk: RiskManager,
    position: Position,
    series: RiskInventorySeries,
    last_mid: Option<f64>,
    peak_total: f64,
}

impl std::fmt::Debug for RiskInventoryCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskInventoryCollector")
            .field("symbol", &self.symbol)
            .field("samples", &self.series.len())
            .finish()
    }
}

impl RiskInventoryCollector {
    pub fn new(symbol: impl Into<String>, limits: RiskLimits, max_inventory: f64) -> Rc<RefCell<Self>> {
        let symbol = symbol.into();
        Rc::new(RefCell::new(Self {
            position: Position::new(symbol.clone()),
            symbol,
            max_inventory,
            risk: RiskManager::new(limits),
            series: RiskInventorySeries::default(),
            last_mid: None,
            peak_total: 0.0,
        }))
    }

    pub fn subscriptions(this: &Rc<RefCell<Self>>) -> Vec<(&'static str, Handler)> {
        let accepted = Rc::clone(this);
        let fill = Rc::clone(this);
        let canceled = Rc::clone(this);
        let bbo = Rc::clone(this);
        vec![
            (
                "order.accepted",
                handler(move |event: &Event| accepted.borrow_mut().on_order_accepted(event)),
            ),
            (
                "order.fill",
                handler(move |event: &Event| fill.borrow_mut().on_order_fill(event)),
            ),
            (
                "order.canceled",
                handler(move |event: &Event| canceled.borrow_mut().on_order_canceled(event)),
            ),
            (
                "market.best_bid_ask",
                handler(move |event: &Event| bbo.borrow_mut().on_best_bid_ask(event)),
            ),
        ]
    }

    pub fn series(&self) -> &RiskInventorySeries {
        &self.series
    }

    pub fn max_inventory(&self) -> f64 {
        self.max_inventory
    }

    fn on_order_accepted(&mut self, event: &Event) {
        let EventKind::OrderAccepted { symbol, order_id, side, price, quantity } = &event.kind else {
            return;
        };
        if symbol != &self.symbol {
            return;
        }
        if let Err(reason) =
            self.risk
                .check_new_order(symbol, *side, *quantity, *price, Some(order_id))
        {
            tracing::warn!(%order_id, %reason, "collector's mirrored risk check disagreed with the execution adapter's");
        }
        self.sample(event.sequence.value());
    }

    fn on_order_fill(&mut self, event: &Event) {
        let EventKind::OrderFill { symbol, order_id, side, fill_price, fill_quantity, remaining_quantity, .. } =
            &event.kind
        else {
            return;
        };
        if symbol != &self.symbol {
            return;
        }
        self.risk.on_fill(
            symbol,
            *side,
            *fill_quantity,
            Some(order_id),
            Some(*remaining_quantity),
        );
        self.position.on_fill(*side, *fill_quantity, *fill_price);
        self.sample(event.sequence.value());
    }

    fn on_order_canceled(&mut self, event: &Event) {
        let EventKind::OrderCanceled { symbol, order_id } = &event.kind else {
            return;
        };
        if symbol != &self.symbol {
            return;
        }
        self.risk.on_cancel(order_id);
        self.sample(event.sequence.value());
    }

    fn on_best_bid_ask(&mut self, event: &Event) {
        let EventKind::BestBidAsk { symbol, bid_price, ask_price, .. } = &event.kind else {
            return;
        };
        if symbol != &self.symbol {
            return;
        }
        self.last_mid = Some((bid_price + ask_price) / 2.0);
        self.sample(event.sequence.value());
    }

    fn sample(&mut self, seq: u64) {
        let mid = self.last_mid.unwrap_or(0.0);
        let inv = self.position.inventory;
        let reserved = self.risk.reserved(&self.symbol);
        let realized = self.position.realized_pnl;
        let unrealized = inv * (mid - self.position.avg_price);
        let total = realized + unrealized;
        self.peak_total = self.peak_total.max(total);
        let drawdown = self.peak_total - total;
        self.series
            .append(seq, inv, reserved, mid, realized, unrealized, total, drawdown);
    }
}
