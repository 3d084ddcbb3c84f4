use std::cell::RefCell;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use sim_risk::RiskManager;
use sim_types::{handler, EngineState, Event, EventBus, EventKind, Handler};

use crate::fill_model::{Bbo, FillModel};
use crate::order::OrderRecord;
use crate::position::Position;

/// In-process venue that acknowledges, risk-gates, and matches orders
/// against the latest top of book (spec §4.6). Owns order records,
/// per-symbol positions, the risk manager, and the fill model; the bus is
/// the only channel in or out.
pub struct PaperExecutionAdapter {
    bus: Rc<EventBus>,
    state: Rc<RefCell<EngineState>>,
    risk: RiskManager,
    fill_model: Box<dyn FillModel>,
    orders_by_id: IndexMap<String, OrderRecord>,
    orders_by_symbol: IndexMap<String, IndexSet<String>>,
    positions: IndexMap<String, Position>,
    bbo_by_symbol: IndexMap<String, Bbo>,
}

impl std::fmt::Debug for PaperExecutionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaperExecutionAdapter")
            .field("open_orders", &self.orders_by_id.len())
            .finish()
    }
}

impl PaperExecutionAdapter {
    pub fn new(
        bus: Rc<EventBus>,
        state: Rc<RefCell<EngineState>>,
        risk: RiskManager,
        fill_model: Box<dyn FillModel>,
    ) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            bus,
            state,
            risk,
            fill_model,
            orders_by_id: IndexMap::new(),
            orders_by_symbol: IndexMap::new(),
            positions: IndexMap::new(),
            bbo_by_symbol: IndexMap::new(),
        }))
    }

    pub fn subscriptions(this: &Rc<RefCell<Self>>) -> Vec<(&'static str, Handler)> {
        let submit = Rc::clone(this);
        let cancel = Rc::clone(this);
        let bbo = Rc::clone(this);
        vec![
            (
                "order.submitted",
                handler(move |event: &Event| submit.borrow_mut().on_order_submitted(event)),
            ),
            (
                "order.cancel_requested",
                handler(move |event: &Event| cancel.borrow_mut().on_cancel_requested(event)),
            ),
            (
                "market.best_bid_ask",
                handler(move |event: &Event| bbo.borrow_mut().on_best_bid_ask(event)),
            ),
        ]
    }

    pub fn order(&self, order_id: &str) -> Option<&OrderRecord> {
        self.orders_by_id.get(order_id)
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    fn on_order_submitted(&mut self, event: &Event) {
        let EventKind::OrderSubmitted {
            symbol,
            order_id,
            side,
            order_type,
            time_in_force,
            price,
            quantity,
        } = &event.kind
        else {
            return;
        };
        let (symbol, order_id, side, order_type, time_in_force, price, quantity) = (
            symbol.clone(),
            order_id.clone(),
            *side,
            *order_type,
            *time_in_force,
            *price,
            *quantity,
        );

        if let Err(reason) =
            self.risk
                .check_new_order(&symbol, side, quantity, price, Some(&order_id))
        {
            self.emit(EventKind::OrderRejected {
                symbol,
                order_id,
                reason: reason.to_string(),
            });
            return;
        }

        self.orders_by_id.insert(
            order_id.clone(),
            OrderRecord::new_open(
                symbol.clone(),
                order_id.clone(),
                side,
                order_type,
                time_in_force,
                price,
                quantity,
            ),
        );
        self.orders_by_symbol
            .entry(symbol.clone())
            .or_default()
            .insert(order_id.clone());

        self.emit(EventKind::OrderAccepted {
            symbol: symbol.clone(),
            order_id: order_id.clone(),
            side,
            price,
            quantity,
        });

        if let Some(bbo) = self.bbo_by_symbol.get(&symbol).copied() {
            self.try_fill(&order_id, &bbo);
        }
    }

    fn on_cancel_requested(&mut self, event: &Event) {
        let EventKind::OrderCancelRequested { symbol, order_id } = &event.kind else {
            return;
        };

        let matches = self
            .orders_by_id
            .get(order_id)
            .map(|record| record.symbol == *symbol && record.is_open())
            .unwrap_or(false);
        if !matches {
            tracing::debug!(%order_id, "cancel_requested is a no-op: unknown, mismatched, or not open");
            return;
        }

        self.orders_by_id.get_mut(order_id).unwrap().cancel();
        if let Some(ids) = self.orders_by_symbol.get_mut(symbol) {
            ids.shift_remove(order_id);
        }
        self.risk.on_cancel(order_id);

        self.emit(EventKind::OrderCanceled {
            symbol: symbol.clone(),
            order_id: order_id.clone(),
        });
    }

    fn on_best_bid_ask(&mut self, event: &Event) {
        let EventKind::BestBidAsk {
            symbol,
            bid_price,
            bid_size,
            ask_price,
            ask_size,
        } = &event.kind
        else {
            return;
        };
        let bbo = Bbo {
            bid_price: *bid_price,
            bid_size: *bid_size,
            ask_price: *ask_price,
            ask_size: *ask_size,
        };
        self.bbo_by_symbol.insert(symbol.clone(), bbo);

        // Snapshot the open-order id set before iterating so emitted fills
        // (which may remove ids from the index) don't invalidate iteration
        // (spec §4.6).
        let ids: Vec<String> = self
            .orders_by_symbol
            .get(symbol)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        for order_id in ids {
            self.try_fill(&order_id, &bbo);
        }
    }

    fn try_fill(&mut self, order_id: &str, bbo: &Bbo) {
        let Some(order) = self.orders_by_id.get(order_id) else {
            return;
        };
        if !order.is_open() {
            return;
        }
        let decision = self.fill_model.decide(order, bbo);
        if !decision.executable {
            return;
        }
        let fill_price = decision.fill_price.expect("executable decision carries a price");
        let fill_qty = decision.fill_qty.expect("executable decision carries a quantity");
        let symbol = order.symbol.clone();
        let side = order.side;

        let record = self.orders_by_id.get_mut(order_id).unwrap();
        record.apply_fill(fill_qty);
        let remaining = record.remaining;
        let still_open = record.is_open();

        self.positions
            .entry(symbol.clone())
            .or_insert_with(|| Position::new(symbol.clone()))
            .on_fill(side, fill_qty, fill_price);
        self.risk
            .on_fill(&symbol, side, fill_qty, Some(order_id), Some(remaining));

        if !still_open {
            if let Some(ids) = self.orders_by_symbol.get_mut(&symbol) {
                ids.shift_remove(order_id);
            }
        }

        self.emit(EventKind::OrderFill {
            symbol,
            order_id: order_id.to_string(),
            side,
            fill_price,
            fill_quantity: fill_qty,
            remaining_quantity: remaining,
            fee: 0.0,
            liquidity: None,
        });
    }

    fn emit(&self, kind: EventKind) {
        let sequence = match self.state.borrow_mut().next_sequence() {
            Ok(sequence) => sequence,
            Err(err) => {
                tracing::error!(error = %err, "failed to allocate sequence for execution event");
                return;
            }
        };
        self.bus.publish(&Event::new(sequence, kind));
    }
}
