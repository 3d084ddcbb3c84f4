use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use sim_types::{approx_eq, handler, EngineState, Event, EventBus, EventKind, Handler, OrderType, Side, TimeInForce};

/// Configuration for [`FixedSpreadMarketMaker`] (spec §4.10, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedSpreadConfig {
    pub symbol: String,
    pub spread: f64,
    pub order_size: f64,
    pub max_inventory: f64,
    pub inventory_skew_k: f64,
    pub min_mid_move: f64,
    pub min_ticks_between_quotes: u64,
}

#[derive(Debug, Clone, Default)]
struct SideState {
    active_id: Option<String>,
    active_price: Option<f64>,
    pending: Option<(f64, f64)>,
}

/// BBO-triggered quoting strategy with a throttle, inventory skew, and a
/// cancel/replace state machine that stages at most one pending replacement
/// per side (spec §4.10).
pub struct FixedSpreadMarketMaker {
    bus: Rc<EventBus>,
    state: Rc<RefCell<EngineState>>,
    run_id: String,
    config: FixedSpreadConfig,
    inventory: f64,
    last_mid: Option<f64>,
    last_quote_tick: Option<u64>,
    bid: SideState,
    ask: SideState,
}

impl std::fmt::Debug for FixedSpreadMarketMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedSpreadMarketMaker")
            .field("symbol", &self.config.symbol)
            .field("inventory", &self.inventory)
            .finish()
    }
}

impl FixedSpreadMarketMaker {
    pub fn new(
        bus: Rc<EventBus>,
        state: Rc<RefCell<EngineState>>,
        run_id: impl Into<String>,
        config: FixedSpreadConfig,
    ) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            bus,
            state,
            run_id: run_id.into(),
            config,
            inventory: 0.0,
            last_mid: None,
            last_quote_tick: None,
            bid: SideState::default(),
            ask: SideState::default(),
        }))
    }

    pub fn subscriptions(this: &Rc<RefCell<Self>>) -> Vec<(&'static str, Handler)> {
        let on_bbo = Rc::clone(this);
        let on_canceled = Rc::clone(this);
        let on_fill = Rc::clone(this);
        vec![
            (
                "market.best_bid_ask",
                handler(move |event: &Event| on_bbo.borrow_mut().on_best_bid_ask(event)),
            ),
            (
                "order.canceled",
                handler(move |event: &Event| on_canceled.borrow_mut().on_order_canceled(event)),
            ),
            (
                "order.fill",
                handler(move |event: &Event| on_fill.borrow_mut().on_order_fill(event)),
            ),
        ]
    }

    pub fn inventory(&self) -> f64 {
        self.inventory
    }

    fn on_best_bid_ask(&mut self, event: &Event) {
        let EventKind::BestBidAsk { symbol, bid_price, ask_price, .. } = &event.kind else {
            return;
        };
        if symbol != &self.config.symbol {
            return;
        }
        let (bid_price, ask_price) = (*bid_price, *ask_price);
        if !(bid_price > 0.0 && ask_price > 0.0 && ask_price > bid_price) {
            return;
        }

        let tick = self.state.borrow().tick().value();
        let mid = (bid_price + ask_price) / 2.0;

        let throttled_by_tick = self
            .last_quote_tick
            .map(|last| tick.saturating_sub(last) < self.config.min_ticks_between_quotes)
            .unwrap_or(false);
        let throttled_by_move = self
            .last_mid
            .map(|last| (mid - last).abs() < self.config.min_mid_move)
            .unwrap_or(false);
        if throttled_by_tick || throttled_by_move {
            return;
        }
        self.last_mid = Some(mid);
        self.last_quote_tick = Some(tick);

        let skew = self.config.inventory_skew_k * self.inventory;
        let bid_quote = mid - self.config.spread / 2.0 - skew;
        let ask_quote = mid + self.config.spread / 2.0 - skew;

        let bid_qty = if self.inventory >= self.config.max_inventory {
            0.0
        } else {
            self.config.order_size
        };
        let ask_qty = if self.inventory <= -self.config.max_inventory {
            0.0
        } else {
            self.config.order_size
        };

        self.quote_side(Side::Buy, bid_quote, bid_qty, tick);
        self.quote_side(Side::Sell, ask_quote, ask_qty, tick);
        self.assert_invariants();
    }

    fn quote_side(&mut self, side: Side, price: f64, qty: f64, tick: u64) {
        if qty <= 0.0 {
            return;
        }
        let symbol = self.config.symbol.clone();
        let run_id = self.run_id.clone();

        if self.side_state(side).active_id.is_none() {
            let order_id = deterministic_order_id(&run_id, tick, side, price, qty);
            {
                let side_state = self.side_state_mut(side);
                side_state.active_id = Some(order_id.clone());
                side_state.active_price = Some(price);
            }
            self.emit_submit(&symbol, &order_id, side, price, qty);
            return;
        }

        let active_price = self.side_state(side).active_price.unwrap();
        if approx_eq(active_price, price) {
            return;
        }

        let had_pending = self.side_state(side).pending.is_some();
        self.side_state_mut(side).pending = Some((price, qty));
        if !had_pending {
            let active_id = self.side_state(side).active_id.clone().unwrap();
            self.emit_cancel_request(&symbol, &active_id);
        }
    }

    fn on_order_canceled(&mut self, event: &Event) {
        let EventKind::OrderCanceled { symbol, order_id } = &event.kind else {
            return;
        };
        if symbol != &self.config.symbol {
            return;
        }
        let tick = self.state.borrow().tick().value();

        for side in [Side::Buy, Side::Sell] {
            let is_ours = self
                .side_state(side)
                .active_id
                .as_deref()
                .map(|id| id == order_id)
                .unwrap_or(false);
            if !is_ours {
                continue;
            }
            let pending = self.side_state_mut(side).pending.take();
            self.side_state_mut(side).active_id = None;
            self.side_state_mut(side).active_price = None;
            if let Some((price, qty)) = pending {
                let symbol = self.config.symbol.clone();
                let run_id = self.run_id.clone();
                let new_id = deterministic_order_id(&run_id, tick, side, price, qty);
                let side_state = self.side_state_mut(side);
                side_state.active_id = Some(new_id.clone());
                side_state.active_price = Some(price);
                self.emit_submit(&symbol, &new_id, side, price, qty);
            }
            break;
        }
        self.assert_invariants();
    }

    fn on_order_fill(&mut self, event: &Event) {
        let EventKind::OrderFill { symbol, order_id, side, fill_quantity, .. } = &event.kind else {
            return;
        };
        if symbol != &self.config.symbol {
            return;
        }
        self.inventory += side.sign() * fill_quantity;

        for quote_side in [Side::Buy, Side::Sell] {
            let is_ours = self
                .side_state(quote_side)
                .active_id
                .as_deref()
                .map(|id| id == order_id)
                .unwrap_or(false);
            if is_ours {
                let side_state = self.side_state_mut(quote_side);
                side_state.active_id = None;
                side_state.active_price = None;
                side_state.pending = None;
                break;
            }
        }
        self.assert_invariants();
    }

    fn side_state(&self, side: Side) -> &SideState {
        match side {
            Side::Buy => &self.bid,
            Side::Sell => &self.ask,
        }
    }

    fn side_state_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Buy => &mut self.bid,
            Side::Sell => &mut self.ask,
        }
    }

    fn assert_invariants(&self) {
        for side in [Side::Buy, Side::Sell] {
            let state = self.side_state(side);
            debug_assert!(
                state.pending.is_none() || state.active_id.is_some(),
                "a pending side requires an active side"
            );
        }
    }

    fn emit_submit(&self, symbol: &str, order_id: &str, side: Side, price: f64, qty: f64) {
        self.emit(EventKind::OrderSubmitted {
            symbol: symbol.to_string(),
            order_id: order_id.to_string(),
            side,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::GTC,
            price: Some(price),
            quantity: qty,
        });
    }

    fn emit_cancel_request(&self, symbol: &str, order_id: &str) {
        self.emit(EventKind::OrderCancelRequested {
            symbol: symbol.to_string(),
            order_id: order_id.to_string(),
        });
    }

    fn emit(&self, kind: EventKind) {
        let sequence = match self.state.borrow_mut().next_sequence() {
            Ok(sequence) => sequence,
            Err(err) => {
                tracing::error!(error = %err, "failed to allocate sequence for strategy event");
                return;
            }
        };
        self.bus.publish(&Event::new(sequence, kind));
    }
}

/// `sha1(run_id | tick | side | price(8dp) | qty(8dp))` truncated to 16 hex
/// chars (spec §4.10) — reproducible across replays of the same run.
fn deterministic_order_id(run_id: &str, tick: u64, side: Side, price: f64, qty: f64) -> String {
    let side_str = match side {
        Side::Buy => "buy",
        Side::Sell => "sell",
    };
    let payload = format!("{run_id}|{tick}|{side_str}|{price:.8}|{qty:.8}");
    let mut hasher = Sha1::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_is_deterministic() {
        let a = deterministic_order_id("run-1", 3, Side::Buy, 100.123, 0.5);
        let b = deterministic_order_id("run-1", 3, Side::Buy, 100.123, 0.5);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn order_id_changes_with_tick() {
        let a = deterministic_order_id("run-1", 3, Side::Buy, 100.0, 0.5);
        let b = deterministic_order_id("run-1", 4, Side::Buy, 100.0, 0.5);
        assert_ne!(a, b);
    }
}
