use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use sim_types::{handler, Event, EventBus, EventKind, Handler};

use super::{BestBidAsk, LevelUpdate, OrderBook};

/// Folds `market.order_book_level` updates into per-symbol [`OrderBook`]s and
/// emits `market.best_bid_ask` only when the top-of-book tuple changes
/// (spec §4.4). Absent sides are reported as zeros in the emitted event.
#[derive(Debug)]
pub struct OrderBookAdapter {
    bus: Rc<EventBus>,
    state: Rc<RefCell<sim_types::EngineState>>,
    books: HashMap<String, OrderBook>,
    last_emitted: HashMap<String, (f64, f64, f64, f64)>,
}

impl OrderBookAdapter {
    pub fn new(bus: Rc<EventBus>, state: Rc<RefCell<sim_types::EngineState>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            bus,
            state,
            books: HashMap::new(),
            last_emitted: HashMap::new(),
        }))
    }

    /// Capability contract this component exposes to the router (SPEC_FULL.md
    /// §9): the set of `(event_type, handler)` pairs to register, in order.
    pub fn subscriptions(this: &Rc<RefCell<Self>>) -> Vec<(&'static str, Handler)> {
        let component = Rc::clone(this);
        vec![(
            "market.order_book_level",
            handler(move |event: &Event| {
                component.borrow_mut().on_order_book_level(event);
            }),
        )]
    }

    pub fn book(&self, symbol: &str) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    fn on_order_book_level(&mut self, event: &Event) {
        let EventKind::OrderBookLevel { symbol, side, price, size } = &event.kind else {
            return;
        };

        let book = self
            .books
            .entry(symbol.clone())
            .or_insert_with(|| OrderBook::new(symbol.clone()));

        if let Err(err) = book.apply_level_update(LevelUpdate {
            side: *side,
            price: *price,
            size: *size,
        }) {
            tracing::warn!(symbol = %symbol, error = %err, "dropping invalid order_book_level update");
            return;
        }

        let best = book.best();
        let tuple = best.as_zeroed_tuple();
        let changed = self
            .last_emitted
            .get(symbol)
            .map(|prev| *prev != tuple)
            .unwrap_or(true);
        if !changed {
            return;
        }
        self.last_emitted.insert(symbol.clone(), tuple);
        self.emit_best_bid_ask(symbol, best);
    }

    fn emit_best_bid_ask(&self, symbol: &str, best: BestBidAsk) {
        let sequence = match self.state.borrow_mut().next_sequence() {
            Ok(sequence) => sequence,
            Err(err) => {
                tracing::error!(error = %err, "failed to allocate sequence for best_bid_ask");
                return;
            }
        };
        let (bid_price, bid_size, ask_price, ask_size) = best.as_zeroed_tuple();
        self.bus.publish(&Event::new(
            sequence,
            EventKind::BestBidAsk {
                symbol: symbol.to_string(),
                bid_price,
                bid_size,
                ask_price,
                ask_size,
            },
        ));
    }
}
