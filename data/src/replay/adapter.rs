use std::cell::RefCell;
use std::rc::Rc;

use sim_types::{handler, BookSide, Event, EventBus, EventKind, EngineState, Handler, SimError};

use super::delta::{normalize_l2_delta, OrderBookDelta};

/// Pulls at most one [`OrderBookDelta`] per `system.engine_tick` and
/// publishes it as `market.order_book_level` events, bids before asks,
/// input order preserved within a side (spec §4.5). Once the underlying
/// source is exhausted, further ticks are no-ops.
pub struct ReplayMarketDataAdapter {
    bus: Rc<EventBus>,
    state: Rc<RefCell<EngineState>>,
    source: Box<dyn Iterator<Item = Result<OrderBookDelta, SimError>>>,
    exhausted: bool,
}

impl std::fmt::Debug for ReplayMarketDataAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayMarketDataAdapter")
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

impl ReplayMarketDataAdapter {
    pub fn new(
        bus: Rc<EventBus>,
        state: Rc<RefCell<EngineState>>,
        source: impl Iterator<Item = Result<OrderBookDelta, SimError>> + 'static,
    ) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            bus,
            state,
            source: Box::new(source),
            exhausted: false,
        }))
    }

    pub fn subscriptions(this: &Rc<RefCell<Self>>) -> Vec<(&'static str, Handler)> {
        let component = Rc::clone(this);
        vec![(
            "system.engine_tick",
            handler(move |_event: &Event| {
                component.borrow_mut().on_engine_tick();
            }),
        )]
    }

    fn on_engine_tick(&mut self) {
        if self.exhausted {
            return;
        }
        match self.source.next() {
            None => {
                self.exhausted = true;
                tracing::debug!("replay data source exhausted, further ticks are no-ops");
            }
            Some(Err(err)) => {
                // Validation error discovered lazily mid-run: fail fast,
                // matching spec §7's classification and §4.1's "handler
                // exceptions propagate" rule.
                panic!("malformed replay data: {err}");
            }
            Some(Ok(delta)) => {
                for update in normalize_l2_delta(&delta) {
                    self.emit_level(&delta.symbol, update.side, update.price, update.size);
                }
            }
        }
    }

    fn emit_level(&self, symbol: &str, side: BookSide, price: f64, size: f64) {
        let sequence = match self.state.borrow_mut().next_sequence() {
            Ok(sequence) => sequence,
            Err(err) => {
                tracing::error!(error = %err, "failed to allocate sequence for order_book_level");
                return;
            }
        };
        self.bus.publish(&Event::new(
            sequence,
            EventKind::OrderBookLevel {
                symbol: symbol.to_string(),
                side,
                price,
                size,
            },
        ));
    }
}
