use sim_types::{OrderStatus, OrderType, Side, TimeInForce, EPS};

/// `{ symbol, order_id, side, price?, quantity, remaining, status }`
/// (spec §3). Status transitions are monotone: `open -> {filled, canceled,
/// rejected}` only (spec §8 invariant 2).
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub symbol: String,
    pub order_id: String,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub price: Option<f64>,
    pub quantity: f64,
    pub remaining: f64,
    pub status: OrderStatus,
}

impl OrderRecord {
    pub fn new_open(
        symbol: impl Into<String>,
        order_id: impl Into<String>,
        side: Side,
        order_type: OrderType,
        time_in_force: TimeInForce,
        price: Option<f64>,
        quantity: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            order_id: order_id.into(),
            side,
            order_type,
            time_in_force,
            price,
            quantity,
            remaining: quantity,
            status: OrderStatus::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    /// Decrements `remaining` by `fill_qty`; transitions to `Filled` once
    /// `remaining <= eps` (spec §4.6).
    pub fn apply_fill(&mut self, fill_qty: f64) {
        self.remaining = (self.remaining - fill_qty).max(0.0);
        if self.remaining <= EPS {
            self.remaining = 0.0;
            self.status = OrderStatus::Filled;
        }
    }

    pub fn cancel(&mut self) {
        self.status = OrderStatus::Canceled;
    }

    pub fn reject(&mut self) {
        self.status = OrderStatus::Rejected;
    }
}
