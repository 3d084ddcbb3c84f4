use sim_types::{approx_ge, Side, EPS};

use crate::order::OrderRecord;

/// Top-of-book snapshot a [`FillModel`] decides against. Absent sides are
/// represented as zero price/size, matching the wire shape of
/// `market.best_bid_ask` (spec §4.4).
#[derive(Debug, Clone, Copy, Default)]
pub struct Bbo {
    pub bid_price: f64,
    pub bid_size: f64,
    pub ask_price: f64,
    pub ask_size: f64,
}

/// Decision returned by a [`FillModel`] (spec §4.7). `executable=true`
/// implies finite positive `fill_price` and `fill_qty`, with
/// `fill_qty <= order.remaining + eps`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillDecision {
    pub executable: bool,
    pub fill_price: Option<f64>,
    pub fill_qty: Option<f64>,
}

impl FillDecision {
    pub fn none() -> Self {
        Self::default()
    }
}

/// A fill model is a pure function `(order, bbo) -> FillDecision` (spec
/// §4.7): deterministic, and never executable for a non-open order, a
/// market order, or a non-positive top quote.
pub trait FillModel: std::fmt::Debug {
    fn decide(&self, order: &OrderRecord, bbo: &Bbo) -> FillDecision;
}

fn touch_for(order: &OrderRecord, bbo: &Bbo) -> (f64, f64) {
    match order.side {
        Side::Buy => (bbo.ask_price, bbo.ask_size),
        Side::Sell => (bbo.bid_price, bbo.bid_size),
    }
}

fn crosses(order_side: Side, order_price: f64, touch_price: f64) -> bool {
    match order_side {
        Side::Buy => approx_ge(order_price, touch_price),
        Side::Sell => approx_ge(touch_price, order_price),
    }
}

/// A limit order fills in full at the touch the instant it crosses: a buy
/// at `price + eps >= ask`, a sell at `bid + eps >= price`. Market orders
/// never execute in this model (spec §4.7).
#[derive(Debug, Clone, Copy, Default)]
pub struct TopOfBookFullFillModel;

impl FillModel for TopOfBookFullFillModel {
    fn decide(&self, order: &OrderRecord, bbo: &Bbo) -> FillDecision {
        if !order.is_open() {
            return FillDecision::none();
        }
        let Some(price) = order.price else {
            return FillDecision::none();
        };
        let (touch_price, _touch_size) = touch_for(order, bbo);
        if !(touch_price > 0.0) || !crosses(order.side, price, touch_price) {
            return FillDecision::none();
        }
        FillDecision {
            executable: true,
            fill_price: Some(touch_price),
            fill_qty: Some(order.remaining),
        }
    }
}

/// As [`TopOfBookFullFillModel`], but caps `fill_qty` at the displayed top
/// size, and requires that displayed size exceed eps (spec §4.7).
#[derive(Debug, Clone, Copy, Default)]
pub struct TopOfBookCappedFillModel;

impl FillModel for TopOfBookCappedFillModel {
    fn decide(&self, order: &OrderRecord, bbo: &Bbo) -> FillDecision {
        if !order.is_open() {
            return FillDecision::none();
        }
        let Some(price) = order.price else {
            return FillDecision::none();
        };
        let (touch_price, touch_size) = touch_for(order, bbo);
        if !(touch_price > 0.0) || touch_size <= EPS {
            return FillDecision::none();
        }
        if !crosses(order.side, price, touch_price) {
            return FillDecision::none();
        }
        FillDecision {
            executable: true,
            fill_price: Some(touch_price),
            fill_qty: Some(order.remaining.min(touch_size)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_types::{OrderType, TimeInForce};

    fn buy_limit(price: f64, qty: f64) -> OrderRecord {
        OrderRecord::new_open("BTC-USD", "o1", Side::Buy, OrderType::Limit, TimeInForce::GTC, Some(price), qty)
    }

    #[test]
    fn full_fill_model_fills_remaining_at_touch() {
        let order = buy_limit(101.0, 2.0);
        let bbo = Bbo { bid_price: 99.0, bid_size: 5.0, ask_price: 100.0, ask_size: 3.0 };
        let decision = TopOfBookFullFillModel.decide(&order, &bbo);
        assert!(decision.executable);
        assert_eq!(decision.fill_price, Some(100.0));
        assert_eq!(decision.fill_qty, Some(2.0));
    }

    #[test]
    fn capped_model_caps_at_displayed_size() {
        let order = buy_limit(101.0, 5.0);
        let bbo = Bbo { bid_price: 99.0, bid_size: 5.0, ask_price: 100.0, ask_size: 2.0 };
        let decision = TopOfBookCappedFillModel.decide(&order, &bbo);
        assert_eq!(decision.fill_qty, Some(2.0));
    }

    #[test]
    fn market_orders_never_fill() {
        let order = OrderRecord::new_open("BTC-USD", "o1", Side::Buy, OrderType::Market, TimeInForce::IOC, None, 1.0);
        let bbo = Bbo { bid_price: 99.0, bid_size: 5.0, ask_price: 100.0, ask_size: 3.0 };
        assert!(!TopOfBookFullFillModel.decide(&order, &bbo).executable);
    }
}
