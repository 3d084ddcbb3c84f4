pub mod adapter;

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use sim_types::{BookSide, SimError};

/// Best bid and ask for a symbol (spec §3). Absent sides carry `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BestBidAsk {
    pub bid_price: Option<f64>,
    pub bid_size: Option<f64>,
    pub ask_price: Option<f64>,
    pub ask_size: Option<f64>,
}

impl BestBidAsk {
    /// The four-tuple used by [`crate::book::adapter::OrderBookAdapter`] to
    /// detect a top-of-book change, with absent sides as zeros (spec §4.4).
    pub fn as_zeroed_tuple(&self) -> (f64, f64, f64, f64) {
        (
            self.bid_price.unwrap_or(0.0),
            self.bid_size.unwrap_or(0.0),
            self.ask_price.unwrap_or(0.0),
            self.ask_size.unwrap_or(0.0),
        )
    }
}

/// A single price-level update (spec §4.3): `price > 0`, `size >= 0`.
/// `size == 0` deletes the level.
#[derive(Debug, Clone, Copy)]
pub struct LevelUpdate {
    pub side: BookSide,
    pub price: f64,
    pub size: f64,
}

/// Per-symbol L2 depth reconstruction (spec §3, §4.3). Two price->size
/// mappings; `best_bid = max(bids)`, `best_ask = min(asks)`. Crossed books
/// (`best_bid >= best_ask`) are tolerated transiently, never rejected.
#[derive(Debug, Clone)]
pub struct OrderBook {
    symbol: String,
    bids: BTreeMap<OrderedFloat<f64>, f64>,
    asks: BTreeMap<OrderedFloat<f64>, f64>,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Validates and applies a level update to this symbol's book.
    pub fn apply_level_update(&mut self, update: LevelUpdate) -> Result<(), SimError> {
        if !(update.price > 0.0) {
            return Err(SimError::InvalidLevelUpdate(format!(
                "price must be > 0, got {}",
                update.price
            )));
        }
        if update.size < 0.0 {
            return Err(SimError::InvalidLevelUpdate(format!(
                "size must be >= 0, got {}",
                update.size
            )));
        }

        let side_map = match update.side {
            BookSide::Bid => &mut self.bids,
            BookSide::Ask => &mut self.asks,
        };

        if update.size == 0.0 {
            side_map.remove(&OrderedFloat(update.price));
        } else {
            side_map.insert(OrderedFloat(update.price), update.size);
        }
        Ok(())
    }

    /// Current top of book on each side.
    pub fn best(&self) -> BestBidAsk {
        let bid = self.bids.iter().next_back();
        let ask = self.asks.iter().next();
        BestBidAsk {
            bid_price: bid.map(|(p, _)| p.0),
            bid_size: bid.map(|(_, s)| *s),
            ask_price: ask.map(|(p, _)| p.0),
            ask_size: ask.map(|(_, s)| *s),
        }
    }

    /// Up to `n` best levels on `side`, best first (supplemented — see
    /// SPEC_FULL.md §3).
    pub fn top_levels(&self, side: BookSide, n: usize) -> Vec<(f64, f64)> {
        match side {
            BookSide::Bid => self
                .bids
                .iter()
                .rev()
                .take(n)
                .map(|(p, s)| (p.0, *s))
                .collect(),
            BookSide::Ask => self.asks.iter().take(n).map(|(p, s)| (p.0, *s)).collect(),
        }
    }

    /// All levels on `side`, best first.
    pub fn levels(&self, side: BookSide) -> Vec<(f64, f64)> {
        self.top_levels(side, usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_picks_max_bid_min_ask() {
        let mut book = OrderBook::new("BTC-USD");
        book.apply_level_update(LevelUpdate { side: BookSide::Bid, price: 100.0, size: 1.0 })
            .unwrap();
        book.apply_level_update(LevelUpdate { side: BookSide::Bid, price: 101.0, size: 2.0 })
            .unwrap();
        book.apply_level_update(LevelUpdate { side: BookSide::Ask, price: 105.0, size: 1.0 })
            .unwrap();
        book.apply_level_update(LevelUpdate { side: BookSide::Ask, price: 103.0, size: 3.0 })
            .unwrap();

        let best = book.best();
        assert_eq!(best.bid_price, Some(101.0));
        assert_eq!(best.ask_price, Some(103.0));
    }

    #[test]
    fn zero_size_deletes_level_and_recomputes_best() {
        let mut book = OrderBook::new("BTC-USD");
        book.apply_level_update(LevelUpdate { side: BookSide::Bid, price: 101.0, size: 2.0 })
            .unwrap();
        book.apply_level_update(LevelUpdate { side: BookSide::Bid, price: 100.0, size: 1.0 })
            .unwrap();
        book.apply_level_update(LevelUpdate { side: BookSide::Bid, price: 101.0, size: 0.0 })
            .unwrap();

        assert_eq!(book.best().bid_price, Some(100.0));
    }

    #[test]
    fn rejects_non_positive_price() {
        let mut book = OrderBook::new("BTC-USD");
        let err = book.apply_level_update(LevelUpdate { side: BookSide::Bid, price: 0.0, size: 1.0 });
        assert!(err.is_err());
    }

    #[test]
    fn tolerates_crossed_book() {
        let mut book = OrderBook::new("BTC-USD");
        book.apply_level_update(LevelUpdate { side: BookSide::Bid, price: 110.0, size: 1.0 })
            .unwrap();
        book.apply_level_update(LevelUpdate { side: BookSide::Ask, price: 100.0, size: 1.0 })
            .unwrap();
        let best = book.best();
        assert_eq!(best.bid_price, Some(110.0));
        assert_eq!(best.ask_price, Some(100.0));
    }
}
