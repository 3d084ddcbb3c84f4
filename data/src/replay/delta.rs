use sim_types::BookSide;

use crate::book::LevelUpdate;

/// One replay record (spec §4.5, §6): incremental bid/ask updates for a
/// symbol. `price > 0`; `size >= 0` (`0` deletes the level).
#[derive(Debug, Clone)]
pub struct OrderBookDelta {
    pub symbol: String,
    pub bid_updates: Vec<(f64, f64)>,
    pub ask_updates: Vec<(f64, f64)>,
}

/// Flattens a delta into the `LevelUpdate` sequence the replay adapter
/// publishes: bid updates before ask updates, input order preserved within
/// each side (spec §4.5).
pub fn normalize_l2_delta(delta: &OrderBookDelta) -> Vec<LevelUpdate> {
    delta
        .bid_updates
        .iter()
        .map(|&(price, size)| LevelUpdate { side: BookSide::Bid, price, size })
        .chain(
            delta
                .ask_updates
                .iter()
                .map(|&(price, size)| LevelUpdate { side: BookSide::Ask, price, size }),
        )
        .collect()
}
