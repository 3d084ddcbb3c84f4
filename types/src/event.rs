use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::Sequence;

/// Buy/sell side of an order, a book level, or the aggressor of a trade.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Signed multiplier: `+1` for buy, `-1` for sell.
    pub fn sign(self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Side of an order book (bid/ask), distinct from [`Side`] since a book level
/// has no notion of aggressor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    Bid,
    Ask,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    GTC,
    IOC,
    FOK,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Liquidity {
    Maker,
    Taker,
}

/// Lifecycle status of an [`crate::OrderRecord`]; transitions are monotone,
/// `open -> {filled, canceled, rejected}` only (spec §3, §8 invariant 2).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Filled,
    Canceled,
    Rejected,
}

/// Closed set of event payloads (spec §3). Each variant tag is a dotted
/// `event_type` string used both for bus subscription and journal output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventKind {
    RunStarted,
    RunStopped,
    EngineTick {
        tick: u64,
    },
    EngineError {
        error_type: String,
        message: String,
    },
    OrderBookLevel {
        symbol: String,
        side: BookSide,
        price: f64,
        size: f64,
    },
    BestBidAsk {
        symbol: String,
        bid_price: f64,
        bid_size: f64,
        ask_price: f64,
        ask_size: f64,
    },
    Trade {
        symbol: String,
        price: f64,
        size: f64,
        aggressor_side: Side,
    },
    OrderSubmitted {
        symbol: String,
        order_id: String,
        side: Side,
        order_type: OrderType,
        time_in_force: TimeInForce,
        price: Option<f64>,
        quantity: f64,
    },
    OrderCancelRequested {
        symbol: String,
        order_id: String,
    },
    OrderAccepted {
        symbol: String,
        order_id: String,
        side: Side,
        price: Option<f64>,
        quantity: f64,
    },
    OrderRejected {
        symbol: String,
        order_id: String,
        reason: String,
    },
    OrderCanceled {
        symbol: String,
        order_id: String,
    },
    OrderFill {
        symbol: String,
        order_id: String,
        side: Side,
        fill_price: f64,
        fill_quantity: f64,
        remaining_quantity: f64,
        fee: f64,
        liquidity: Option<Liquidity>,
    },
}

impl EventKind {
    /// Dotted tag used for bus subscription and as the journal's `event_type`.
    pub fn event_type(&self) -> &'static str {
        match self {
            EventKind::RunStarted => "system.run_started",
            EventKind::RunStopped => "system.run_stopped",
            EventKind::EngineTick { .. } => "system.engine_tick",
            EventKind::EngineError { .. } => "system.engine_error",
            EventKind::OrderBookLevel { .. } => "market.order_book_level",
            EventKind::BestBidAsk { .. } => "market.best_bid_ask",
            EventKind::Trade { .. } => "market.trade",
            EventKind::OrderSubmitted { .. } => "order.submitted",
            EventKind::OrderCancelRequested { .. } => "order.cancel_requested",
            EventKind::OrderAccepted { .. } => "order.accepted",
            EventKind::OrderRejected { .. } => "order.rejected",
            EventKind::OrderCanceled { .. } => "order.canceled",
            EventKind::OrderFill { .. } => "order.fill",
        }
    }

    /// Flattens the variant's payload fields into a JSON object, for merging
    /// with the envelope fields by [`Event::to_journal_value`].
    fn payload_fields(&self) -> Map<String, Value> {
        let value = serde_json::to_value(self).expect("EventKind always serializes");
        match value {
            // serde's default untagged-by-variant-name encoding for a unit
            // variant is a bare string; fielded variants serialize as
            // `{ "VariantName": { ...fields } }`. We only want the fields.
            Value::String(_) => Map::new(),
            Value::Object(outer) => outer
                .into_values()
                .next()
                .and_then(|inner| inner.as_object().cloned())
                .unwrap_or_default(),
            _ => Map::new(),
        }
    }
}

/// The common envelope every event carries (spec §3): a unique id, a UTC
/// timestamp, and the [`Sequence`] allocated by engine state at publish time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: Uuid,
    pub timestamp_utc: DateTime<Utc>,
    pub sequence: Sequence,
    pub kind: EventKind,
}

impl Event {
    pub fn new(sequence: Sequence, kind: EventKind) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp_utc: Utc::now(),
            sequence,
            kind,
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    /// Flattened, sorted-key representation written by the event journal
    /// (spec §4.11, §6): envelope fields plus the variant's own fields, all
    /// at the top level, with `event_type` always present.
    pub fn to_journal_value(&self) -> Value {
        let mut fields = self.kind.payload_fields();
        fields.insert("event_id".into(), Value::String(self.event_id.to_string()));
        fields.insert(
            "timestamp_utc".into(),
            Value::String(self.timestamp_utc.to_rfc3339()),
        );
        fields.insert(
            "sequence".into(),
            Value::Number(self.sequence.value().into()),
        );
        fields.insert(
            "event_type".into(),
            Value::String(self.event_type().to_string()),
        );
        Value::Object(fields)
    }
}
