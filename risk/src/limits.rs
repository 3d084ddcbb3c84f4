use serde::{Deserialize, Serialize};

/// Pre-trade risk limits (spec §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    pub max_order_qty: f64,
    pub max_abs_inventory: f64,
    pub max_order_notional: Option<f64>,
}

impl RiskLimits {
    pub fn new(max_order_qty: f64, max_abs_inventory: f64, max_order_notional: Option<f64>) -> Self {
        Self {
            max_order_qty,
            max_abs_inventory,
            max_order_notional,
        }
    }
}
