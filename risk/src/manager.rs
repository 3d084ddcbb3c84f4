use std::collections::HashMap;

use sim_types::{approx_ge, approx_zero, Side, EPS};

use crate::limits::RiskLimits;
use crate::reason::RejectReason;

#[derive(Debug, Clone)]
struct Reservation {
    symbol: String,
    side: Side,
    remaining_abs: f64,
}

/// Deterministic in-memory inventory + reservation ledger (spec §3, §4.8).
///
/// Reservations are the conservative, full-fill worst-case exposure of
/// every outstanding open order: `check_new_order` cannot be gamed by
/// rapidly issuing multiple in-flight orders, because each accepted order's
/// full remaining quantity is reserved until filled or canceled.
#[derive(Debug, Clone)]
pub struct RiskManager {
    limits: RiskLimits,
    inventory_by_symbol: HashMap<String, f64>,
    reserved_by_symbol: HashMap<String, f64>,
    reservation_by_order_id: HashMap<String, Reservation>,
}

impl RiskManager {
    pub fn new(limits: RiskLimits) -> Self {
        Self {
            limits,
            inventory_by_symbol: HashMap::new(),
            reserved_by_symbol: HashMap::new(),
            reservation_by_order_id: HashMap::new(),
        }
    }

    pub fn inventory(&self, symbol: &str) -> f64 {
        self.inventory_by_symbol.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn reserved(&self, symbol: &str) -> f64 {
        self.reserved_by_symbol.get(symbol).copied().unwrap_or(0.0)
    }

    /// Ordered pre-trade checks (spec §4.8). On success, reserves the order's
    /// full quantity against future exposure if `order_id` is given and not
    /// already reserved.
    pub fn check_new_order(
        &mut self,
        symbol: &str,
        side: Side,
        qty: f64,
        price: Option<f64>,
        order_id: Option<&str>,
    ) -> Result<(), RejectReason> {
        if !qty.is_finite() || qty <= 0.0 {
            return Err(RejectReason::QtyNonPositiveOrInvalid);
        }
        if !approx_ge(self.limits.max_order_qty, qty) {
            return Err(RejectReason::QtyExceedsMaxOrderQty);
        }
        if let Some(price) = price {
            if !price.is_finite() || price <= 0.0 {
                return Err(RejectReason::InvalidPrice);
            }
            if let Some(max_notional) = self.limits.max_order_notional {
                if !approx_ge(max_notional, qty * price) {
                    return Err(RejectReason::NotionalExceedsMaxOrderNotional);
                }
            }
        }

        let projected = self.inventory(symbol) + self.reserved(symbol) + side.sign() * qty;
        if !approx_ge(self.limits.max_abs_inventory, projected.abs()) {
            return Err(RejectReason::InventoryLimitBreach);
        }

        if let Some(order_id) = order_id {
            if !self.reservation_by_order_id.contains_key(order_id) {
                self.reservation_by_order_id.insert(
                    order_id.to_string(),
                    Reservation {
                        symbol: symbol.to_string(),
                        side,
                        remaining_abs: qty,
                    },
                );
                *self.reserved_by_symbol.entry(symbol.to_string()).or_default() +=
                    side.sign() * qty;
            }
        }
        Ok(())
    }

    /// Applies a fill: updates inventory unconditionally, and releases (or
    /// shrinks) the order's reservation by the delta between its new and old
    /// remaining quantity (spec §4.8) — correct for partial fills.
    pub fn on_fill(
        &mut self,
        symbol: &str,
        side: Side,
        qty: f64,
        order_id: Option<&str>,
        remaining_qty: Option<f64>,
    ) {
        *self.inventory_by_symbol.entry(symbol.to_string()).or_default() += side.sign() * qty;

        let Some(order_id) = order_id else { return };
        let Some(reservation) = self.reservation_by_order_id.get_mut(order_id) else {
            return;
        };
        if reservation.symbol != symbol {
            return;
        }

        let old_signed = reservation.side.sign() * reservation.remaining_abs;
        let new_remaining_abs = remaining_qty.unwrap_or(0.0).max(0.0);
        let new_signed = reservation.side.sign() * new_remaining_abs;
        *self.reserved_by_symbol.entry(symbol.to_string()).or_default() += new_signed - old_signed;

        if approx_zero(new_remaining_abs) {
            self.reservation_by_order_id.remove(order_id);
        } else {
            reservation.remaining_abs = new_remaining_abs;
        }
    }

    /// Releases an order's reservation in full (spec §4.8). No-op if the
    /// order id is unknown.
    pub fn on_cancel(&mut self, order_id: &str) {
        let Some(reservation) = self.reservation_by_order_id.remove(order_id) else {
            return;
        };
        let entry = self
            .reserved_by_symbol
            .entry(reservation.symbol.clone())
            .or_default();
        *entry -= reservation.side.sign() * reservation.remaining_abs;
        if entry.abs() <= EPS {
            *entry = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> RiskLimits {
        RiskLimits::new(1.0, 100.0, None)
    }

    #[test]
    fn rejects_qty_exceeding_max_order_qty() {
        let mut risk = RiskManager::new(limits());
        let result = risk.check_new_order("BTC-USD", Side::Buy, 10.0, Some(100.0), Some("o1"));
        assert_eq!(result, Err(RejectReason::QtyExceedsMaxOrderQty));
        assert_eq!(risk.reserved("BTC-USD"), 0.0);
    }

    #[test]
    fn reservation_releases_fully_on_cancel() {
        let mut risk = RiskManager::new(RiskLimits::new(10.0, 100.0, None));
        risk.check_new_order("BTC-USD", Side::Buy, 1.0, Some(100.0), Some("o1"))
            .unwrap();
        assert_eq!(risk.reserved("BTC-USD"), 1.0);
        risk.on_cancel("o1");
        assert_eq!(risk.reserved("BTC-USD"), 0.0);
    }

    #[test]
    fn partial_fills_release_reservation_by_delta() {
        let mut risk = RiskManager::new(RiskLimits::new(10.0, 100.0, None));
        risk.check_new_order("BTC-USD", Side::Buy, 1.0, Some(100.0), Some("o1"))
            .unwrap();
        assert_eq!(risk.reserved("BTC-USD"), 1.0);

        risk.on_fill("BTC-USD", Side::Buy, 0.5, Some("o1"), Some(0.5));
        assert_eq!(risk.inventory("BTC-USD"), 0.5);
        assert_eq!(risk.reserved("BTC-USD"), 0.5);

        risk.on_fill("BTC-USD", Side::Buy, 0.5, Some("o1"), Some(0.0));
        assert_eq!(risk.inventory("BTC-USD"), 1.0);
        assert_eq!(risk.reserved("BTC-USD"), 0.0);
    }

    #[test]
    fn inventory_limit_breach_blocks_new_order() {
        let mut risk = RiskManager::new(RiskLimits::new(10.0, 1.0, None));
        risk.check_new_order("BTC-USD", Side::Buy, 1.0, Some(100.0), Some("o1"))
            .unwrap();
        let result = risk.check_new_order("BTC-USD", Side::Buy, 1.0, Some(100.0), Some("o2"));
        assert_eq!(result, Err(RejectReason::InventoryLimitBreach));
    }
}
