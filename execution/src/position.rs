use sim_types::{approx_zero, Side};

/// `{ symbol, inventory (signed), avg_price, realized_pnl }` (spec §3,
/// §4.9). Positive inventory is long, negative is short. `avg_price` is a
/// size-weighted entry; reducing fills realize PnL, a flip opens the
/// residual at the fill price.
#[derive(Debug, Clone)]
pub struct Position {
    pub symbol: String,
    pub inventory: f64,
    pub avg_price: f64,
    pub realized_pnl: f64,
}

impl Position {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            inventory: 0.0,
            avg_price: 0.0,
            realized_pnl: 0.0,
        }
    }

    /// Applies a fill of `qty > 0` at `price > 0` (spec §4.9).
    pub fn on_fill(&mut self, side: Side, qty: f64, price: f64) {
        let signed = side.sign() * qty;

        if approx_zero(self.inventory) {
            self.inventory = signed;
            self.avg_price = price;
            return;
        }

        let same_direction = self.inventory.signum() == signed.signum();
        if same_direction {
            let new_inventory = self.inventory + signed;
            self.avg_price =
                (self.avg_price * self.inventory.abs() + price * qty) / new_inventory.abs();
            self.inventory = new_inventory;
            return;
        }

        // Opposite direction: reduces (and possibly flips) the position.
        let closed = qty.min(self.inventory.abs());
        let pnl_delta = if self.inventory > 0.0 {
            (price - self.avg_price) * closed
        } else {
            (self.avg_price - price) * closed
        };
        self.realized_pnl += pnl_delta;

        let old_sign = self.inventory.signum();
        let new_inventory = self.inventory + signed;
        self.inventory = new_inventory;

        if approx_zero(new_inventory) {
            self.inventory = 0.0;
            self.avg_price = 0.0;
        } else if new_inventory.signum() != old_sign {
            self.avg_price = price;
        }
        // Otherwise: partial close, remaining position keeps its entry price.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_flat_position() {
        let mut position = Position::new("BTC-USD");
        position.on_fill(Side::Buy, 2.0, 100.0);
        assert_eq!(position.inventory, 2.0);
        assert_eq!(position.avg_price, 100.0);
    }

    #[test]
    fn flip_realizes_pnl_and_opens_residual_at_fill_price() {
        let mut position = Position::new("BTC-USD");
        position.on_fill(Side::Sell, 2.0, 100.0);
        assert_eq!(position.inventory, -2.0);
        assert_eq!(position.avg_price, 100.0);

        position.on_fill(Side::Buy, 3.0, 90.0);
        assert!((position.realized_pnl - 20.0).abs() < 1e-9);
        assert!((position.inventory - 1.0).abs() < 1e-9);
        assert_eq!(position.avg_price, 90.0);
    }

    #[test]
    fn weighted_average_on_same_direction_adds() {
        let mut position = Position::new("BTC-USD");
        position.on_fill(Side::Buy, 1.0, 100.0);
        position.on_fill(Side::Buy, 1.0, 110.0);
        assert_eq!(position.inventory, 2.0);
        assert!((position.avg_price - 105.0).abs() < 1e-9);
    }

    #[test]
    fn full_close_zeroes_avg_price() {
        let mut position = Position::new("BTC-USD");
        position.on_fill(Side::Buy, 1.0, 100.0);
        position.on_fill(Side::Sell, 1.0, 105.0);
        assert_eq!(position.inventory, 0.0);
        assert_eq!(position.avg_price, 0.0);
        assert!((position.realized_pnl - 5.0).abs() < 1e-9);
    }
}
