use std::fmt;

/// Machine-friendly rejection reason codes (spec §4.8, §6). `Display`
/// renders the exact snake_case code a caller matches on
/// (`order.rejected.reason`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    QtyNonPositiveOrInvalid,
    QtyExceedsMaxOrderQty,
    InvalidPrice,
    NotionalExceedsMaxOrderNotional,
    InventoryLimitBreach,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            RejectReason::QtyNonPositiveOrInvalid => "qty_non_positive_or_invalid",
            RejectReason::QtyExceedsMaxOrderQty => "qty_exceeds_max_order_qty",
            RejectReason::InvalidPrice => "invalid_price",
            RejectReason::NotionalExceedsMaxOrderNotional => "notional_exceeds_max_order_notional",
            RejectReason::InventoryLimitBreach => "inventory_limit_breach",
        };
        f.write_str(code)
    }
}
