use serde::{Deserialize, Serialize};

/// Per-event-sample risk/inventory time series for a single symbol (spec
/// §4.16). Every field is index-aligned: sample `i` describes the engine
/// state immediately after the event carrying `seq[i]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskInventorySeries {
    pub seq: Vec<u64>,
    pub inv: Vec<f64>,
    pub reserved: Vec<f64>,
    pub mid: Vec<f64>,
    pub realized: Vec<f64>,
    pub unrealized: Vec<f64>,
    pub total: Vec<f64>,
    pub drawdown: Vec<f64>,
}

impl RiskInventorySeries {
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn append(
        &mut self,
        seq: u64,
        inv: f64,
        reserved: f64,
        mid: f64,
        realized: f64,
        unrealized: f64,
        total: f64,
        drawdown: f64,
    ) {
        self.seq.push(seq);
        self.inv.push(inv);
        self.reserved.push(reserved);
        self.mid.push(mid);
        self.realized.push(realized);
        self.unrealized.push(unrealized);
        self.total.push(total);
        self.drawdown.push(drawdown);
    }
}

/// Founder-grade risk & inventory summary statistics (spec §4.16),
/// deterministic and replay-safe over a recorded [`RiskInventorySeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskInventorySummary {
    pub inv_max_abs: f64,
    pub inv_mean: f64,
    pub inv_std: f64,
    pub time_near_max_frac: f64,
    pub max_drawdown: f64,
    pub pnl_total_end: f64,
}

impl RiskInventorySummary {
    pub fn empty() -> Self {
        Self {
            inv_max_abs: 0.0,
            inv_mean: 0.0,
            inv_std: 0.0,
            time_near_max_frac: 0.0,
            max_drawdown: 0.0,
            pnl_total_end: 0.0,
        }
    }

    /// Summarizes `series`. `max_inventory` sets the 0.8x threshold for
    /// `time_near_max_frac` (spec §4.16).
    pub fn summarize(series: &RiskInventorySeries, max_inventory: f64) -> Self {
        if series.is_empty() {
            return Self::empty();
        }

        let n = series.inv.len() as f64;
        let mean = series.inv.iter().sum::<f64>() / n;
        let variance =
            series.inv.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0).max(1.0);

        let inv_max_abs = series.inv.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
        let max_drawdown = series
            .drawdown
            .iter()
            .copied()
            .fold(f64::MIN, f64::max);
        let near_threshold = 0.8 * max_inventory;
        let time_near = series.inv.iter().filter(|x| x.abs() >= near_threshold).count() as f64 / n;

        Self {
            inv_max_abs,
            inv_mean: mean,
            inv_std: variance.sqrt(),
            time_near_max_frac: time_near,
            max_drawdown,
            pnl_total_end: *series.total.last().expect("non-empty series"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_summarizes_to_zeros() {
        let series = RiskInventorySeries::default();
        assert_eq!(RiskInventorySummary::summarize(&series, 10.0), RiskInventorySummary::empty());
    }

    #[test]
    fn summarize_computes_stats() {
        let mut series = RiskInventorySeries::default();
        series.append(1, 1.0, 0.0, 100.0, 0.0, 0.0, 0.0, 0.0);
        series.append(2, 9.0, 0.0, 100.0, 0.0, 0.0, 5.0, 0.0);
        series.append(3, 2.0, 0.0, 100.0, 0.0, 0.0, -3.0, 8.0);

        let summary = RiskInventorySummary::summarize(&series, 10.0);
        assert_eq!(summary.inv_max_abs, 9.0);
        assert!((summary.inv_mean - 4.0).abs() < 1e-9);
        assert_eq!(summary.max_drawdown, 8.0);
        assert_eq!(summary.pnl_total_end, -3.0);
        assert!((summary.time_near_max_frac - (1.0 / 3.0)).abs() < 1e-9);
    }
}
