use serde::{Deserialize, Serialize};

use crate::{
    data::{RiskTable, Subject},
    error::Result,
    special::chi_square_cdf,
};

/// two-group comparisons only
const DEGREES_OF_FREEDOM: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogRankResult {
    pub chi_square: f64,
    pub p_value: f64,
    pub df: u32,
}

impl LogRankResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// log-rank test for equal survival in two groups
///
/// a zero variance (no usable event times) gives chi-square 0 and p = 1.
pub fn log_rank_test(group1: &[Subject], group2: &[Subject]) -> Result<LogRankResult> {
    let table1 = RiskTable::from_subjects(group1)?;
    let table2 = RiskTable::from_subjects(group2)?;

    let mut event_times = table1.event_times();
    event_times.extend(table2.event_times());
    event_times.sort_by(|a, b| a.total_cmp(b));
    event_times.dedup();

    let mut observed_minus_expected = 0.0;
    let mut variance = 0.0;

    for &t in &event_times {
        let n1 = table1.at_risk(t) as f64;
        let n2 = table2.at_risk(t) as f64;
        let total_at_risk = n1 + n2;

        let d1 = table1.events_at(t) as f64;
        let total_events = d1 + table2.events_at(t) as f64;

        if total_at_risk == 0.0 || total_events == 0.0 {
            continue;
        }

        observed_minus_expected += d1 - n1 * total_events / total_at_risk;

        // hypergeometric variance; a lone subject at risk contributes nothing
        if total_at_risk > 1.0 {
            variance += n1 * n2 * total_events * (total_at_risk - total_events)
                / (total_at_risk * total_at_risk * (total_at_risk - 1.0));
        }
    }

    let chi_square = if variance > 0.0 {
        observed_minus_expected * observed_minus_expected / variance
    } else {
        0.0
    };
    let p_value = 1.0 - chi_square_cdf(chi_square, DEGREES_OF_FREEDOM);

    log::debug!(
        "log-rank: n1={} n2={} event_times={} chi2={:.4} p={:.4}",
        table1.n_samples(),
        table2.n_samples(),
        event_times.len(),
        chi_square,
        p_value
    );

    Ok(LogRankResult {
        chi_square,
        p_value,
        df: DEGREES_OF_FREEDOM,
    })
}
