use serde::{Deserialize, Serialize};

use crate::{
    data::{RiskTable, Subject},
    error::Result,
};

/// one nelson-aalen step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardData {
    pub time: f64,
    pub hazard: f64,            // events / at risk at this time
    pub cumulative_hazard: f64, // running sum of `hazard`
}

/// nelson-aalen cumulative hazard, one entry per distinct event time
pub fn nelson_aalen(subjects: &[Subject]) -> Result<Vec<HazardData>> {
    let table = RiskTable::from_subjects(subjects)?;

    let mut cumulative_hazard = 0.0;
    let steps: Vec<HazardData> = table
        .event_rows()
        .map(|row| {
            let hazard = row.events as f64 / row.at_risk as f64;
            cumulative_hazard += hazard;
            HazardData {
                time: row.time,
                hazard,
                cumulative_hazard,
            }
        })
        .collect();

    log::debug!(
        "nelson-aalen: n={} steps={} cumulative_hazard={:.4}",
        table.n_samples(),
        steps.len(),
        cumulative_hazard
    );

    Ok(steps)
}
