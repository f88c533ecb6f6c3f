use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{
    data::{CompetingRiskSubject, RiskTable, Subject},
    error::{Result, SurvivalError},
};

/// cumulative incidence for one event type, starts at (0, 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeIncidenceFunction {
    pub time: Array1<f64>,
    pub cif: Array1<f64>,
    pub event_type: u32,
}

impl CumulativeIncidenceFunction {
    /// step-function value at t
    pub fn cif_at(&self, t: f64) -> f64 {
        let steps = self.time.iter().take_while(|&&time| time <= t).count();
        match steps {
            0 => 0.0,
            k => self.cif[k - 1],
        }
    }
}

/// aalen-johansen style CIF for `event_of_interest`
///
/// unlike kaplan-meier this emits a point at every distinct observed time,
/// censoring-only times included. each increment is weighted by the all-cause
/// survival just before that time.
///
/// `event_of_interest` is a cause code, so 0 (censoring) is rejected.
pub fn cumulative_incidence(
    subjects: &[CompetingRiskSubject],
    event_of_interest: u32,
) -> Result<CumulativeIncidenceFunction> {
    if event_of_interest == 0 {
        return Err(SurvivalError::invalid_parameter("event_of_interest", event_of_interest));
    }
    let table = RiskTable::from_competing_risks(subjects, event_of_interest)?;

    let mut time = vec![0.0];
    let mut cif = vec![0.0];
    let mut current_cif = 0.0;
    let mut survival = 1.0; // all-cause

    for row in table.rows() {
        let at_risk = row.at_risk as f64;
        let survival_before = survival;

        if row.events > 0 {
            survival *= (at_risk - row.events as f64) / at_risk;
        }
        if row.of_interest > 0 {
            current_cif += row.of_interest as f64 / at_risk * survival_before;
        }

        time.push(row.time);
        cif.push(current_cif);
    }

    log::debug!(
        "cif: event_type={} n={} points={} final_cif={:.4}",
        event_of_interest,
        table.n_samples(),
        time.len(),
        current_cif
    );

    Ok(CumulativeIncidenceFunction {
        time: Array1::from(time),
        cif: Array1::from(cif),
        event_type: event_of_interest,
    })
}

/// plain cohort for one cause, every other cause treated as censoring
///
/// 1 - KM on this cohort is the naive estimate that overstates incidence
/// when competing events are present.
pub fn cause_specific_cohort(subjects: &[CompetingRiskSubject], event_type: u32) -> Vec<Subject> {
    subjects
        .iter()
        .map(|s| Subject::new(s.id.clone(), s.time, s.event_type == event_type))
        .collect()
}
