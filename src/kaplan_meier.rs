use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{
    data::{validate_times, RiskTable, Subject},
    error::{Result, SurvivalError},
};

/// z for a two-sided 95% interval
const Z_95: f64 = 1.96;

/// floor applied before the log(-log) transform so S = 0 stays plottable
const LOG_LOG_FLOOR: f64 = 0.001;

/// kaplan-meier curve as parallel columns, first entry is always (0, 1, n, 0, 1, 1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KaplanMeierResult {
    pub time: Array1<f64>,
    pub survival: Array1<f64>,
    pub n_risk: Array1<usize>,
    pub n_event: Array1<usize>,
    pub confidence_lower: Array1<f64>,
    pub confidence_upper: Array1<f64>,
}

impl KaplanMeierResult {
    /// number of points including the synthetic origin
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// step-function value at t (right-continuous)
    pub fn survival_at(&self, t: f64) -> f64 {
        let steps = self.time.iter().take_while(|&&time| time <= t).count();
        match steps {
            0 => 1.0,
            k => self.survival[k - 1],
        }
    }

    /// first time the curve reaches 0.5, if it ever does
    pub fn median_survival(&self) -> Option<f64> {
        self.time
            .iter()
            .zip(self.survival.iter())
            .find(|&(_, &s)| s <= 0.5)
            .map(|(&t, _)| t)
    }

    /// log(-log(S)) for the proportional hazards diagnostic plot
    ///
    /// the origin maps to -inf since log(-log(1)) = log(0).
    pub fn log_log_survival(&self) -> Array1<f64> {
        self.survival
            .mapv(|s| (-(s.max(LOG_LOG_FLOOR)).ln()).ln())
    }
}

/// kaplan-meier survival curve with greenwood 95% intervals
///
/// steps only at distinct event times; subjects censored at an event time are
/// still in that time's risk set. the interval is the plain linear one,
/// S ± 1.96·SE clipped to [0, 1], not the log-log variant.
pub fn kaplan_meier(subjects: &[Subject]) -> Result<KaplanMeierResult> {
    let table = RiskTable::from_subjects(subjects)?;

    let mut time = vec![0.0];
    let mut survival = vec![1.0];
    let mut n_risk = vec![table.n_samples()];
    let mut n_event = vec![0];
    let mut confidence_lower = vec![1.0];
    let mut confidence_upper = vec![1.0];

    let mut current_survival = 1.0;
    let mut cumulative_variance = 0.0;

    for row in table.event_rows() {
        let at_risk = row.at_risk as f64;
        let events = row.events as f64;

        current_survival *= (at_risk - events) / at_risk;

        // greenwood; infinite once everyone at risk fails
        cumulative_variance += events / (at_risk * (at_risk - events));

        let (lower, upper) = if current_survival > 0.0 {
            let se = current_survival * cumulative_variance.sqrt();
            (
                (current_survival - Z_95 * se).max(0.0),
                (current_survival + Z_95 * se).min(1.0),
            )
        } else {
            (0.0, 0.0)
        };

        time.push(row.time);
        survival.push(current_survival);
        n_risk.push(row.at_risk);
        n_event.push(row.events);
        confidence_lower.push(lower);
        confidence_upper.push(upper);
    }

    log::debug!(
        "kaplan-meier: n={} event_times={} final_survival={:.4}",
        table.n_samples(),
        time.len() - 1,
        current_survival
    );

    Ok(KaplanMeierResult {
        time: Array1::from(time),
        survival: Array1::from(survival),
        n_risk: Array1::from(n_risk),
        n_event: Array1::from(n_event),
        confidence_lower: Array1::from(confidence_lower),
        confidence_upper: Array1::from(confidence_upper),
    })
}

/// kaplan-meier from a landmark time onward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkAnalysisResult {
    pub landmark_time: f64,
    pub km_result: KaplanMeierResult, // on the time-since-landmark scale
    pub included_subjects: usize,
}

impl LandmarkAnalysisResult {
    /// curve times mapped back onto the original time axis
    pub fn calendar_times(&self) -> Array1<f64> {
        &self.km_result.time + self.landmark_time
    }

    /// subjects dropped because their follow-up ended before the landmark
    pub fn excluded_subjects(&self, cohort_size: usize) -> usize {
        cohort_size.saturating_sub(self.included_subjects)
    }
}

/// subjects still under observation at `landmark_time`, clock reset to zero there
pub fn landmark_cohort(subjects: &[Subject], landmark_time: f64) -> Vec<Subject> {
    subjects
        .iter()
        .filter(|s| s.time >= landmark_time)
        .map(|s| Subject {
            time: s.time - landmark_time,
            ..s.clone()
        })
        .collect()
}

/// conditional survival given survival to `landmark_time`
pub fn landmark_analysis(subjects: &[Subject], landmark_time: f64) -> Result<LandmarkAnalysisResult> {
    if !landmark_time.is_finite() || landmark_time < 0.0 {
        return Err(SurvivalError::invalid_parameter("landmark_time", landmark_time));
    }
    validate_times(subjects.iter().map(|s| s.time))?;

    let cohort = landmark_cohort(subjects, landmark_time);
    let km_result = kaplan_meier(&cohort)?;

    Ok(LandmarkAnalysisResult {
        landmark_time,
        included_subjects: cohort.len(),
        km_result,
    })
}
