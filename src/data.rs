use serde::{Deserialize, Serialize};

use crate::error::{Result, SurvivalError};

/// one subject: observed time + whether it was a true event or censored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub time: f64,   // min(event time, censoring time)
    pub event: bool, // true = event observed, false = censored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covariates: Option<Covariates>,
}

impl Subject {
    pub fn new(id: impl Into<String>, time: f64, event: bool) -> Self {
        Self {
            id: id.into(),
            time,
            event,
            covariates: None,
        }
    }

    pub fn with_covariates(mut self, covariates: Covariates) -> Self {
        self.covariates = Some(covariates);
        self
    }

    /// group label for two-group cohorts, if tagged
    pub fn group(&self) -> Option<u8> {
        match self.covariates {
            Some(Covariates::Group(group)) => Some(group),
            _ => None,
        }
    }
}

/// covariates attached to a subject
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Covariates {
    /// two-group comparisons: 0 or 1
    Group(u8),
    /// the simulated clinical trio used by the proportional hazards generator
    Clinical(ClinicalCovariates),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClinicalCovariates {
    pub age: f64,
    pub treatment: u8,
    pub biomarker: f64,
}

/// log hazard ratios per covariate; `None` means the covariate has no effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coefficients {
    pub age: Option<f64>,
    pub treatment: Option<f64>,
    pub biomarker: Option<f64>,
}

impl Coefficients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_age(mut self, beta: f64) -> Self {
        self.age = Some(beta);
        self
    }

    pub fn with_treatment(mut self, beta: f64) -> Self {
        self.treatment = Some(beta);
        self
    }

    pub fn with_biomarker(mut self, beta: f64) -> Self {
        self.biomarker = Some(beta);
        self
    }

    /// sum of beta * x; covariates without a coefficient add nothing
    pub fn linear_predictor(&self, covariates: &ClinicalCovariates) -> f64 {
        let mut eta = 0.0;
        if let Some(beta) = self.age {
            eta += beta * covariates.age;
        }
        if let Some(beta) = self.treatment {
            eta += beta * f64::from(covariates.treatment);
        }
        if let Some(beta) = self.biomarker {
            eta += beta * covariates.biomarker;
        }
        eta
    }
}

/// hazard ratio for an `increment`-unit change in a covariate, e.g. 10 years of age
pub fn hazard_ratio(coefficient: f64, increment: f64) -> f64 {
    (coefficient * increment).exp()
}

/// competing risks subject: 0 = censored, 1..K = which cause ended follow-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetingRiskSubject {
    pub id: String,
    pub time: f64,
    pub event_type: u32,
}

impl CompetingRiskSubject {
    pub fn new(id: impl Into<String>, time: f64, event_type: u32) -> Self {
        Self {
            id: id.into(),
            time,
            event_type,
        }
    }

    pub fn is_censored(&self) -> bool {
        self.event_type == 0
    }
}

/// subject that can have the same event repeatedly inside a fixed window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrentEventSubject {
    pub id: String,
    pub event_times: Vec<f64>, // ascending, all <= end_of_follow_up
    pub end_of_follow_up: f64,
}

impl RecurrentEventSubject {
    pub fn n_events(&self) -> usize {
        self.event_times.len()
    }
}

/// survival times must be numbers and not negative
pub(crate) fn validate_times(times: impl IntoIterator<Item = f64>) -> Result<()> {
    for (i, t) in times.into_iter().enumerate() {
        if t.is_nan() || t < 0.0 {
            return Err(SurvivalError::invalid_survival_data(format!(
                "subject {} has invalid time {}",
                i, t
            )));
        }
    }
    Ok(())
}

/// aggregates at one distinct observed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskRow {
    pub time: f64,
    pub at_risk: usize,     // subjects with time >= this time
    pub events: usize,      // any event at exactly this time
    pub of_interest: usize, // subset of `events` matching the caller's mark
}

/// observations sorted once, aggregated per distinct time in a single sweep
#[derive(Debug, Clone)]
pub struct RiskTable {
    n_samples: usize,
    rows: Vec<RiskRow>,
}

impl RiskTable {
    /// build from (time, is_event, is_of_interest) triples
    ///
    /// times must already be validated; NaN would break the ordering.
    pub fn from_observations(observations: impl IntoIterator<Item = (f64, bool, bool)>) -> Self {
        let mut obs: Vec<(f64, bool, bool)> = observations.into_iter().collect();
        obs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = obs.len();
        let mut rows = Vec::new();
        let mut start = 0;

        while start < n {
            let time = obs[start].0;
            let mut end = start;
            let mut events = 0;
            let mut of_interest = 0;

            while end < n && obs[end].0 == time {
                if obs[end].1 {
                    events += 1;
                }
                if obs[end].2 {
                    of_interest += 1;
                }
                end += 1;
            }

            rows.push(RiskRow {
                time,
                at_risk: n - start, // everyone not already gone before this time
                events,
                of_interest,
            });
            start = end;
        }

        Self { n_samples: n, rows }
    }

    /// plain survival cohort: events are the marked observations
    pub fn from_subjects(subjects: &[Subject]) -> Result<Self> {
        validate_times(subjects.iter().map(|s| s.time))?;
        Ok(Self::from_observations(
            subjects.iter().map(|s| (s.time, s.event, s.event)),
        ))
    }

    /// competing risks cohort: any cause counts as an event, `event_of_interest` is marked
    pub fn from_competing_risks(
        subjects: &[CompetingRiskSubject],
        event_of_interest: u32,
    ) -> Result<Self> {
        validate_times(subjects.iter().map(|s| s.time))?;
        Ok(Self::from_observations(subjects.iter().map(|s| {
            (s.time, s.event_type > 0, s.event_type == event_of_interest)
        })))
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// one row per distinct observed time (events or not)
    pub fn rows(&self) -> &[RiskRow] {
        &self.rows
    }

    /// rows where at least one event happened
    pub fn event_rows(&self) -> impl Iterator<Item = &RiskRow> + '_ {
        self.rows.iter().filter(|row| row.events > 0)
    }

    /// unique event times in order
    pub fn event_times(&self) -> Vec<f64> {
        self.event_rows().map(|row| row.time).collect()
    }

    /// how many subjects have time >= t
    pub fn at_risk(&self, t: f64) -> usize {
        // first row at or after t carries the answer
        let idx = self.rows.partition_point(|row| row.time < t);
        self.rows.get(idx).map_or(0, |row| row.at_risk)
    }

    /// events at exactly time t
    pub fn events_at(&self, t: f64) -> usize {
        self.rows
            .binary_search_by(|row| row.time.total_cmp(&t))
            .map(|idx| self.rows[idx].events)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_subjects() -> Vec<Subject> {
        vec![
            Subject::new("a", 3.0, true),
            Subject::new("b", 1.0, true),
            Subject::new("c", 2.0, false),
            Subject::new("d", 3.0, false),
            Subject::new("e", 1.0, true),
        ]
    }

    #[test]
    fn test_risk_table_rows() {
        let table = RiskTable::from_subjects(&create_test_subjects()).unwrap();
        assert_eq!(table.n_samples(), 5);

        let rows = table.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].time, rows[0].at_risk, rows[0].events), (1.0, 5, 2));
        assert_eq!((rows[1].time, rows[1].at_risk, rows[1].events), (2.0, 3, 0));
        // censored at the same time still counts in the risk set
        assert_eq!((rows[2].time, rows[2].at_risk, rows[2].events), (3.0, 2, 1));

        assert_eq!(table.event_times(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_at_risk_lookup() {
        let table = RiskTable::from_subjects(&create_test_subjects()).unwrap();
        assert_eq!(table.at_risk(0.0), 5);
        assert_eq!(table.at_risk(1.0), 5);
        assert_eq!(table.at_risk(1.5), 3);
        assert_eq!(table.at_risk(3.0), 2);
        assert_eq!(table.at_risk(3.5), 0);

        assert_eq!(table.events_at(1.0), 2);
        assert_eq!(table.events_at(2.0), 0);
        assert_eq!(table.events_at(2.5), 0);
    }

    #[test]
    fn test_competing_risk_marks() {
        let subjects = vec![
            CompetingRiskSubject::new("a", 1.0, 1),
            CompetingRiskSubject::new("b", 1.0, 2),
            CompetingRiskSubject::new("c", 2.0, 0),
        ];
        let table = RiskTable::from_competing_risks(&subjects, 2).unwrap();
        let rows = table.rows();
        assert_eq!(rows[0].events, 2);
        assert_eq!(rows[0].of_interest, 1);
        assert_eq!(rows[1].events, 0);
        assert!(subjects[2].is_censored());
    }

    #[test]
    fn test_invalid_times() {
        let subjects = vec![Subject::new("a", -1.0, true)];
        assert!(RiskTable::from_subjects(&subjects).is_err());

        let subjects = vec![Subject::new("a", f64::NAN, true)];
        assert!(RiskTable::from_subjects(&subjects).is_err());
    }

    #[test]
    fn test_empty_table() {
        let table = RiskTable::from_subjects(&[]).unwrap();
        assert_eq!(table.n_samples(), 0);
        assert!(table.rows().is_empty());
        assert_eq!(table.at_risk(1.0), 0);
    }

    #[test]
    fn test_linear_predictor_skips_missing() {
        let covariates = ClinicalCovariates {
            age: 60.0,
            treatment: 1,
            biomarker: 5.0,
        };
        let coefficients = Coefficients::new().with_treatment(-0.5).with_biomarker(0.1);
        assert_relative_eq!(coefficients.linear_predictor(&covariates), 0.0, epsilon = 1e-12);

        let coefficients = coefficients.with_age(0.02);
        assert_relative_eq!(coefficients.linear_predictor(&covariates), 1.2, epsilon = 1e-12);

        assert_eq!(Coefficients::default().linear_predictor(&covariates), 0.0);
    }

    #[test]
    fn test_hazard_ratio() {
        assert_relative_eq!(hazard_ratio(-0.5, 1.0), (-0.5f64).exp());
        assert_relative_eq!(hazard_ratio(0.02, 10.0), (0.2f64).exp());
    }

    #[test]
    fn test_subject_group() {
        let s = Subject::new("x", 1.0, true).with_covariates(Covariates::Group(1));
        assert_eq!(s.group(), Some(1));
        assert_eq!(Subject::new("y", 1.0, true).group(), None);
    }
}
