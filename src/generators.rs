//! synthetic cohorts drawn by inverse-CDF sampling
//!
//! every generator is a pure function of its config: same config + same seed,
//! same cohort. per-subject draw order is part of that contract, so it is
//! spelled out on each `generate`.

use serde::{Deserialize, Serialize};

use crate::{
    data::{ClinicalCovariates, Coefficients, CompetingRiskSubject, Covariates, RecurrentEventSubject, Subject},
    error::{ensure_censoring_rate, ensure_positive, Result, SurvivalError},
    rng::RandomSource,
    utils::round_to,
};

/// second group of a two-group cohort is seeded this far from the first
pub const SECOND_GROUP_SEED_OFFSET: u64 = 1000;

/// exponential censoring hazard whose expected censored share is roughly `censoring_rate`
fn censoring_hazard(hazard: f64, censoring_rate: f64) -> f64 {
    hazard * censoring_rate / (1.0 - censoring_rate)
}

/// combine latent event and censoring times; ties count as events
fn right_censor(id: String, event_time: f64, censor_time: f64) -> Subject {
    Subject::new(
        id,
        round_to(event_time.min(censor_time), 2),
        event_time <= censor_time,
    )
}

fn subject_id(i: usize) -> String {
    format!("subject_{}", i + 1)
}

fn log_cohort(kind: &str, cohort: &[Subject]) {
    let events = cohort.iter().filter(|s| s.event).count();
    log::debug!(
        "generated {} cohort: n={} events={} censored={}",
        kind,
        cohort.len(),
        events,
        cohort.len() - events
    );
}

/// exponential event times with exponential censoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExponentialConfig {
    pub n: usize,
    pub lambda: f64,         // event hazard
    pub censoring_rate: f64, // target censored share, [0, 1)
    pub seed: Option<u64>,
}

impl Default for ExponentialConfig {
    fn default() -> Self {
        Self {
            n: 100,
            lambda: 0.05,
            censoring_rate: 0.3,
            seed: None,
        }
    }
}

impl ExponentialConfig {
    pub fn new(n: usize, lambda: f64) -> Self {
        Self {
            n,
            lambda,
            ..Self::default()
        }
    }

    pub fn with_censoring_rate(mut self, censoring_rate: f64) -> Self {
        self.censoring_rate = censoring_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("lambda", self.lambda)?;
        ensure_censoring_rate("censoring_rate", self.censoring_rate)
    }

    /// draws per subject: event u, censoring u
    pub fn generate(&self) -> Result<Vec<Subject>> {
        self.validate()?;
        let mut rng = RandomSource::new(self.seed);
        let censor_hazard = censoring_hazard(self.lambda, self.censoring_rate);

        let cohort: Vec<Subject> = (0..self.n)
            .map(|i| {
                let event_time = rng.exponential(self.lambda);
                let censor_time = rng.exponential(censor_hazard);
                right_censor(subject_id(i), event_time, censor_time)
            })
            .collect();

        log_cohort("exponential", &cohort);
        Ok(cohort)
    }
}

/// weibull event times, S(t) = exp(-λ t^k), with exponential censoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeibullConfig {
    pub n: usize,
    pub lambda: f64, // scale
    pub shape: f64,  // k: > 1 rising hazard, < 1 falling
    pub censoring_rate: f64,
    pub seed: Option<u64>,
}

impl Default for WeibullConfig {
    fn default() -> Self {
        Self {
            n: 100,
            lambda: 0.1,
            shape: 1.5,
            censoring_rate: 0.3,
            seed: None,
        }
    }
}

impl WeibullConfig {
    pub fn new(n: usize, lambda: f64, shape: f64) -> Self {
        Self {
            n,
            lambda,
            shape,
            ..Self::default()
        }
    }

    pub fn with_censoring_rate(mut self, censoring_rate: f64) -> Self {
        self.censoring_rate = censoring_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("lambda", self.lambda)?;
        ensure_positive("shape", self.shape)?;
        ensure_censoring_rate("censoring_rate", self.censoring_rate)
    }

    /// draws per subject: event u, censoring u
    pub fn generate(&self) -> Result<Vec<Subject>> {
        self.validate()?;
        let mut rng = RandomSource::new(self.seed);
        let censor_hazard = censoring_hazard(self.lambda, self.censoring_rate);

        let cohort: Vec<Subject> = (0..self.n)
            .map(|i| {
                let event_time = rng.exponential(self.lambda).powf(1.0 / self.shape);
                let censor_time = rng.exponential(censor_hazard);
                right_censor(subject_id(i), event_time, censor_time)
            })
            .collect();

        log_cohort("weibull", &cohort);
        Ok(cohort)
    }
}

/// two independent exponential arms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoGroupCohort {
    pub group1: Vec<Subject>, // tagged Group(0)
    pub group2: Vec<Subject>, // tagged Group(1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoGroupConfig {
    pub n1: usize,
    pub n2: usize,
    pub lambda1: f64,
    pub lambda2: f64,
    pub censoring_rate: f64,
    pub seed: Option<u64>,
}

impl Default for TwoGroupConfig {
    fn default() -> Self {
        Self {
            n1: 50,
            n2: 50,
            lambda1: 0.05,
            lambda2: 0.08,
            censoring_rate: 0.3,
            seed: None,
        }
    }
}

impl TwoGroupConfig {
    pub fn new(n1: usize, n2: usize, lambda1: f64, lambda2: f64) -> Self {
        Self {
            n1,
            n2,
            lambda1,
            lambda2,
            ..Self::default()
        }
    }

    pub fn with_censoring_rate(mut self, censoring_rate: f64) -> Self {
        self.censoring_rate = censoring_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn arm(&self, n: usize, lambda: f64, seed: Option<u64>) -> ExponentialConfig {
        ExponentialConfig {
            n,
            lambda,
            censoring_rate: self.censoring_rate,
            seed,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("lambda1", self.lambda1)?;
        ensure_positive("lambda2", self.lambda2)?;
        ensure_censoring_rate("censoring_rate", self.censoring_rate)
    }

    /// group 2 runs on `seed + 1000` so the arms don't share a stream
    pub fn generate(&self) -> Result<TwoGroupCohort> {
        self.validate()?;
        let second_seed = self.seed.map(|s| s.wrapping_add(SECOND_GROUP_SEED_OFFSET));

        let tag = |cohort: Vec<Subject>, group: u8| -> Vec<Subject> {
            cohort
                .into_iter()
                .map(|s| s.with_covariates(Covariates::Group(group)))
                .collect()
        };

        let group1 = tag(self.arm(self.n1, self.lambda1, self.seed).generate()?, 0);
        let group2 = tag(self.arm(self.n2, self.lambda2, second_seed).generate()?, 1);

        Ok(TwoGroupCohort { group1, group2 })
    }
}

/// two competing causes plus censoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetingRisksConfig {
    pub n: usize,
    pub lambda1: f64, // hazard of cause 1
    pub lambda2: f64, // hazard of cause 2
    pub censoring_rate: f64,
    pub seed: Option<u64>,
}

impl Default for CompetingRisksConfig {
    fn default() -> Self {
        Self {
            n: 200,
            lambda1: 0.06,
            lambda2: 0.04,
            censoring_rate: 0.2,
            seed: None,
        }
    }
}

impl CompetingRisksConfig {
    pub fn new(n: usize, lambda1: f64, lambda2: f64) -> Self {
        Self {
            n,
            lambda1,
            lambda2,
            ..Self::default()
        }
    }

    pub fn with_censoring_rate(mut self, censoring_rate: f64) -> Self {
        self.censoring_rate = censoring_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("lambda1", self.lambda1)?;
        ensure_positive("lambda2", self.lambda2)?;
        ensure_censoring_rate("censoring_rate", self.censoring_rate)
    }

    /// draws per subject: cause 1 u, cause 2 u, censoring u
    ///
    /// censoring is keyed on lambda1. on exact ties cause 1 wins over cause 2,
    /// and either cause wins over censoring.
    pub fn generate(&self) -> Result<Vec<CompetingRiskSubject>> {
        self.validate()?;
        let mut rng = RandomSource::new(self.seed);
        let censor_hazard = censoring_hazard(self.lambda1, self.censoring_rate);

        let cohort: Vec<CompetingRiskSubject> = (0..self.n)
            .map(|i| {
                let time1 = rng.exponential(self.lambda1);
                let time2 = rng.exponential(self.lambda2);
                let censor_time = rng.exponential(censor_hazard);

                let first = time1.min(time2).min(censor_time);
                let event_type = if first == time1 {
                    1
                } else if first == time2 {
                    2
                } else {
                    0
                };

                CompetingRiskSubject::new(subject_id(i), round_to(first, 2), event_type)
            })
            .collect();

        log::debug!(
            "generated competing risks cohort: n={} cause1={} cause2={}",
            cohort.len(),
            cohort.iter().filter(|s| s.event_type == 1).count(),
            cohort.iter().filter(|s| s.event_type == 2).count()
        );
        Ok(cohort)
    }
}

/// proportional hazards cohort with simulated age, treatment and biomarker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CovariateConfig {
    pub n: usize,
    pub baseline_hazard: f64,
    pub coefficients: Coefficients,
    pub censoring_rate: f64, // keyed on the baseline hazard, not the individual one
    pub seed: Option<u64>,
}

impl Default for CovariateConfig {
    fn default() -> Self {
        Self {
            n: 200,
            baseline_hazard: 0.05,
            coefficients: Coefficients::new().with_age(0.02).with_treatment(-0.5),
            censoring_rate: 0.3,
            seed: None,
        }
    }
}

impl CovariateConfig {
    pub fn new(n: usize, baseline_hazard: f64, coefficients: Coefficients) -> Self {
        Self {
            n,
            baseline_hazard,
            coefficients,
            ..Self::default()
        }
    }

    pub fn with_censoring_rate(mut self, censoring_rate: f64) -> Self {
        self.censoring_rate = censoring_rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("baseline_hazard", self.baseline_hazard)?;
        ensure_censoring_rate("censoring_rate", self.censoring_rate)?;
        let betas = [
            ("coefficients.age", self.coefficients.age),
            ("coefficients.treatment", self.coefficients.treatment),
            ("coefficients.biomarker", self.coefficients.biomarker),
        ];
        for (name, beta) in betas {
            if let Some(beta) = beta.filter(|b| !b.is_finite()) {
                return Err(SurvivalError::invalid_parameter(name, beta));
            }
        }
        Ok(())
    }

    /// draws per subject: age u, treatment u, biomarker u, event u, censoring u
    ///
    /// hazards use the raw draws; the stored age is rounded to whole years and
    /// the biomarker to 2 decimals.
    pub fn generate(&self) -> Result<Vec<Subject>> {
        self.validate()?;
        let mut rng = RandomSource::new(self.seed);
        let censor_hazard = censoring_hazard(self.baseline_hazard, self.censoring_rate);

        let cohort: Vec<Subject> = (0..self.n)
            .map(|i| {
                let age = rng.uniform(40.0, 80.0);
                let treatment = if rng.next_f64() < 0.5 { 0 } else { 1 };
                let biomarker = rng.uniform(0.0, 10.0);

                let raw = ClinicalCovariates {
                    age,
                    treatment,
                    biomarker,
                };
                let hazard = self.baseline_hazard * self.coefficients.linear_predictor(&raw).exp();

                let event_time = rng.exponential(hazard);
                let censor_time = rng.exponential(censor_hazard);

                right_censor(subject_id(i), event_time, censor_time).with_covariates(
                    Covariates::Clinical(ClinicalCovariates {
                        age: round_to(age, 0),
                        treatment,
                        biomarker: round_to(biomarker, 2),
                    }),
                )
            })
            .collect();

        log_cohort("covariate", &cohort);
        Ok(cohort)
    }
}

/// largest accepted `mean_events_per_subject`
///
/// the count draw is at most ~37x the mean, so this keeps every per-subject
/// allocation small.
pub const MAX_MEAN_EVENTS_PER_SUBJECT: f64 = 1000.0;

/// repeated events inside a fixed follow-up window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurrentEventConfig {
    pub n: usize,
    pub mean_events_per_subject: f64,
    pub follow_up_time: f64,
    pub seed: Option<u64>,
}

impl Default for RecurrentEventConfig {
    fn default() -> Self {
        Self {
            n: 50,
            mean_events_per_subject: 2.0,
            follow_up_time: 12.0,
            seed: None,
        }
    }
}

impl RecurrentEventConfig {
    pub fn new(n: usize, mean_events_per_subject: f64, follow_up_time: f64) -> Self {
        Self {
            n,
            mean_events_per_subject,
            follow_up_time,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mean = self.mean_events_per_subject;
        if !(0.0..=MAX_MEAN_EVENTS_PER_SUBJECT).contains(&mean) {
            return Err(SurvivalError::invalid_parameter("mean_events_per_subject", mean));
        }
        ensure_positive("follow_up_time", self.follow_up_time)
    }

    /// draws per subject: count u, then one u per event
    ///
    /// the count is floor(-ln(u) * mean), a geometric-like stand-in for a
    /// poisson draw. event times are rounded to 2 decimals, so two events of
    /// one subject can share a timestamp.
    pub fn generate(&self) -> Result<Vec<RecurrentEventSubject>> {
        self.validate()?;
        let mut rng = RandomSource::new(self.seed);

        let mut cohort = Vec::with_capacity(self.n);
        for i in 0..self.n {
            let draw = (-rng.next_f64().ln() * self.mean_events_per_subject).floor();
            let n_events = if draw.is_finite() {
                draw as usize
            } else {
                // u == 0 exactly; the LCG can land there
                log::warn!("non-finite event count for {}, treating as zero", subject_id(i));
                0
            };

            let mut event_times: Vec<f64> = (0..n_events)
                .map(|_| round_to(rng.uniform(0.0, self.follow_up_time), 2))
                .collect();
            event_times.sort_by(|a, b| a.total_cmp(b));
            event_times.retain(|&t| t <= self.follow_up_time);

            cohort.push(RecurrentEventSubject {
                id: subject_id(i),
                event_times,
                end_of_follow_up: self.follow_up_time,
            });
        }

        log::debug!(
            "generated recurrent event cohort: n={} total_events={}",
            cohort.len(),
            cohort.iter().map(RecurrentEventSubject::n_events).sum::<usize>()
        );
        Ok(cohort)
    }
}

/// constant-hazard arm vs rising-hazard arm, for the log(-log) diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NonProportionalHazardsConfig {
    pub n: usize,              // split across both arms, ceil(n/2) each
    pub group1_hazard: f64,    // exponential arm
    pub group2_lambda: f64,    // weibull arm scale
    pub group2_shape: f64,     // weibull arm shape
    pub censoring_cutoff: f64, // a coin draw above this censors the subject
    pub seed: Option<u64>,
}

impl Default for NonProportionalHazardsConfig {
    fn default() -> Self {
        Self {
            n: 100,
            group1_hazard: 0.1,
            group2_lambda: 0.08,
            group2_shape: 2.0,
            censoring_cutoff: 0.7,
            seed: None,
        }
    }
}

impl NonProportionalHazardsConfig {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("group1_hazard", self.group1_hazard)?;
        ensure_positive("group2_lambda", self.group2_lambda)?;
        ensure_positive("group2_shape", self.group2_shape)?;
        if !(0.0..=1.0).contains(&self.censoring_cutoff) {
            return Err(SurvivalError::invalid_parameter(
                "censoring_cutoff",
                self.censoring_cutoff,
            ));
        }
        Ok(())
    }

    /// draws per pair: group 1 time u, group 1 coin, group 2 time u, group 2 coin
    ///
    /// censoring here is a coin flip that keeps the latent time as observed,
    /// not the rate-based scheme the other generators use.
    pub fn generate(&self) -> Result<TwoGroupCohort> {
        self.validate()?;
        let mut rng = RandomSource::new(self.seed);

        let per_group = (self.n + 1) / 2;
        let mut group1 = Vec::with_capacity(per_group);
        let mut group2 = Vec::with_capacity(per_group);

        for i in 0..per_group {
            let time1 = rng.exponential(self.group1_hazard);
            let censored1 = rng.next_f64() > self.censoring_cutoff;
            group1.push(
                Subject::new(format!("g1_subject_{}", i + 1), round_to(time1, 2), !censored1)
                    .with_covariates(Covariates::Group(0)),
            );

            let time2 = rng
                .exponential(self.group2_lambda)
                .powf(1.0 / self.group2_shape);
            let censored2 = rng.next_f64() > self.censoring_cutoff;
            group2.push(
                Subject::new(format!("g2_subject_{}", i + 1), round_to(time2, 2), !censored2)
                    .with_covariates(Covariates::Group(1)),
            );
        }

        log_cohort("non-proportional group 1", &group1);
        log_cohort("non-proportional group 2", &group2);
        Ok(TwoGroupCohort { group1, group2 })
    }
}

pub fn generate_exponential_data(
    n: usize,
    lambda: f64,
    censoring_rate: f64,
    seed: Option<u64>,
) -> Result<Vec<Subject>> {
    ExponentialConfig {
        n,
        lambda,
        censoring_rate,
        seed,
    }
    .generate()
}

pub fn generate_weibull_data(
    n: usize,
    lambda: f64,
    shape: f64,
    censoring_rate: f64,
    seed: Option<u64>,
) -> Result<Vec<Subject>> {
    WeibullConfig {
        n,
        lambda,
        shape,
        censoring_rate,
        seed,
    }
    .generate()
}

pub fn generate_two_group_data(
    n1: usize,
    n2: usize,
    lambda1: f64,
    lambda2: f64,
    censoring_rate: f64,
    seed: Option<u64>,
) -> Result<TwoGroupCohort> {
    TwoGroupConfig {
        n1,
        n2,
        lambda1,
        lambda2,
        censoring_rate,
        seed,
    }
    .generate()
}

pub fn generate_competing_risks_data(
    n: usize,
    lambda1: f64,
    lambda2: f64,
    censoring_rate: f64,
    seed: Option<u64>,
) -> Result<Vec<CompetingRiskSubject>> {
    CompetingRisksConfig {
        n,
        lambda1,
        lambda2,
        censoring_rate,
        seed,
    }
    .generate()
}

pub fn generate_data_with_covariates(
    n: usize,
    baseline_hazard: f64,
    coefficients: Coefficients,
    censoring_rate: f64,
    seed: Option<u64>,
) -> Result<Vec<Subject>> {
    CovariateConfig {
        n,
        baseline_hazard,
        coefficients,
        censoring_rate,
        seed,
    }
    .generate()
}

pub fn generate_recurrent_event_data(
    n: usize,
    mean_events_per_subject: f64,
    follow_up_time: f64,
    seed: Option<u64>,
) -> Result<Vec<RecurrentEventSubject>> {
    RecurrentEventConfig {
        n,
        mean_events_per_subject,
        follow_up_time,
        seed,
    }
    .generate()
}

pub fn generate_non_proportional_hazards_data(n: usize, seed: Option<u64>) -> Result<TwoGroupCohort> {
    NonProportionalHazardsConfig {
        n,
        seed,
        ..NonProportionalHazardsConfig::default()
    }
    .generate()
}
