//! # survival lab
//!
//! the number-crunching half of a survival analysis course - estimators plus
//! synthetic cohorts to feed them
//!
//! ## what you get
//!
//! - kaplan-meier curves w/ greenwood confidence bands
//! - nelson-aalen cumulative hazard
//! - two-group log-rank test
//! - cumulative incidence for competing risks
//! - seeded cohort generators (exponential, weibull, competing risks,
//!   proportional hazards w/ covariates, recurrent events)
//!
//! everything is a pure function: no global state, safe to call from any thread.
//!
//! ## quick start
//!
//! ```rust
//! use survival_lab::{generate_two_group_data, kaplan_meier, log_rank_test};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // two arms, the second w/ a higher hazard
//! let arms = generate_two_group_data(50, 50, 0.05, 0.08, 0.2, Some(1))?;
//!
//! let km = kaplan_meier(&arms.group1)?;
//! assert_eq!(km.survival[0], 1.0);
//!
//! let test = log_rank_test(&arms.group1, &arms.group2)?;
//! assert!(test.p_value >= 0.0 && test.p_value <= 1.0);
//! # Ok(())
//! # }
//! ```

pub mod competing_risks;
pub mod data;
pub mod error;
pub mod generators;
pub mod kaplan_meier;
pub mod log_rank;
pub mod nelson_aalen;
pub mod parametric;
pub mod rng;
pub mod special;
pub mod utils;

pub use competing_risks::{cause_specific_cohort, cumulative_incidence, CumulativeIncidenceFunction};
pub use data::{
    ClinicalCovariates, Coefficients, CompetingRiskSubject, Covariates, RecurrentEventSubject, Subject,
};
pub use error::{Result, SurvivalError};
pub use generators::{
    generate_competing_risks_data, generate_data_with_covariates, generate_exponential_data,
    generate_non_proportional_hazards_data, generate_recurrent_event_data, generate_two_group_data,
    generate_weibull_data, TwoGroupCohort,
};
pub use kaplan_meier::{kaplan_meier, landmark_analysis, KaplanMeierResult, LandmarkAnalysisResult};
pub use log_rank::{log_rank_test, LogRankResult};
pub use nelson_aalen::{nelson_aalen, HazardData};
pub use rng::RandomSource;
pub use special::{chi_square_cdf, erf};
