use proptest::prelude::*;
use survival_lab::{
    cumulative_incidence, kaplan_meier, log_rank_test, nelson_aalen, utils::percentile,
    CompetingRiskSubject, Subject,
};

// integer-ish times so ties between events and censorings actually happen
fn cohort_strategy(max_len: usize) -> impl Strategy<Value = Vec<Subject>> {
    proptest::collection::vec((0u32..40, any::<bool>()), 0..max_len).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (t, event))| Subject::new(format!("s{}", i), f64::from(t) * 0.5, event))
            .collect()
    })
}

fn competing_strategy(max_len: usize) -> impl Strategy<Value = Vec<CompetingRiskSubject>> {
    proptest::collection::vec((0u32..40, 0u32..3), 0..max_len).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (t, kind))| CompetingRiskSubject::new(format!("c{}", i), f64::from(t) * 0.5, kind))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_kaplan_meier_monotone_within_bands(cohort in cohort_strategy(80)) {
        let km = kaplan_meier(&cohort).unwrap();
        prop_assert_eq!(km.n_risk[0], cohort.len());

        for i in 0..km.len() {
            let s = km.survival[i];
            prop_assert!((0.0..=1.0).contains(&s));
            prop_assert!(km.confidence_lower[i] <= s);
            prop_assert!(s <= km.confidence_upper[i]);
            prop_assert!(km.confidence_lower[i] >= 0.0 && km.confidence_upper[i] <= 1.0);
            if i > 0 {
                prop_assert!(s <= km.survival[i - 1]);
                prop_assert!(km.n_event[i] <= km.n_risk[i]);
            }
        }
    }

    #[test]
    fn prop_nelson_aalen_non_decreasing(cohort in cohort_strategy(80)) {
        let steps = nelson_aalen(&cohort).unwrap();
        let mut previous = 0.0;
        for step in &steps {
            prop_assert!(step.hazard > 0.0 && step.hazard <= 1.0);
            prop_assert!(step.cumulative_hazard >= previous);
            previous = step.cumulative_hazard;
        }
    }

    #[test]
    fn prop_log_rank_well_formed(a in cohort_strategy(40), b in cohort_strategy(40)) {
        let result = log_rank_test(&a, &b).unwrap();
        prop_assert!(result.chi_square >= 0.0 && result.chi_square.is_finite());
        prop_assert!((0.0..=1.0).contains(&result.p_value));
        prop_assert_eq!(result.df, 1);
    }

    #[test]
    fn prop_log_rank_symmetric(a in cohort_strategy(40), b in cohort_strategy(40)) {
        let ab = log_rank_test(&a, &b).unwrap();
        let ba = log_rank_test(&b, &a).unwrap();
        prop_assert!((ab.chi_square - ba.chi_square).abs() < 1e-9 * (1.0 + ab.chi_square));
    }

    #[test]
    fn prop_cif_monotone_and_bounded_by_all_cause(cohort in competing_strategy(80)) {
        let cif1 = cumulative_incidence(&cohort, 1).unwrap();
        let cif2 = cumulative_incidence(&cohort, 2).unwrap();

        let all_cause: Vec<Subject> = cohort
            .iter()
            .map(|s| Subject::new(s.id.clone(), s.time, s.event_type > 0))
            .collect();
        let km = kaplan_meier(&all_cause).unwrap();

        for i in 0..cif1.cif.len() {
            prop_assert!((0.0..=1.0 + 1e-12).contains(&cif1.cif[i]));
            if i > 0 {
                prop_assert!(cif1.cif[i] >= cif1.cif[i - 1]);
                prop_assert!(cif2.cif[i] >= cif2.cif[i - 1]);
            }
            let overall = 1.0 - km.survival_at(cif1.time[i]);
            prop_assert!(cif1.cif[i] + cif2.cif[i] <= overall + 1e-9);
        }
    }

    #[test]
    fn prop_percentile_within_range(
        values in proptest::collection::vec(-1e3f64..1e3, 1..50),
        p in 0.0f64..=100.0,
    ) {
        let q = percentile(&values, p).unwrap();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(q >= min - 1e-9 && q <= max + 1e-9);
    }
}
