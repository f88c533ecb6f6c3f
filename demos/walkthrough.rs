use survival_lab::{
    cause_specific_cohort, cumulative_incidence, generate_competing_risks_data,
    generate_data_with_covariates, generate_exponential_data, generate_non_proportional_hazards_data,
    generate_recurrent_event_data, generate_two_group_data, kaplan_meier, landmark_analysis,
    log_rank_test, nelson_aalen,
    parametric::{time_grid, ParametricModel},
    utils::{format_number, percentile},
    Coefficients, Covariates,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Survival Analysis Walkthrough");
    println!("=============================\n");

    // Example 1: Kaplan-Meier on an exponential cohort
    println!("Example 1: Kaplan-Meier Estimate");
    println!("--------------------------------");

    let cohort = generate_exponential_data(100, 0.05, 0.3, Some(42))?;
    let events = cohort.iter().filter(|s| s.event).count();
    println!("Subjects: {}, events: {}, censored: {}", cohort.len(), events, cohort.len() - events);

    let km = kaplan_meier(&cohort)?;
    println!("{:>8} {:>8} {:>6} {:>6} {:>16}", "Time", "S(t)", "Risk", "Events", "95% CI");
    println!("{:-<50}", "");
    for i in (0..km.len()).step_by((km.len() / 10).max(1)) {
        println!(
            "{:>8.2} {:>8.4} {:>6} {:>6}   [{:.3}, {:.3}]",
            km.time[i], km.survival[i], km.n_risk[i], km.n_event[i],
            km.confidence_lower[i], km.confidence_upper[i]
        );
    }
    match km.median_survival() {
        Some(median) => println!("Median survival: {:.2} (true: {:.2})", median, 2f64.ln() / 0.05),
        None => println!("Median survival not reached"),
    }
    println!();

    // Example 2: Nelson-Aalen vs -ln(KM)
    println!("Example 2: Nelson-Aalen Cumulative Hazard");
    println!("-----------------------------------------");

    let hazard = nelson_aalen(&cohort)?;
    let truth = ParametricModel::exponential(0.05)?;
    for step in hazard.iter().step_by((hazard.len() / 5).max(1)) {
        println!(
            "  t = {:>6.2}: H(t) = {:.4}, -ln S(t) = {:.4}, true H(t) = {:.4}",
            step.time,
            step.cumulative_hazard,
            -km.survival_at(step.time).max(f64::MIN_POSITIVE).ln(),
            truth.cumulative_hazard(step.time)
        );
    }
    println!();

    // Example 3: log-rank test between two arms
    println!("Example 3: Log-Rank Test");
    println!("------------------------");

    let arms = generate_two_group_data(80, 80, 0.05, 0.1, 0.2, Some(7))?;
    let test = log_rank_test(&arms.group1, &arms.group2)?;
    println!(
        "Chi-square = {}, df = {}, p = {}",
        format_number(test.chi_square, 3),
        test.df,
        format_number(test.p_value, 4)
    );
    println!("Significant at 0.05: {}\n", test.is_significant(0.05));

    // Example 4: competing risks
    println!("Example 4: Cumulative Incidence with Competing Risks");
    println!("---------------------------------------------------");

    let competing = generate_competing_risks_data(200, 0.06, 0.04, 0.2, Some(3))?;
    let cif1 = cumulative_incidence(&competing, 1)?;
    let cif2 = cumulative_incidence(&competing, 2)?;
    let naive = kaplan_meier(&cause_specific_cohort(&competing, 1))?;

    println!("{:>8} {:>10} {:>10} {:>12}", "Time", "CIF(1)", "CIF(2)", "1-KM naive");
    for &t in &[5.0, 10.0, 20.0, 40.0] {
        println!(
            "{:>8.1} {:>10.4} {:>10.4} {:>12.4}",
            t,
            cif1.cif_at(t),
            cif2.cif_at(t),
            1.0 - naive.survival_at(t)
        );
    }
    println!();

    // Example 5: covariates and proportional hazards
    println!("Example 5: Cohort with Covariates");
    println!("---------------------------------");

    let coefficients = Coefficients::new().with_age(0.02).with_treatment(-0.5);
    let covariate_cohort = generate_data_with_covariates(200, 0.05, coefficients, 0.3, Some(11))?;
    let ages: Vec<f64> = covariate_cohort
        .iter()
        .filter_map(|s| match s.covariates {
            Some(Covariates::Clinical(c)) => Some(c.age),
            _ => None,
        })
        .collect();
    println!(
        "Age quartiles: {:.1} / {:.1} / {:.1}",
        percentile(&ages, 25.0).unwrap_or(f64::NAN),
        percentile(&ages, 50.0).unwrap_or(f64::NAN),
        percentile(&ages, 75.0).unwrap_or(f64::NAN)
    );

    let (treated, control): (Vec<_>, Vec<_>) = covariate_cohort.into_iter().partition(|s| {
        matches!(s.covariates, Some(Covariates::Clinical(c)) if c.treatment == 1)
    });
    let treatment_test = log_rank_test(&treated, &control)?;
    println!(
        "Treated {} vs control {}: p = {:.4}\n",
        treated.len(),
        control.len(),
        treatment_test.p_value
    );

    // Example 6: landmark analysis
    println!("Example 6: Landmark Analysis at t = 10");
    println!("--------------------------------------");

    let landmark = landmark_analysis(&cohort, 10.0)?;
    println!(
        "Included {} of {} subjects, S(10 + 10 | alive at 10) = {:.4}\n",
        landmark.included_subjects,
        cohort.len(),
        landmark.km_result.survival_at(10.0)
    );

    // Example 7: non-proportional hazards diagnostic
    println!("Example 7: log(-log S) Curves");
    println!("-----------------------------");

    let pair = generate_non_proportional_hazards_data(100, Some(500))?;
    let km1 = kaplan_meier(&pair.group1)?;
    let km2 = kaplan_meier(&pair.group2)?;
    let grid = time_grid(2.0, 20.0, 6.0)?;
    for &t in grid.iter() {
        let s1 = km1.survival_at(t).max(0.001);
        let s2 = km2.survival_at(t).max(0.001);
        println!(
            "  t = {:>5.1}: exponential arm {:>7.3}, weibull arm {:>7.3}",
            t,
            (-s1.ln()).ln(),
            (-s2.ln()).ln()
        );
    }
    println!();

    // Example 8: recurrent events
    println!("Example 8: Recurrent Events");
    println!("---------------------------");

    let recurrent = generate_recurrent_event_data(50, 2.0, 12.0, Some(5))?;
    let counts: Vec<f64> = recurrent.iter().map(|s| s.n_events() as f64).collect();
    let total: f64 = counts.iter().sum();
    println!(
        "Subjects: {}, total events: {}, mean per subject: {:.2}",
        recurrent.len(),
        total,
        total / recurrent.len() as f64
    );

    Ok(())
}
