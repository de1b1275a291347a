//! End-to-end contract tests for the goal-scoring scenario.
//!
//! Exercises the full pipeline on one concrete problem: a team with a
//! historical rate of 1.3 goals per 90-minute match scores at minute 11
//! and again 12 minutes later. The grid posterior, the predictive mixture,
//! and the Metropolis-Hastings cross-check must all agree with the math.

use creer::prelude::*;

const PRIOR_MEAN: f64 = 1.3;
const PERIOD: f64 = 90.0;

fn prior_estimator() -> RateEstimator {
    let grid = linspace(0.0, 12.0, 101);
    RateEstimator::new(&grid, PRIOR_MEAN, PERIOD).expect("valid prior")
}

fn posterior_after_two_goals() -> RateEstimator {
    let mut estimator = prior_estimator();
    estimator.update(11.0).expect("first goal");
    estimator.update(12.0).expect("second goal");
    estimator
}

#[test]
fn prior_mean_matches_historical_rate() {
    let estimator = prior_estimator();
    assert!((estimator.posterior_mean() - PRIOR_MEAN).abs() < 0.05);
    assert!((estimator.posterior().total_mass() - 1.0).abs() < 1e-9);
}

#[test]
fn two_early_goals_raise_the_estimate() {
    let estimator = posterior_after_two_goals();
    assert!(estimator.posterior_mean() > PRIOR_MEAN);
}

#[test]
fn sequential_updates_equal_combined_likelihood() {
    // The exponential model is memoryless, so updating with 11 then 12
    // minutes must match a single update with the combined likelihood
    // lam^2 * exp(-lam * 23/90).
    let sequential = posterior_after_two_goals();

    let mut combined = prior_estimator().posterior().clone();
    let t = 23.0 / PERIOD;
    combined
        .update(|lam| lam * lam * (-lam * t).exp())
        .expect("combined update");

    assert_eq!(sequential.posterior().len(), combined.len());
    for ((v1, p1), (v2, p2)) in sequential.posterior().iter().zip(combined.iter()) {
        assert_eq!(v1, v2);
        assert!(
            (p1 - p2).abs() < 1e-9,
            "drift at lam={v1}: {p1} vs {p2}"
        );
    }
}

#[test]
fn predictive_mixture_covers_plausible_scores() {
    let estimator = posterior_after_two_goals();
    let goals = estimator
        .predictive_goals(67.0, Truncation::Fixed(15))
        .expect("predictive distribution");

    assert!((goals.total_mass() - 1.0).abs() < 1e-9);
    for k in 0..=14u32 {
        assert!(
            goals.prob(f64::from(k)) > 0.0,
            "no mass on {k} goals"
        );
    }

    let p_five_plus = goals.prob_at_least(5.0);
    assert!((0.0..=1.0).contains(&p_five_plus));
    // Two goals in 23 minutes make a 5+ goal finish plausible but unlikely
    assert!(p_five_plus > 0.0 && p_five_plus < 0.5);
}

#[test]
fn dynamic_truncation_matches_fixed_when_tail_is_tiny() {
    let estimator = posterior_after_two_goals();
    let fixed = estimator
        .predictive_goals(67.0, Truncation::Fixed(64))
        .expect("fixed predictive");
    let dynamic = estimator
        .predictive_goals(
            67.0,
            Truncation::Dynamic {
                tail_eps: 1e-12,
                initial_max: 8,
            },
        )
        .expect("dynamic predictive");

    // Same head probabilities regardless of truncation policy
    for k in 0..=10u32 {
        let v = f64::from(k);
        assert!(
            (fixed.prob(v) - dynamic.prob(v)).abs() < 1e-6,
            "mismatch at {k} goals"
        );
    }
}

#[test]
fn branching_updates_leave_the_original_unchanged() {
    let original = prior_estimator();
    let before: Vec<(f64, f64)> = original.posterior().iter().collect();

    let mut branch = original.clone();
    branch.update(11.0).expect("branch update");
    branch.update(12.0).expect("branch update");

    let after: Vec<(f64, f64)> = original.posterior().iter().collect();
    assert_eq!(before, after);
}

#[test]
fn degenerate_observation_is_surfaced_not_swallowed() {
    // A single-point grid at lam = 0 assigns zero likelihood to any goal.
    // Gamma(1, 1) has positive density at 0, so construction succeeds.
    let grid = [0.0];
    let mut estimator = RateEstimator::new(&grid, 1.0, PERIOD).expect("single-point grid");
    let err = estimator.update(11.0).unwrap_err();
    assert!(matches!(err, CreerError::DegenerateDistribution { .. }));
    // The rejected observation must not poison the posterior
    assert!((estimator.posterior().total_mass() - 1.0).abs() < 1e-9);
}

#[test]
fn grid_posterior_agrees_with_metropolis_hastings() {
    let estimator = posterior_after_two_goals();
    let grid_mean = estimator.posterior_mean();

    // Same model, independent machinery
    let model = ModelSpec::with_prior_mean(PRIOR_MEAN, PERIOD).expect("valid model");
    let samples = MetropolisHastings::new(1234)
        .with_burn_in(1_000)
        .sample(&model, &[11.0, 12.0], 8_000)
        .expect("sampling succeeds");
    let mh_mean = samples.mean(RATE_VAR).expect("rate draws");

    assert!(
        (grid_mean - mh_mean).abs() < 0.25,
        "grid {grid_mean} vs MH {mh_mean}"
    );

    // Exact conjugate answer: Gamma(1.3 + 2, 1 + 23/90)
    let exact = (PRIOR_MEAN + 2.0) / (1.0 + 23.0 / PERIOD);
    assert!((grid_mean - exact).abs() < 0.05, "grid {grid_mean} vs exact {exact}");
}

#[test]
fn grid_and_sampler_medians_agree() {
    let estimator = posterior_after_two_goals();
    let grid_median = Cdf::from_pmf(estimator.posterior())
        .quantile(0.5)
        .expect("valid quantile");

    let model = ModelSpec::with_prior_mean(PRIOR_MEAN, PERIOD).expect("valid model");
    let samples = MetropolisHastings::new(99)
        .with_burn_in(1_000)
        .sample(&model, &[11.0, 12.0], 8_000)
        .expect("sampling succeeds");
    let cdf = samples.empirical_cdf(RATE_VAR).expect("rate draws");
    let mh_median = cdf
        .iter()
        .find(|(_, c)| *c >= 0.5)
        .map(|(v, _)| *v)
        .expect("median exists");

    assert!(
        (grid_median - mh_median).abs() < 0.3,
        "grid median {grid_median} vs MH median {mh_median}"
    );
}

#[test]
fn posterior_serializes_for_external_consumers() {
    let estimator = posterior_after_two_goals();
    let json = serde_json::to_string(estimator.posterior()).expect("serialize");
    let back: Pmf = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(estimator.posterior(), &back);
}
