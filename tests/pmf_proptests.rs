//! Property-based tests for the Pmf/mixture invariants.
//!
//! Verifies the normalization and mass-conservation guarantees across
//! random inputs rather than hand-picked cases.

use creer::prelude::*;
use proptest::collection::vec;
use proptest::prelude::*;

/// Raw masses that are safely positive and finite.
fn masses(len: usize) -> impl Strategy<Value = Vec<f64>> {
    vec(1e-6..1e6f64, len)
}

proptest! {
    /// Every constructed Pmf is normalized within 1e-9.
    #[test]
    fn pmf_always_normalized(raw in (1usize..50).prop_flat_map(masses)) {
        let values: Vec<f64> = (0..raw.len()).map(|i| i as f64).collect();
        let pmf = Pmf::from_points(values, raw).expect("positive masses");
        prop_assert!((pmf.total_mass() - 1.0).abs() < 1e-9);
    }

    /// A constant likelihood is a no-op update.
    #[test]
    fn constant_likelihood_changes_nothing(
        raw in (1usize..30).prop_flat_map(masses),
        scale in 1e-3..1e3f64,
    ) {
        let values: Vec<f64> = (0..raw.len()).map(|i| i as f64).collect();
        let mut pmf = Pmf::from_points(values, raw).expect("positive masses");
        let before = pmf.clone();
        pmf.update(|_| scale).expect("constant likelihood");
        for ((_, p), (_, q)) in pmf.iter().zip(before.iter()) {
            prop_assert!((p - q).abs() < 1e-9);
        }
    }

    /// The Pmf mean always lies within the grid's range.
    #[test]
    fn mean_within_support(raw in (1usize..30).prop_flat_map(masses)) {
        let values: Vec<f64> = (0..raw.len()).map(|i| i as f64).collect();
        let lo = values[0];
        let hi = *values.last().expect("non-empty");
        let pmf = Pmf::from_points(values, raw).expect("positive masses");
        prop_assert!(pmf.mean() >= lo - 1e-12);
        prop_assert!(pmf.mean() <= hi + 1e-12);
    }

    /// Composed mixture mass equals the sum of outer weights when every
    /// component is normalized.
    #[test]
    fn mixture_mass_is_weight_total(
        weights in vec(1e-3..10.0f64, 1..10),
        n_outcomes in 2usize..8,
    ) {
        let mut meta = MetaPmf::new();
        for (i, &w) in weights.iter().enumerate() {
            // Shifted supports so components overlap partially
            let values: Vec<f64> = (0..n_outcomes).map(|k| (i + k) as f64).collect();
            let masses: Vec<f64> = (0..n_outcomes).map(|k| (k + 1) as f64).collect();
            let component = Pmf::from_points(values, masses).expect("valid component");
            meta.push(component, w);
        }
        let mix = compose_mixture(&meta);
        let expected: f64 = weights.iter().sum();
        prop_assert!((mix.total_mass() - expected).abs() < 1e-9 * expected.max(1.0));
    }

    /// The cumulative distribution is monotone and reaches 1.
    #[test]
    fn cdf_monotone_reaches_one(raw in (1usize..30).prop_flat_map(masses)) {
        let values: Vec<f64> = (0..raw.len()).map(|i| i as f64).collect();
        let pmf = Pmf::from_points(values, raw).expect("positive masses");
        let cdf = Cdf::from_pmf(&pmf);
        let cum = cdf.cumulative();
        for w in cum.windows(2) {
            prop_assert!(w[0] <= w[1] + 1e-15);
        }
        prop_assert!((cum.last().expect("non-empty") - 1.0).abs() < 1e-9);
    }

    /// linspace grids are ascending with exact endpoints.
    #[test]
    fn linspace_is_ascending(lo in 0.0..10.0f64, span in 0.1..100.0f64, n in 2usize..200) {
        let hi = lo + span;
        let grid = linspace(lo, hi, n);
        prop_assert_eq!(grid.len(), n);
        prop_assert_eq!(grid[0], lo);
        prop_assert!((grid[n - 1] - hi).abs() < 1e-9);
        for w in grid.windows(2) {
            prop_assert!(w[0] < w[1]);
        }
    }

    /// Updates with any positive likelihood keep the estimator normalized.
    #[test]
    fn estimator_updates_stay_normalized(minutes in vec(0.1..90.0f64, 0..5)) {
        let grid = linspace(0.0, 12.0, 101);
        let mut estimator = RateEstimator::new(&grid, 1.3, 90.0).expect("valid prior");
        for m in minutes {
            estimator.update(m).expect("positive-likelihood observation");
            prop_assert!((estimator.posterior().total_mass() - 1.0).abs() < 1e-9);
        }
    }
}
