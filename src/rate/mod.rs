//! Rate estimation from interarrival times.
//!
//! [`RateEstimator`] holds a discrete posterior over an event rate λ
//! (events per period), built from a Gamma prior sampled over a hypothesis
//! grid. Each observed interarrival time updates the posterior through the
//! exponential likelihood λ·e^(−λt), with t expressed as a fraction of the
//! period. The posterior then yields a predictive distribution over event
//! counts in any remaining stretch of the period, as a mixture of Poisson
//! outcome distributions.
//!
//! The canonical use is the goal-scoring problem: a 90-minute match, a
//! historical scoring rate as the prior mean, goals observed at given
//! minutes, and a prediction for the rest of the match.
//!
//! # Example
//!
//! ```
//! use creer::rate::{linspace, RateEstimator, Truncation};
//!
//! // 101 hypotheses for goals-per-match, prior mean 1.3, 90-minute period
//! let grid = linspace(0.0, 12.0, 101);
//! let mut estimator = RateEstimator::new(&grid, 1.3, 90.0).unwrap();
//!
//! // Goals at minute 11 and minute 23 (12 minutes apart)
//! estimator.update(11.0).unwrap();
//! estimator.update(12.0).unwrap();
//!
//! // Two early goals raise the estimated scoring rate
//! assert!(estimator.posterior_mean() > 1.3);
//!
//! // Distribution over goals in the remaining 67 minutes
//! let goals = estimator
//!     .predictive_goals(67.0, Truncation::Fixed(15))
//!     .unwrap();
//! assert!((goals.total_mass() - 1.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::dist::{Density, Exponential, Gamma, Poisson};
use crate::mixture::{compose_mixture, MetaPmf};
use crate::pmf::{Cdf, Pmf};
use crate::{CreerError, Result};

/// Truncation policy for per-hypothesis Poisson outcome grids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Truncation {
    /// Count grid 0..=n regardless of tail mass.
    Fixed(usize),
    /// Grow the bound from `initial_max` (doubling) until the truncated
    /// tail mass falls below `tail_eps`.
    Dynamic {
        /// Maximum acceptable truncated tail mass
        tail_eps: f64,
        /// Starting bound before any doubling
        initial_max: usize,
    },
}

impl Default for Truncation {
    fn default() -> Self {
        Truncation::Dynamic {
            tail_eps: 1e-9,
            initial_max: 16,
        }
    }
}

/// Evenly spaced grid of `n` points from `lo` to `hi` inclusive.
///
/// Returns an empty vector for `n == 0` and `[lo]` for `n == 1`.
#[must_use]
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + i as f64 * step).collect()
        }
    }
}

/// Discrete Bayesian estimator for an event rate.
///
/// Owns its posterior exclusively and mutates it in place on every update;
/// `Clone` produces an independent copy for branching update sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEstimator {
    posterior: Pmf,
    period: f64,
}

impl RateEstimator {
    /// Builds the estimator from a hypothesis grid and a Gamma prior.
    ///
    /// * `grid` - candidate rates (events per period), non-negative
    /// * `prior_mean` - mean of the unit-rate Gamma prior, > 0
    /// * `period` - length of one period in observation time units
    ///   (e.g. 90.0 for minutes in a match), > 0
    ///
    /// # Errors
    ///
    /// Returns [`CreerError::InvalidGrid`] for an empty or negative grid,
    /// [`CreerError::InvalidHyperparameter`] for a non-positive prior mean
    /// or period, and [`CreerError::DegenerateDistribution`] if the prior
    /// density is zero at every grid point.
    pub fn new(grid: &[f64], prior_mean: f64, period: f64) -> Result<Self> {
        if !(period > 0.0) || !period.is_finite() {
            return Err(CreerError::InvalidHyperparameter {
                param: "period".to_string(),
                value: period.to_string(),
                constraint: "> 0 and finite".to_string(),
            });
        }
        let prior = Gamma::with_mean(prior_mean)?;
        let posterior = Pmf::from_density(grid, &prior)?;
        Ok(Self { posterior, period })
    }

    /// Revises the posterior given an observed interarrival time.
    ///
    /// `time` is measured in the same units as the period (e.g. minutes);
    /// internally it is rescaled to a fraction of the period, and each
    /// hypothesis λ is reweighted by the exponential likelihood λ·e^(−λt).
    ///
    /// # Errors
    ///
    /// Returns [`CreerError::InvalidHyperparameter`] for a negative or
    /// non-finite time, and [`CreerError::DegenerateDistribution`] if the
    /// observation zeroes out the entire grid (the posterior is left
    /// unchanged in that case).
    pub fn update(&mut self, time: f64) -> Result<()> {
        if !(time >= 0.0) || !time.is_finite() {
            return Err(CreerError::InvalidHyperparameter {
                param: "time".to_string(),
                value: time.to_string(),
                constraint: ">= 0 and finite".to_string(),
            });
        }
        let t = time / self.period;
        self.posterior
            .update(|lam| Exponential::new(lam).map_or(0.0, |e| e.density(t)))
    }

    /// The current posterior over rates.
    #[must_use]
    pub fn posterior(&self) -> &Pmf {
        &self.posterior
    }

    /// Posterior mean rate (events per period).
    #[must_use]
    pub fn posterior_mean(&self) -> f64 {
        self.posterior.mean()
    }

    /// Central credible interval for the rate.
    ///
    /// # Errors
    ///
    /// Returns error if confidence is not in (0, 1).
    pub fn credible_interval(&self, confidence: f64) -> Result<(f64, f64)> {
        Cdf::from_pmf(&self.posterior).credible_interval(confidence)
    }

    /// The period length the estimator was configured with.
    #[must_use]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Predictive distribution over event counts in the remaining time.
    ///
    /// For each hypothesis λ, builds a truncated Poisson outcome
    /// distribution with mean λ · remaining / period, weights it by the
    /// posterior probability of λ, and composes the mixture. The result is
    /// normalized.
    ///
    /// # Errors
    ///
    /// Returns [`CreerError::InvalidHyperparameter`] for a negative or
    /// non-finite remaining time.
    pub fn predictive_goals(&self, remaining: f64, trunc: Truncation) -> Result<Pmf> {
        if !(remaining >= 0.0) || !remaining.is_finite() {
            return Err(CreerError::InvalidHyperparameter {
                param: "remaining".to_string(),
                value: remaining.to_string(),
                constraint: ">= 0 and finite".to_string(),
            });
        }
        let fraction = remaining / self.period;

        let mut meta = MetaPmf::with_capacity(self.posterior.len());
        for (lam, weight) in self.posterior.iter() {
            let outcome_model = Poisson::new(lam * fraction)?;
            let max = match trunc {
                Truncation::Fixed(n) => n,
                Truncation::Dynamic {
                    tail_eps,
                    initial_max,
                } => outcome_model.truncation_for(tail_eps, initial_max),
            };
            let counts: Vec<f64> = (0..=max).map(|k| k as f64).collect();
            let outcome = Pmf::from_points(counts, outcome_model.masses_upto(max))?;
            meta.push(outcome, weight);
        }

        let mut mixed = compose_mixture(&meta);
        mixed.normalize()?;
        Ok(mixed)
    }
}
