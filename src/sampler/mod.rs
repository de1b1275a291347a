//! MCMC sampling behind a trait seam.
//!
//! The grid-based estimator in [`crate::rate`] is exact up to
//! discretization; an independent sampler over the same model is the
//! standard cross-check. This module keeps the sampling capability opaque:
//! callers describe the model declaratively with [`ModelSpec`], ask any
//! [`Sampler`] for draws, and get back a [`SampleSet`] of named variables
//! for computing empirical means and CDFs. How the draws are produced is
//! the sampler's business.
//!
//! A seeded random-walk [`MetropolisHastings`] reference implementation is
//! provided; identical seeds give identical draws.
//!
//! # Example
//!
//! ```
//! use creer::sampler::{MetropolisHastings, ModelSpec, Sampler, RATE_VAR};
//!
//! let model = ModelSpec::new(1.3, 1.0, 90.0).unwrap();
//! let sampler = MetropolisHastings::new(42).with_burn_in(200);
//! let samples = sampler.sample(&model, &[11.0, 12.0], 500).unwrap();
//! assert!(samples.mean(RATE_VAR).unwrap() > 0.0);
//! ```

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::dist::Gamma;
use crate::{CreerError, Result};

/// Name of the rate variable in sample sets produced for [`ModelSpec`].
pub const RATE_VAR: &str = "lam";

/// Declarative model: Gamma prior over a rate, exponential interarrival
/// likelihood, observations measured against a fixed period length.
///
/// This is deliberately not a general-purpose probabilistic program; it
/// describes exactly the rate-estimation model the grid updater solves, so
/// the two can be compared on equal terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    prior_shape: f64,
    prior_rate: f64,
    period: f64,
}

impl ModelSpec {
    /// Creates a model with prior Gamma(shape, rate) and the given period.
    ///
    /// # Errors
    ///
    /// Returns error if any parameter is non-positive or non-finite.
    pub fn new(prior_shape: f64, prior_rate: f64, period: f64) -> Result<Self> {
        // Reuse the Gamma validation for the prior parameters
        Gamma::new(prior_shape, prior_rate)?;
        if !(period > 0.0) || !period.is_finite() {
            return Err(CreerError::InvalidHyperparameter {
                param: "period".to_string(),
                value: period.to_string(),
                constraint: "> 0 and finite".to_string(),
            });
        }
        Ok(Self {
            prior_shape,
            prior_rate,
            period,
        })
    }

    /// Convenience constructor: unit-rate Gamma prior with the given mean.
    ///
    /// # Errors
    ///
    /// Returns error if mean or period is non-positive.
    pub fn with_prior_mean(mean: f64, period: f64) -> Result<Self> {
        Self::new(mean, 1.0, period)
    }

    /// Prior mean shape / rate.
    #[must_use]
    pub fn prior_mean(&self) -> f64 {
        self.prior_shape / self.prior_rate
    }

    /// The period length observations are measured against.
    #[must_use]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Unnormalized log posterior density at rate `lam`, given interarrival
    /// observations in period units already.
    fn log_posterior(&self, lam: f64, times_in_periods: &[f64]) -> f64 {
        if lam <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let mut lp = (self.prior_shape - 1.0) * lam.ln() - self.prior_rate * lam;
        for &t in times_in_periods {
            lp += lam.ln() - lam * t;
        }
        lp
    }
}

/// Named collections of posterior draws.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    draws: BTreeMap<String, Vec<f64>>,
}

impl SampleSet {
    /// Creates an empty sample set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores draws under a variable name, replacing any previous draws.
    pub fn insert(&mut self, name: &str, draws: Vec<f64>) {
        self.draws.insert(name.to_string(), draws);
    }

    /// Draws for a variable, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.draws.get(name).map(Vec::as_slice)
    }

    /// Variable names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.draws.keys().map(String::as_str)
    }

    /// Sample mean of a variable's draws, if present and non-empty.
    #[must_use]
    pub fn mean(&self, name: &str) -> Option<f64> {
        let draws = self.draws.get(name)?;
        if draws.is_empty() {
            return None;
        }
        Some(draws.iter().sum::<f64>() / draws.len() as f64)
    }

    /// Empirical CDF of a variable's draws as sorted `(value, cumulative)`
    /// pairs, if present and non-empty.
    ///
    /// Comparable point-for-point with a grid posterior's
    /// [`crate::pmf::Cdf`].
    #[must_use]
    pub fn empirical_cdf(&self, name: &str) -> Option<Vec<(f64, f64)>> {
        let draws = self.draws.get(name)?;
        if draws.is_empty() {
            return None;
        }
        let mut sorted = draws.clone();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len() as f64;
        Some(
            sorted
                .into_iter()
                .enumerate()
                .map(|(i, v)| (v, (i + 1) as f64 / n))
                .collect(),
        )
    }
}

/// An opaque sampling capability over a [`ModelSpec`].
pub trait Sampler {
    /// Draws `n_samples` approximate posterior samples for each model
    /// variable, given interarrival observations in the model's time units.
    ///
    /// # Errors
    ///
    /// Returns error if `n_samples` is zero or the sampler's configuration
    /// is unusable.
    fn sample(&self, model: &ModelSpec, observed: &[f64], n_samples: usize) -> Result<SampleSet>;
}

/// Seeded random-walk Metropolis-Hastings over log-rate.
///
/// Proposes log-λ perturbations from a normal step (so proposals stay
/// positive without boundary rejection), accepts by the usual ratio, and
/// records every `thin`-th draw after `burn_in` iterations. Identical
/// seeds produce identical chains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetropolisHastings {
    seed: u64,
    burn_in: usize,
    thin: usize,
    proposal_scale: f64,
}

impl MetropolisHastings {
    /// Creates a sampler with the given seed and default tuning
    /// (burn-in 500, no thinning, proposal scale 0.5).
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            burn_in: 500,
            thin: 1,
            proposal_scale: 0.5,
        }
    }

    /// Sets the number of discarded warm-up iterations.
    #[must_use]
    pub fn with_burn_in(mut self, burn_in: usize) -> Self {
        self.burn_in = burn_in;
        self
    }

    /// Keeps only every `thin`-th post-warm-up draw (minimum 1).
    #[must_use]
    pub fn with_thin(mut self, thin: usize) -> Self {
        self.thin = thin.max(1);
        self
    }

    /// Sets the standard deviation of the log-rate proposal step.
    #[must_use]
    pub fn with_proposal_scale(mut self, scale: f64) -> Self {
        self.proposal_scale = scale;
        self
    }

    /// The seed this sampler was built with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Standard normal draw via Box-Muller.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

impl Sampler for MetropolisHastings {
    fn sample(&self, model: &ModelSpec, observed: &[f64], n_samples: usize) -> Result<SampleSet> {
        if n_samples == 0 {
            return Err(CreerError::InvalidHyperparameter {
                param: "n_samples".to_string(),
                value: "0".to_string(),
                constraint: "> 0".to_string(),
            });
        }
        if !(self.proposal_scale > 0.0) || !self.proposal_scale.is_finite() {
            return Err(CreerError::InvalidHyperparameter {
                param: "proposal_scale".to_string(),
                value: self.proposal_scale.to_string(),
                constraint: "> 0 and finite".to_string(),
            });
        }
        for &obs in observed {
            if !(obs >= 0.0) || !obs.is_finite() {
                return Err(CreerError::InvalidHyperparameter {
                    param: "observed".to_string(),
                    value: obs.to_string(),
                    constraint: ">= 0 and finite".to_string(),
                });
            }
        }

        let times: Vec<f64> = observed.iter().map(|&m| m / model.period()).collect();

        // Walk in y = ln(λ); the +y term is the change-of-variables
        // jacobian so the chain targets the posterior of λ itself.
        let log_target = |y: f64| model.log_posterior(y.exp(), &times) + y;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut y = model.prior_mean().ln();
        let mut current = log_target(y);

        let mut draws = Vec::with_capacity(n_samples);
        let total = self.burn_in + n_samples * self.thin;
        for i in 0..total {
            let proposal = y + self.proposal_scale * standard_normal(&mut rng);
            let candidate = log_target(proposal);
            let log_accept = candidate - current;
            if log_accept >= 0.0 || rng.gen::<f64>().ln() < log_accept {
                y = proposal;
                current = candidate;
            }
            if i >= self.burn_in && (i - self.burn_in) % self.thin == 0 {
                draws.push(y.exp());
            }
        }

        let mut samples = SampleSet::new();
        samples.insert(RATE_VAR, draws);
        Ok(samples)
    }
}
