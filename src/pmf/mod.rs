//! Discrete probability mass functions over numeric values.
//!
//! [`Pmf`] is the core container for grid-based Bayesian inference: a finite
//! set of non-negative values, each carrying a probability mass, normalized
//! to total 1. Priors are built by sampling a continuous density over a
//! grid; posteriors are obtained by multiplying each mass by a likelihood
//! term and renormalizing. [`Cdf`] is the cumulative form, used for
//! quantiles and credible intervals.
//!
//! # Example
//!
//! ```
//! use creer::pmf::Pmf;
//!
//! let mut pmf = Pmf::from_points(vec![1.0, 2.0], vec![1.0, 3.0]).unwrap();
//! assert!((pmf.prob(2.0) - 0.75).abs() < 1e-12);
//! assert!((pmf.mean() - 1.75).abs() < 1e-12);
//!
//! // Bayesian update: halve the mass of value 2.0, then renormalize
//! pmf.update(|v| if v == 2.0 { 0.5 } else { 1.0 }).unwrap();
//! assert!((pmf.prob(2.0) - 0.6).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::dist::Density;
use crate::{CreerError, Result};

/// A discrete probability mass function.
///
/// Values are unique, non-negative, and stored in ascending order alongside
/// their masses. After construction and after every successful [`update`],
/// the masses sum to 1 within floating-point tolerance.
///
/// Cloning yields a fully independent copy, so branching update sequences
/// (different observation orders, what-if updates) cannot interfere.
///
/// [`update`]: Pmf::update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pmf {
    values: Vec<f64>,
    probs: Vec<f64>,
}

impl Pmf {
    /// Builds a normalized Pmf from values and raw (unnormalized) masses.
    ///
    /// Values are sorted ascending; masses follow their values.
    ///
    /// # Errors
    ///
    /// Returns [`CreerError::InvalidGrid`] if the inputs are empty, of
    /// mismatched lengths, contain negative or non-finite values, contain
    /// duplicate values, or carry negative masses.
    /// Returns [`CreerError::DegenerateDistribution`] if the total mass is
    /// zero.
    pub fn from_points(values: Vec<f64>, masses: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(CreerError::invalid_grid("grid is empty"));
        }
        if values.len() != masses.len() {
            return Err(CreerError::invalid_grid(&format!(
                "{} values but {} masses",
                values.len(),
                masses.len()
            )));
        }
        for (i, &v) in values.iter().enumerate() {
            if !v.is_finite() || v < 0.0 {
                return Err(CreerError::invalid_grid(&format!(
                    "negative or non-finite value {v} at index {i}"
                )));
            }
        }
        for (i, &m) in masses.iter().enumerate() {
            if !m.is_finite() || m < 0.0 {
                return Err(CreerError::invalid_grid(&format!(
                    "negative or non-finite mass {m} at index {i}"
                )));
            }
        }

        let mut pairs: Vec<(f64, f64)> = values.into_iter().zip(masses).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        for w in pairs.windows(2) {
            if w[0].0 == w[1].0 {
                return Err(CreerError::invalid_grid(&format!(
                    "duplicate value {}",
                    w[0].0
                )));
            }
        }

        let (values, probs): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let mut pmf = Self { values, probs };
        pmf.normalize()?;
        Ok(pmf)
    }

    /// Builds a normalized Pmf by sampling a continuous density over a grid.
    ///
    /// This discretizes a continuous prior: each grid point gets mass
    /// proportional to the density there.
    ///
    /// # Errors
    ///
    /// Same grid validation as [`Pmf::from_points`];
    /// [`CreerError::DegenerateDistribution`] if the density is zero at
    /// every grid point.
    ///
    /// # Example
    ///
    /// ```
    /// use creer::dist::Gamma;
    /// use creer::pmf::Pmf;
    ///
    /// let grid: Vec<f64> = (0..=120).map(|i| i as f64 * 0.1).collect();
    /// let prior = Pmf::from_density(&grid, &Gamma::with_mean(1.3).unwrap()).unwrap();
    /// assert!((prior.total_mass() - 1.0).abs() < 1e-9);
    /// assert!((prior.mean() - 1.3).abs() < 0.05);
    /// ```
    pub fn from_density<D: Density>(grid: &[f64], density: &D) -> Result<Self> {
        let masses: Vec<f64> = grid.iter().map(|&v| density.density(v)).collect();
        for (i, &m) in masses.iter().enumerate() {
            if !m.is_finite() {
                return Err(CreerError::invalid_grid(&format!(
                    "density is non-finite at grid point {} (index {i})",
                    grid[i]
                )));
            }
        }
        Self::from_points(grid.to_vec(), masses)
    }

    /// Internal constructor for already-consistent data (mixture output).
    pub(crate) fn from_raw(values: Vec<f64>, probs: Vec<f64>) -> Self {
        Self { values, probs }
    }

    /// Rescales masses to total 1, returning the pre-normalization total.
    ///
    /// # Errors
    ///
    /// Returns [`CreerError::DegenerateDistribution`] if the total mass is
    /// zero or non-finite; the masses are left untouched in that case.
    pub fn normalize(&mut self) -> Result<f64> {
        let total = self.total_mass();
        if !(total > 0.0) || !total.is_finite() {
            return Err(CreerError::degenerate(&format!(
                "cannot normalize: total mass is {total}"
            )));
        }
        for p in &mut self.probs {
            *p /= total;
        }
        Ok(total)
    }

    /// Bayesian update: multiply each value's mass by `likelihood(value)`
    /// and renormalize.
    ///
    /// # Errors
    ///
    /// Returns [`CreerError::DegenerateDistribution`] if every product is
    /// zero (the observation is incompatible with the whole grid) or any
    /// product is non-finite. The distribution is left unchanged on error,
    /// so a rejected observation does not poison later updates.
    pub fn update<F>(&mut self, likelihood: F) -> Result<()>
    where
        F: Fn(f64) -> f64,
    {
        let snapshot = self.probs.clone();
        for (p, &v) in self.probs.iter_mut().zip(self.values.iter()) {
            *p *= likelihood(v);
        }
        if let Err(e) = self.normalize() {
            self.probs = snapshot;
            return Err(e);
        }
        Ok(())
    }

    /// Probability-weighted average of the values.
    #[must_use]
    pub fn mean(&self) -> f64 {
        let total = self.total_mass();
        if total == 0.0 {
            return 0.0;
        }
        self.values
            .iter()
            .zip(self.probs.iter())
            .map(|(v, p)| v * p)
            .sum::<f64>()
            / total
    }

    /// Probability-weighted variance of the values.
    #[must_use]
    pub fn variance(&self) -> f64 {
        let total = self.total_mass();
        if total == 0.0 {
            return 0.0;
        }
        let mean = self.mean();
        self.values
            .iter()
            .zip(self.probs.iter())
            .map(|(v, p)| (v - mean).powi(2) * p)
            .sum::<f64>()
            / total
    }

    /// Sum of all masses (1.0 for a normalized Pmf).
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.probs.iter().sum()
    }

    /// Mass at exactly `value`, or 0.0 if the value is not on the grid.
    #[must_use]
    pub fn prob(&self, value: f64) -> f64 {
        match self.values.binary_search_by(|v| v.total_cmp(&value)) {
            Ok(idx) => self.probs[idx],
            Err(_) => 0.0,
        }
    }

    /// Total mass on values `>= threshold`.
    #[must_use]
    pub fn prob_at_least(&self, threshold: f64) -> f64 {
        self.values
            .iter()
            .zip(self.probs.iter())
            .filter(|(v, _)| **v >= threshold)
            .map(|(_, p)| p)
            .sum()
    }

    /// Number of grid points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the Pmf holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Grid values in ascending order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Masses, aligned with [`Pmf::values`].
    #[must_use]
    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    /// Iterates over `(value, probability)` pairs in ascending value order.
    ///
    /// This is the read-only sequence handed to presentation layers
    /// (plotting, tabulation); it is finite and restartable.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values
            .iter()
            .copied()
            .zip(self.probs.iter().copied())
    }
}

/// Cumulative distribution function derived from a [`Pmf`].
///
/// # Example
///
/// ```
/// use creer::pmf::{Cdf, Pmf};
///
/// let pmf = Pmf::from_points(vec![1.0, 2.0, 3.0], vec![1.0, 1.0, 2.0]).unwrap();
/// let cdf = Cdf::from_pmf(&pmf);
/// assert!((cdf.prob_le(2.0) - 0.5).abs() < 1e-12);
/// assert_eq!(cdf.quantile(0.9).unwrap(), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cdf {
    values: Vec<f64>,
    cumulative: Vec<f64>,
}

impl Cdf {
    /// Builds the cumulative form of a Pmf.
    ///
    /// The input need not be normalized; cumulative probabilities are
    /// rescaled by the total mass.
    #[must_use]
    pub fn from_pmf(pmf: &Pmf) -> Self {
        let total = pmf.total_mass();
        let mut cumulative = Vec::with_capacity(pmf.len());
        let mut acc = 0.0;
        for (_, p) in pmf.iter() {
            acc += p;
            cumulative.push(if total > 0.0 { acc / total } else { 0.0 });
        }
        Self {
            values: pmf.values().to_vec(),
            cumulative,
        }
    }

    /// P(X ≤ x).
    #[must_use]
    pub fn prob_le(&self, x: f64) -> f64 {
        let mut result = 0.0;
        for (v, c) in self.values.iter().zip(self.cumulative.iter()) {
            if *v <= x {
                result = *c;
            } else {
                break;
            }
        }
        result
    }

    /// Smallest grid value whose cumulative probability reaches `p`.
    ///
    /// # Errors
    ///
    /// Returns error if `p` is outside `[0, 1]`.
    pub fn quantile(&self, p: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&p) {
            return Err(CreerError::InvalidHyperparameter {
                param: "p".to_string(),
                value: p.to_string(),
                constraint: "in [0, 1]".to_string(),
            });
        }
        for (v, c) in self.values.iter().zip(self.cumulative.iter()) {
            if *c >= p {
                return Ok(*v);
            }
        }
        // Cumulative may top out just below p from rounding
        Ok(*self.values.last().unwrap_or(&f64::NAN))
    }

    /// Central credible interval at the given confidence level.
    ///
    /// Returns `(lower, upper)` quantiles at (1−confidence)/2 and
    /// 1−(1−confidence)/2.
    ///
    /// # Errors
    ///
    /// Returns error if confidence is not in (0, 1).
    pub fn credible_interval(&self, confidence: f64) -> Result<(f64, f64)> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(CreerError::InvalidHyperparameter {
                param: "confidence".to_string(),
                value: confidence.to_string(),
                constraint: "in (0, 1)".to_string(),
            });
        }
        let tail = (1.0 - confidence) / 2.0;
        Ok((self.quantile(tail)?, self.quantile(1.0 - tail)?))
    }

    /// Grid values in ascending order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Cumulative probabilities, aligned with [`Cdf::values`].
    #[must_use]
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }
}
