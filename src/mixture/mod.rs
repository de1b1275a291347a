//! Mixture composition: collapsing a distribution over distributions.
//!
//! A [`MetaPmf`] holds weighted component distributions (each component is
//! itself a [`Pmf`]). Composing it applies the law of total probability:
//! every outcome's mass in the result is the weight-scaled sum of that
//! outcome's mass across all components. This is how a predictive
//! distribution under parameter uncertainty is built: one component per
//! parameter hypothesis, weighted by the posterior.
//!
//! Components live in an arena addressed by integer index, so `Pmf` never
//! needs to support hashing or equality, and there is no hidden aliasing
//! between the meta level and its components.
//!
//! # Example
//!
//! ```
//! use creer::mixture::{compose_mixture, MetaPmf};
//! use creer::pmf::Pmf;
//!
//! let mut meta = MetaPmf::new();
//! meta.push(Pmf::from_points(vec![0.0, 1.0], vec![0.5, 0.5]).unwrap(), 0.5);
//! meta.push(Pmf::from_points(vec![1.0, 2.0], vec![0.5, 0.5]).unwrap(), 0.5);
//!
//! let mix = compose_mixture(&meta);
//! assert!((mix.total_mass() - 1.0).abs() < 1e-12);
//! assert!((mix.prob(1.0) - 0.5).abs() < 1e-12); // 0.25 from each component
//! ```

use std::collections::BTreeMap;

use crate::pmf::Pmf;

/// A distribution over distributions: weighted component Pmfs in an arena.
///
/// Weights are not required to be normalized; when they sum to 1 and every
/// component is normalized, the composed mixture also has total mass 1.
#[derive(Debug, Clone, Default)]
pub struct MetaPmf {
    components: Vec<Pmf>,
    weights: Vec<f64>,
}

impl MetaPmf {
    /// Creates an empty meta-distribution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty meta-distribution with room for `n` components.
    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            components: Vec::with_capacity(n),
            weights: Vec::with_capacity(n),
        }
    }

    /// Adds a weighted component, returning its arena index.
    pub fn push(&mut self, component: Pmf, weight: f64) -> usize {
        self.components.push(component);
        self.weights.push(weight);
        self.components.len() - 1
    }

    /// Component at `idx`, if present.
    #[must_use]
    pub fn component(&self, idx: usize) -> Option<&Pmf> {
        self.components.get(idx)
    }

    /// Weight of the component at `idx`, if present.
    #[must_use]
    pub fn weight(&self, idx: usize) -> Option<f64> {
        self.weights.get(idx).copied()
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True if no components have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Sum of the outer weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Iterates over `(component, weight)` pairs in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (&Pmf, f64)> + '_ {
        self.components.iter().zip(self.weights.iter().copied())
    }
}

/// Collapses a meta-distribution into a single flat distribution.
///
/// For every `(component, weight)` pair and every `(value, prob)` entry
/// inside that component, accumulates `weight * prob` into the output's
/// entry for `value`. Contributions from different components to the same
/// outcome value are summed. The output's total mass is the weight total
/// times the (weighted average) component total, so it is ≈1 when both
/// levels are normalized; no renormalization is performed here.
///
/// Accumulation is keyed on the exact bit pattern of the outcome value, so
/// the result does not depend on component order beyond floating-point
/// rounding of the additions.
///
/// Returns an empty Pmf if the meta-distribution has no components.
#[must_use]
pub fn compose_mixture(meta: &MetaPmf) -> Pmf {
    // Outcome values are validated non-negative at Pmf construction, so
    // their bit patterns order identically to the floats themselves.
    let mut acc: BTreeMap<u64, f64> = BTreeMap::new();
    for (component, weight) in meta.iter() {
        for (value, prob) in component.iter() {
            *acc.entry(value.to_bits()).or_insert(0.0) += weight * prob;
        }
    }

    let mut values = Vec::with_capacity(acc.len());
    let mut probs = Vec::with_capacity(acc.len());
    for (bits, mass) in acc {
        values.push(f64::from_bits(bits));
        probs.push(mass);
    }
    Pmf::from_raw(values, probs)
}
