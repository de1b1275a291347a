//! Continuous densities and discrete mass functions used to build grids.
//!
//! Provides the small set of distributions the inference layer needs:
//! Gamma priors over rates, exponential interarrival likelihoods, and
//! truncated Poisson outcome grids. Each continuous distribution implements
//! the [`Density`] trait so grid construction can stay generic over the
//! prior family.
//!
//! # Example
//!
//! ```
//! use creer::dist::{Density, Gamma};
//!
//! // Gamma prior with mean 1.3 (unit rate)
//! let prior = Gamma::with_mean(1.3).unwrap();
//! assert!(prior.density(1.0) > 0.0);
//! assert_eq!(prior.density(-1.0), 0.0);
//! ```

use crate::{CreerError, Result};

/// Hard cap on dynamic Poisson truncation growth.
const MAX_TRUNCATION: usize = 4096;

/// A continuous probability density evaluated pointwise.
///
/// This is the seam between grid construction and whatever supplies the
/// prior: [`crate::pmf::Pmf::from_density`] only needs `density(x)`.
pub trait Density {
    /// Evaluate the density at `x`. Returns 0.0 outside the support.
    fn density(&self, x: f64) -> f64;
}

/// Natural log of the gamma function (Lanczos approximation, g = 7).
///
/// Accurate to roughly 15 significant digits over the positive reals,
/// which is far tighter than the grid discretization error elsewhere.
#[must_use]
pub fn ln_gamma(x: f64) -> f64 {
    const COEF: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    const G: f64 = 7.0;

    if x < 0.5 {
        // Reflection formula for the left half-plane
        let pi = std::f64::consts::PI;
        pi.ln() - (pi * x).sin().ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut acc = COEF[0];
        for (i, &c) in COEF.iter().enumerate().skip(1) {
            acc += c / (x + i as f64);
        }
        let t = x + G + 0.5;
        0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
    }
}

/// Gamma distribution parameterized by shape and rate.
///
/// **Density**: f(x) = rate^shape · x^(shape−1) · e^(−rate·x) / Γ(shape)
///
/// The unit-rate form `Gamma::with_mean(m)` (shape = m, rate = 1) is the
/// conventional weakly informative prior for a non-negative rate with a
/// known historical average.
///
/// # Example
///
/// ```
/// use creer::dist::{Density, Gamma};
///
/// let g = Gamma::new(2.0, 1.0).unwrap();
/// // Mode of Gamma(2, 1) is at x = 1
/// assert!(g.density(1.0) > g.density(3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gamma {
    shape: f64,
    rate: f64,
}

impl Gamma {
    /// Creates a Gamma distribution with the given shape and rate.
    ///
    /// # Errors
    ///
    /// Returns error if shape ≤ 0 or rate ≤ 0.
    pub fn new(shape: f64, rate: f64) -> Result<Self> {
        if !(shape > 0.0) || !(rate > 0.0) {
            return Err(CreerError::InvalidHyperparameter {
                param: "shape, rate".to_string(),
                value: format!("({shape}, {rate})"),
                constraint: "both > 0".to_string(),
            });
        }
        Ok(Self { shape, rate })
    }

    /// Creates a unit-rate Gamma distribution with the given mean.
    ///
    /// Since mean = shape / rate, this is Gamma(mean, 1).
    ///
    /// # Errors
    ///
    /// Returns error if mean ≤ 0.
    pub fn with_mean(mean: f64) -> Result<Self> {
        Self::new(mean, 1.0)
    }

    /// Returns the shape parameter.
    #[must_use]
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Returns the rate parameter.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the distribution mean shape / rate.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.shape / self.rate
    }
}

impl Density for Gamma {
    fn density(&self, x: f64) -> f64 {
        if x < 0.0 {
            return 0.0;
        }
        if x == 0.0 {
            // Finite only for shape >= 1; the shape == 1 case is the
            // exponential density at the origin.
            return if self.shape > 1.0 {
                0.0
            } else if (self.shape - 1.0).abs() < f64::EPSILON {
                self.rate
            } else {
                f64::INFINITY
            };
        }
        let log_pdf = self.shape * self.rate.ln() + (self.shape - 1.0) * x.ln()
            - self.rate * x
            - ln_gamma(self.shape);
        log_pdf.exp()
    }
}

/// Exponential distribution with the given rate.
///
/// **Density**: f(x) = rate · e^(−rate·x) for x ≥ 0.
///
/// This is the interarrival-time likelihood for a Poisson process: if
/// events occur at rate λ per period, the density of waiting time x
/// (in periods) until the next event is λ·e^(−λx).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    /// Creates an exponential distribution with the given rate.
    ///
    /// A rate of exactly 0 is allowed: it is the degenerate "never happens"
    /// hypothesis, whose density is 0 everywhere. Grid priors routinely
    /// include λ = 0 as their first point.
    ///
    /// # Errors
    ///
    /// Returns error if rate < 0 or non-finite.
    pub fn new(rate: f64) -> Result<Self> {
        if !(rate >= 0.0) || !rate.is_finite() {
            return Err(CreerError::InvalidHyperparameter {
                param: "rate".to_string(),
                value: rate.to_string(),
                constraint: ">= 0 and finite".to_string(),
            });
        }
        Ok(Self { rate })
    }

    /// Returns the rate parameter.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Density for Exponential {
    fn density(&self, x: f64) -> f64 {
        if x < 0.0 {
            return 0.0;
        }
        self.rate * (-self.rate * x).exp()
    }
}

/// Poisson distribution over event counts.
///
/// **Mass**: P(k) = mean^k · e^(−mean) / k!
///
/// Used to turn each rate hypothesis into a discrete outcome distribution
/// over the number of events in a (fraction of a) period.
///
/// # Example
///
/// ```
/// use creer::dist::Poisson;
///
/// let p = Poisson::new(1.4).unwrap();
/// assert!((p.pmf(0) - (-1.4f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poisson {
    mean: f64,
}

impl Poisson {
    /// Creates a Poisson distribution with the given mean.
    ///
    /// A mean of exactly 0 is allowed (all mass on zero events), so that
    /// rate grids containing λ = 0 produce a valid outcome distribution.
    ///
    /// # Errors
    ///
    /// Returns error if mean < 0 or non-finite.
    pub fn new(mean: f64) -> Result<Self> {
        if !(mean >= 0.0) || !mean.is_finite() {
            return Err(CreerError::InvalidHyperparameter {
                param: "mean".to_string(),
                value: mean.to_string(),
                constraint: ">= 0 and finite".to_string(),
            });
        }
        Ok(Self { mean })
    }

    /// Returns the mean parameter.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Probability mass at count `k`.
    #[must_use]
    pub fn pmf(&self, k: u64) -> f64 {
        if self.mean == 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        let k_f = k as f64;
        (k_f * self.mean.ln() - self.mean - ln_gamma(k_f + 1.0)).exp()
    }

    /// Raw (unnormalized) masses for counts 0..=max.
    ///
    /// The sum is at most 1; the shortfall is the truncated tail mass.
    #[must_use]
    pub fn masses_upto(&self, max: usize) -> Vec<f64> {
        (0..=max as u64).map(|k| self.pmf(k)).collect()
    }

    /// Smallest truncation bound, starting from `initial_max`, whose
    /// truncated tail mass is below `tail_eps`.
    ///
    /// Doubles the bound until the tail is negligible, capped at 4096 so a
    /// huge mean cannot loop unboundedly. At the cap the tail may still
    /// exceed `tail_eps`; the caller gets the best bound available.
    #[must_use]
    pub fn truncation_for(&self, tail_eps: f64, initial_max: usize) -> usize {
        let mut max = initial_max.max(1);
        loop {
            let covered: f64 = self.masses_upto(max).iter().sum();
            if 1.0 - covered <= tail_eps || max >= MAX_TRUNCATION {
                return max.min(MAX_TRUNCATION);
            }
            max *= 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln_gamma_integers() {
        // Γ(n) = (n-1)!
        assert!(ln_gamma(1.0).abs() < 1e-12);
        assert!(ln_gamma(2.0).abs() < 1e-12);
        assert!((ln_gamma(5.0) - 24.0f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(10.0) - 362_880.0f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_ln_gamma_half() {
        // Γ(1/2) = sqrt(π)
        let expected = std::f64::consts::PI.sqrt().ln();
        assert!((ln_gamma(0.5) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_gamma_invalid_params() {
        assert!(Gamma::new(0.0, 1.0).is_err());
        assert!(Gamma::new(1.0, -1.0).is_err());
        assert!(Gamma::with_mean(-2.0).is_err());
    }

    #[test]
    fn test_gamma_with_mean() {
        let g = Gamma::with_mean(1.3).expect("valid mean");
        assert!((g.mean() - 1.3).abs() < 1e-12);
        assert!((g.shape() - 1.3).abs() < 1e-12);
        assert!((g.rate() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_gamma_density_shape_one_is_exponential() {
        let g = Gamma::new(1.0, 2.0).expect("valid params");
        let e = Exponential::new(2.0).expect("valid rate");
        for &x in &[0.0, 0.5, 1.0, 3.0] {
            assert!((g.density(x) - e.density(x)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_gamma_density_negative_support() {
        let g = Gamma::new(2.0, 1.0).expect("valid params");
        assert_eq!(g.density(-0.1), 0.0);
        assert_eq!(g.density(0.0), 0.0); // shape > 1
    }

    #[test]
    fn test_gamma_density_integrates_to_one() {
        // Trapezoid over a wide grid should be close to 1
        let g = Gamma::new(1.3, 1.0).expect("valid params");
        let n = 10_000;
        let hi = 40.0;
        let dx = hi / n as f64;
        let mut total = 0.0;
        for i in 0..n {
            let x0 = i as f64 * dx;
            let x1 = x0 + dx;
            total += 0.5 * (g.density(x0.max(1e-12)) + g.density(x1)) * dx;
        }
        assert!((total - 1.0).abs() < 1e-3, "integral was {total}");
    }

    #[test]
    fn test_exponential_density() {
        let e = Exponential::new(1.5).expect("valid rate");
        assert!((e.density(0.0) - 1.5).abs() < 1e-12);
        assert!((e.density(1.0) - 1.5 * (-1.5f64).exp()).abs() < 1e-12);
        assert_eq!(e.density(-1.0), 0.0);
    }

    #[test]
    fn test_exponential_zero_rate() {
        let e = Exponential::new(0.0).expect("zero rate is allowed");
        assert_eq!(e.density(0.5), 0.0);
    }

    #[test]
    fn test_exponential_invalid_rate() {
        assert!(Exponential::new(-1.0).is_err());
        assert!(Exponential::new(f64::NAN).is_err());
        assert!(Exponential::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_poisson_pmf_known_values() {
        let p = Poisson::new(2.0).expect("valid mean");
        let e2 = (-2.0f64).exp();
        assert!((p.pmf(0) - e2).abs() < 1e-12);
        assert!((p.pmf(1) - 2.0 * e2).abs() < 1e-12);
        assert!((p.pmf(2) - 2.0 * e2).abs() < 1e-12);
        assert!((p.pmf(3) - 4.0 / 3.0 * e2).abs() < 1e-12);
    }

    #[test]
    fn test_poisson_zero_mean() {
        let p = Poisson::new(0.0).expect("zero mean is allowed");
        assert_eq!(p.pmf(0), 1.0);
        assert_eq!(p.pmf(1), 0.0);
    }

    #[test]
    fn test_poisson_invalid_mean() {
        assert!(Poisson::new(-0.5).is_err());
        assert!(Poisson::new(f64::NAN).is_err());
    }

    #[test]
    fn test_poisson_masses_sum_below_one() {
        let p = Poisson::new(3.0).expect("valid mean");
        let total: f64 = p.masses_upto(10).iter().sum();
        assert!(total < 1.0);
        assert!(total > 0.99);
    }

    #[test]
    fn test_poisson_truncation_covers_tail() {
        let p = Poisson::new(8.0).expect("valid mean");
        let max = p.truncation_for(1e-9, 4);
        let covered: f64 = p.masses_upto(max).iter().sum();
        assert!(1.0 - covered <= 1e-9, "tail still {}", 1.0 - covered);
    }

    #[test]
    fn test_poisson_truncation_caps_out() {
        let p = Poisson::new(10_000.0).expect("valid mean");
        let max = p.truncation_for(1e-12, 4);
        assert!(max <= 4096);
    }
}
