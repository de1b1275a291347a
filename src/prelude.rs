//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use creer::prelude::*;
//! ```

pub use crate::dist::{Density, Exponential, Gamma, Poisson};
pub use crate::error::{CreerError, Result};
pub use crate::mixture::{compose_mixture, MetaPmf};
pub use crate::pmf::{Cdf, Pmf};
pub use crate::rate::{linspace, RateEstimator, Truncation};
pub use crate::sampler::{MetropolisHastings, ModelSpec, SampleSet, Sampler, RATE_VAR};
