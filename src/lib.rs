//! Creer: discrete Bayesian inference in pure Rust.
//!
//! Creer estimates a continuous parameter on a finite hypothesis grid:
//! build a prior by sampling a density over the grid, revise it with
//! likelihood updates as observations arrive, and collapse per-hypothesis
//! outcome distributions into a single predictive mixture. A seeded
//! Metropolis-Hastings sampler provides an independent cross-check of the
//! grid posterior.
//!
//! # Quick Start
//!
//! The goal-scoring problem: a team that historically scores 1.3 goals per
//! 90-minute match scores at minute 11 and again 12 minutes later. What is
//! their scoring rate, and how many more goals should we expect?
//!
//! ```
//! use creer::prelude::*;
//!
//! let grid = linspace(0.0, 12.0, 101);
//! let mut estimator = RateEstimator::new(&grid, 1.3, 90.0).unwrap();
//!
//! estimator.update(11.0).unwrap();
//! estimator.update(12.0).unwrap();
//! assert!(estimator.posterior_mean() > 1.3);
//!
//! let goals = estimator
//!     .predictive_goals(67.0, Truncation::Fixed(15))
//!     .unwrap();
//! let p_two_or_more = goals.prob_at_least(2.0);
//! assert!(p_two_or_more > 0.0 && p_two_or_more < 1.0);
//! ```
//!
//! # Modules
//!
//! - [`pmf`]: discrete probability mass functions and cumulative forms
//! - [`dist`]: Gamma, exponential, and Poisson distributions plus `ln_gamma`
//! - [`mixture`]: meta-distributions and mixture composition
//! - [`rate`]: rate estimation from interarrival times
//! - [`sampler`]: MCMC sampling behind a trait seam
//! - [`error`]: crate-wide error type and `Result` alias

pub mod dist;
pub mod error;
pub mod mixture;
pub mod pmf;
pub mod prelude;
pub mod rate;
pub mod sampler;

pub use error::{CreerError, Result};
pub use pmf::{Cdf, Pmf};
