//! Error types for Creer operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Creer operations.
///
/// Covers the failure modes of grid-based Bayesian inference: malformed
/// hypothesis grids, distributions collapsing to zero mass after an update,
/// and invalid hyperparameters.
///
/// # Examples
///
/// ```
/// use creer::error::CreerError;
///
/// let err = CreerError::InvalidGrid {
///     message: "grid is empty".to_string(),
/// };
/// assert!(err.to_string().contains("Invalid grid"));
/// ```
#[derive(Debug)]
pub enum CreerError {
    /// Hypothesis grid is empty, contains negative values, or otherwise unusable.
    InvalidGrid {
        /// Description of the violation
        message: String,
    },

    /// All probability mass vanished after a likelihood update.
    ///
    /// This means the observation was incompatible with every hypothesis on
    /// the grid; the update is rejected rather than producing NaNs.
    DegenerateDistribution {
        /// Description of the degenerate state
        message: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for CreerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreerError::InvalidGrid { message } => {
                write!(f, "Invalid grid: {message}")
            }
            CreerError::DegenerateDistribution { message } => {
                write!(f, "Degenerate distribution: {message}")
            }
            CreerError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            CreerError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CreerError {}

impl From<&str> for CreerError {
    fn from(msg: &str) -> Self {
        CreerError::Other(msg.to_string())
    }
}

impl From<String> for CreerError {
    fn from(msg: String) -> Self {
        CreerError::Other(msg)
    }
}

impl CreerError {
    /// Create an invalid-grid error with descriptive context
    #[must_use]
    pub fn invalid_grid(message: &str) -> Self {
        Self::InvalidGrid {
            message: message.to_string(),
        }
    }

    /// Create a degenerate-distribution error with descriptive context
    #[must_use]
    pub fn degenerate(message: &str) -> Self {
        Self::DegenerateDistribution {
            message: message.to_string(),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for CreerError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<CreerError> for &str {
    fn eq(&self, other: &CreerError) -> bool {
        *self == other.to_string()
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, CreerError>;
