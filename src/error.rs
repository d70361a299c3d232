//! Error taxonomy for the simulation engine
//!
//! All errors are returned synchronously to the immediate caller. The engine
//! is deterministic, so there is no retry policy at this level. Non-fatal
//! findings (e.g. a debt ratio above the recommended threshold) are attached
//! to `SimulationResult.warnings` rather than raised here.

use thiserror::Error;

/// Errors produced by the simulation engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulatorError {
    /// Malformed or out-of-bounds input. Fails fast, no partial result.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The target payment can never amortize the requested principal at the
    /// given rate (payment <= principal * periodic rate).
    #[error("unaffordable: monthly payment of {payment:.2} FCFA cannot amortize {principal:.2} FCFA at {annual_rate}% (minimum payment {minimum:.2})")]
    Unaffordable {
        payment: f64,
        principal: f64,
        annual_rate: f64,
        minimum: f64,
    },

    /// An iterative solve exceeded its iteration cap without reaching
    /// tolerance. Surfaced instead of returning a misleading approximation.
    #[error("{context} did not converge after {iterations} iterations")]
    Convergence {
        context: &'static str,
        iterations: u32,
    },
}

impl SimulatorError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, SimulatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimulatorError::invalid("principal must be positive");
        assert_eq!(err.to_string(), "invalid input: principal must be positive");

        let err = SimulatorError::Convergence {
            context: "effective rate solve",
            iterations: 100,
        };
        assert!(err.to_string().contains("100 iterations"));
    }
}
