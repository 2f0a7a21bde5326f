use std::fmt;

/// Why an integration was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationFailure {
    /// Ran out of subintervals before the tolerance was met.
    SubdivisionLimit,
    /// A subinterval became too narrow to bisect further.
    RoundOff,
    /// The integrand produced NaN or an infinity.
    NonFinite,
    /// Converged, but the error bound is above the caller's acceptance threshold.
    ErrorAboveThreshold,
}

impl fmt::Display for IntegrationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationFailure::SubdivisionLimit => write!(f, "subdivision limit reached"),
            IntegrationFailure::RoundOff => write!(f, "round-off prevents further bisection"),
            IntegrationFailure::NonFinite => write!(f, "integrand is not finite"),
            IntegrationFailure::ErrorAboveThreshold => write!(f, "error bound above threshold"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    NumericalIntegration {
        estimate: f64,
        error_estimate: f64,
        reason: IntegrationFailure,
    },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid Parameter: {} = {} ({})", name, value, reason)
            }
            EvalError::NumericalIntegration {
                estimate,
                error_estimate,
                reason,
            } => write!(
                f,
                "Numerical Integration Error: {} (estimate {:e}, error bound {:e})",
                reason, estimate, error_estimate
            ),
        }
    }
}

impl std::error::Error for EvalError {}

impl EvalError {
    pub fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        EvalError::InvalidParameter { name, value, reason }
    }

    pub fn integration(estimate: f64, error_estimate: f64, reason: IntegrationFailure) -> Self {
        EvalError::NumericalIntegration {
            estimate,
            error_estimate,
            reason,
        }
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, EvalError::InvalidParameter { .. })
    }

    pub fn is_numerical_integration(&self) -> bool {
        matches!(self, EvalError::NumericalIntegration { .. })
    }
}
