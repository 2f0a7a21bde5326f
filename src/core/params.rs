//! Value types shared by both evaluators.

use serde::{Deserialize, Serialize};

use super::error::EvalError;

/// Source and channel description for a single evaluation.
///
/// `mu_x` is both the source mean and the decision threshold; the guard band
/// is `[mu_x - beta, mu_x + beta]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelParameters {
    pub mu_x: f64,
    pub sigma_x: f64,
    pub sigma_noise: f64,
    pub beta: f64,
}

impl ChannelParameters {
    /// Validated constructor.
    ///
    /// Rejects non-finite values, `sigma_x <= 0`, `sigma_noise <= 0` and `beta < 0`.
    pub fn new(mu_x: f64, sigma_x: f64, sigma_noise: f64, beta: f64) -> Result<Self, EvalError> {
        let params = Self { mu_x, sigma_x, sigma_noise, beta };
        params.validate()?;
        Ok(params)
    }

    /// Re-check the invariants (fields are public, so copies may have been edited).
    pub fn validate(&self) -> Result<(), EvalError> {
        if !self.mu_x.is_finite() {
            return Err(EvalError::invalid("mu_x", self.mu_x, "must be finite"));
        }
        if !(self.sigma_x.is_finite() && self.sigma_x > 0.0) {
            return Err(EvalError::invalid("sigma_x", self.sigma_x, "must be finite and > 0"));
        }
        if !(self.sigma_noise.is_finite() && self.sigma_noise > 0.0) {
            return Err(EvalError::invalid(
                "sigma_noise",
                self.sigma_noise,
                "must be finite and > 0",
            ));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(EvalError::invalid("beta", self.beta, "must be finite and >= 0"));
        }
        Ok(())
    }

    pub fn with_beta(self, beta: f64) -> Result<Self, EvalError> {
        Self::new(self.mu_x, self.sigma_x, self.sigma_noise, beta)
    }

    pub fn with_sigma_noise(self, sigma_noise: f64) -> Result<Self, EvalError> {
        Self::new(self.mu_x, self.sigma_x, sigma_noise, self.beta)
    }

    /// Lower edge of the guard band.
    pub fn band_low(&self) -> f64 {
        self.mu_x - self.beta
    }

    /// Upper edge of the guard band.
    pub fn band_high(&self) -> f64 {
        self.mu_x + self.beta
    }
}

/// Output of the analytic evaluator: the integral and the quadrature's own error bound.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IntegrationResult {
    pub value: f64,
    pub error_estimate: f64,
}

impl IntegrationResult {
    pub fn new(value: f64, error_estimate: f64) -> Self {
        Self { value, error_estimate }
    }
}

impl std::ops::Add for IntegrationResult {
    type Output = IntegrationResult;

    fn add(self, rhs: IntegrationResult) -> IntegrationResult {
        IntegrationResult {
            value: self.value + rhs.value,
            error_estimate: self.error_estimate + rhs.error_estimate,
        }
    }
}

/// Output of the Monte-Carlo evaluator: an observed frequency and the trial count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleEstimate {
    pub value: f64,
    pub sample_count: u64,
}

impl SampleEstimate {
    pub fn from_count(hits: u64, sample_count: u64) -> Self {
        let value = if sample_count == 0 {
            0.0
        } else {
            hits as f64 / sample_count as f64
        };
        Self { value, sample_count }
    }

    /// Empirical standard error `sqrt(p(1-p)/n)` of the frequency.
    pub fn standard_error(&self) -> f64 {
        if self.sample_count == 0 {
            return f64::INFINITY;
        }
        (self.value * (1.0 - self.value) / self.sample_count as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_parameters() {
        assert!(ChannelParameters::new(0.0, 0.0, 0.25, 0.1).is_err());
        assert!(ChannelParameters::new(0.0, 1.0, -0.25, 0.1).is_err());
        assert!(ChannelParameters::new(0.0, 1.0, 0.25, -0.1).is_err());
        assert!(ChannelParameters::new(f64::NAN, 1.0, 0.25, 0.1).is_err());
        assert!(ChannelParameters::new(0.0, 1.0, f64::INFINITY, 0.1).is_err());
        assert!(ChannelParameters::new(0.0, 1.0, 0.25, 0.0).is_ok());
    }

    #[test]
    fn band_edges() {
        let p = ChannelParameters::new(0.5, 1.0, 0.25, 0.2).unwrap();
        assert!((p.band_low() - 0.3).abs() < 1e-15);
        assert!((p.band_high() - 0.7).abs() < 1e-15);
    }

    #[test]
    fn results_add_componentwise() {
        let r = IntegrationResult::new(0.1, 1e-9) + IntegrationResult::new(0.2, 2e-9);
        assert!((r.value - 0.3).abs() < 1e-15);
        assert!((r.error_estimate - 3e-9).abs() < 1e-20);
    }

    #[test]
    fn standard_error_of_frequency() {
        let e = SampleEstimate::from_count(250_000, 1_000_000);
        assert_eq!(e.value, 0.25);
        let expected = (0.25f64 * 0.75 / 1e6).sqrt();
        assert!((e.standard_error() - expected).abs() < 1e-15);
    }
}
