//! Deterministic gamma/tau evaluation by 2-D quadrature of the joint density
//! of the source value X and the received value Y = X + noise.
//!
//! Regions (threshold and source mean both at `mu_x`, band half-width `beta`):
//! - gamma = P(X < mu_x, Y > mu_x + beta) + P(X >= mu_x, Y < mu_x - beta)
//! - tau   = P(mu_x - beta <= Y <= mu_x + beta)
//!
//! Integration runs in standardized coordinates `u = (X - mu_x) / sigma_x`,
//! `v = (Y - X) / sigma_noise`, where the density is `phi(u) * phi(v)` and
//! a band edge `mu_x + e` becomes the line `v = (e - sigma_x * u) / sigma_noise`.
//! Every peak then has unit width, whatever the scale or offset of the channel.
//!
//! The two events are disjoint for this scheme, so `gamma + tau <= 1` holds
//! here, but callers should not rely on it as a general identity between the
//! two quantities.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::error::{EvalError, IntegrationFailure};
use super::params::{ChannelParameters, IntegrationResult};
use super::quadrature::{integrate_2d_split, Bound, Tolerance};

/// Reject results whose error bound exceeds this fraction of the value.
pub const DEFAULT_MAX_RELATIVE_ERROR: f64 = 1e-4;

/// |u|, |v| beyond this contribute nothing: phi underflows to 0.
const STANDARD_CUTOFF: f64 = 40.0;

/// Outer split offsets around a band-edge crossing, in units of sigma_noise / sigma_x.
const EDGE_OFFSETS: [f64; 6] = [0.0, 1.0, 3.0, 8.0, 20.0, 40.0];

fn std_normal_pdf(z: f64) -> f64 {
    (-0.5 * z * z).exp() / (2.0 * PI).sqrt()
}

fn standard_density(u: f64, v: f64) -> f64 {
    std_normal_pdf(u) * std_normal_pdf(v)
}

/// Band edge `mu_x + offset` as a v-limit at source coordinate `u`, clipped to the cutoff.
fn edge_limit(p: &ChannelParameters, offset: f64, u: f64) -> Bound {
    let v = (offset - p.sigma_x * u) / p.sigma_noise;
    Bound::Finite(v.clamp(-STANDARD_CUTOFF, STANDARD_CUTOFF))
}

/// The source mean plus a ladder of points on both sides of every edge crossing.
///
/// The inner integral switches on across a strip of width sigma_noise / sigma_x
/// around each crossing `u = offset / sigma_x`; the ladder keeps nodes inside it.
fn outer_points(p: &ChannelParameters, offsets: &[f64]) -> Vec<f64> {
    let width = p.sigma_noise / p.sigma_x;
    let mut points = vec![0.0];
    for &offset in offsets {
        let crossing = offset / p.sigma_x;
        for k in EDGE_OFFSETS {
            points.push(crossing - k * width);
            points.push(crossing + k * width);
        }
    }
    points
}

/// Error probability of the bare threshold detector (no guard band):
/// `arctan(σn/σx) / π`. Equals gamma at `beta = 0`.
pub fn threshold_only_error(sigma_x: f64, sigma_noise: f64) -> f64 {
    (sigma_noise / sigma_x).atan() / PI
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyticEvaluator {
    pub tolerance: Tolerance,
    pub max_relative_error: f64,
}

impl Default for AnalyticEvaluator {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            max_relative_error: DEFAULT_MAX_RELATIVE_ERROR,
        }
    }
}

impl AnalyticEvaluator {
    pub fn new(tolerance: Tolerance, max_relative_error: f64) -> Self {
        Self { tolerance, max_relative_error }
    }

    /// Probability of a misdecision that survives the guard band.
    ///
    /// Summed from the two half-planes of X; each half passes the acceptance
    /// check on its own and the error bounds add.
    pub fn gamma(&self, params: &ChannelParameters) -> Result<IntegrationResult, EvalError> {
        params.validate()?;
        let p = *params;
        let cut = Bound::Finite(STANDARD_CUTOFF);
        let neg_cut = Bound::Finite(-STANDARD_CUTOFF);
        let centre = Bound::Finite(0.0);

        // True bit 0, received beyond the upper band edge.
        let left = integrate_2d_split(
            standard_density,
            (neg_cut, centre),
            &outer_points(&p, &[p.beta]),
            |u| (edge_limit(&p, p.beta, u), cut),
            &[0.0],
            &self.tolerance,
        )?;
        // True bit 1, received below the lower band edge.
        let right = integrate_2d_split(
            standard_density,
            (centre, cut),
            &outer_points(&p, &[-p.beta]),
            |u| (neg_cut, edge_limit(&p, -p.beta, u)),
            &[0.0],
            &self.tolerance,
        )?;

        Ok(self.accept(left)? + self.accept(right)?)
    }

    /// Probability mass that lands inside the guard band, over all X.
    pub fn tau(&self, params: &ChannelParameters) -> Result<IntegrationResult, EvalError> {
        params.validate()?;
        let p = *params;
        let result = integrate_2d_split(
            standard_density,
            (Bound::Finite(-STANDARD_CUTOFF), Bound::Finite(STANDARD_CUTOFF)),
            &outer_points(&p, &[-p.beta, p.beta]),
            |u| (edge_limit(&p, -p.beta, u), edge_limit(&p, p.beta, u)),
            &[0.0],
            &self.tolerance,
        )?;
        self.accept(result)
    }

    /// `(gamma, tau)` for one parameter set.
    pub fn evaluate(
        &self,
        params: &ChannelParameters,
    ) -> Result<(IntegrationResult, IntegrationResult), EvalError> {
        Ok((self.gamma(params)?, self.tau(params)?))
    }

    fn accept(&self, result: IntegrationResult) -> Result<IntegrationResult, EvalError> {
        let allowed = self
            .tolerance
            .epsabs
            .max(self.max_relative_error * result.value.abs());
        if result.error_estimate > allowed || !result.value.is_finite() {
            return Err(EvalError::integration(
                result.value,
                result.error_estimate,
                IntegrationFailure::ErrorAboveThreshold,
            ));
        }
        Ok(result)
    }
}

/// Gamma with the default tolerances.
pub fn evaluate_gamma(
    sigma_x: f64,
    sigma_noise: f64,
    mu_x: f64,
    beta: f64,
) -> Result<IntegrationResult, EvalError> {
    let params = ChannelParameters::new(mu_x, sigma_x, sigma_noise, beta)?;
    AnalyticEvaluator::default().gamma(&params)
}

/// Tau with the default tolerances.
pub fn evaluate_tau(
    sigma_x: f64,
    sigma_noise: f64,
    mu_x: f64,
    beta: f64,
) -> Result<IntegrationResult, EvalError> {
    let params = ChannelParameters::new(mu_x, sigma_x, sigma_noise, beta)?;
    AnalyticEvaluator::default().tau(&params)
}
