//! Sweep driver: evaluates the analytic engine over beta and sigma_noise grids.

use serde::{Deserialize, Serialize};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::analytic::AnalyticEvaluator;
use super::error::EvalError;
use super::params::{ChannelParameters, IntegrationResult};
use super::qkd;

/// Evenly spaced points, endpoints included (`count == 1` gives `[min]`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Grid {
    pub fn new(min: f64, max: f64, count: usize) -> Self {
        Self { min, max, count }
    }

    pub fn points(&self) -> Vec<f64> {
        linspace(self.min, self.max, self.count)
    }
}

pub fn linspace(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (count - 1) as f64;
            (0..count)
                .map(|i| if i + 1 == count { max } else { min + step * i as f64 })
                .collect()
        }
    }
}

/// Analytic gamma and tau at one grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub beta: f64,
    pub sigma_noise: f64,
    pub gamma: IntegrationResult,
    pub tau: IntegrationResult,
}

impl SweepPoint {
    pub fn throughput(&self) -> f64 {
        qkd::throughput(self.tau.value)
    }

    pub fn conditional_qber(&self) -> f64 {
        qkd::conditional_qber(self.gamma.value, self.tau.value)
    }
}

fn evaluate_point(
    evaluator: &AnalyticEvaluator,
    params: ChannelParameters,
) -> Result<SweepPoint, EvalError> {
    let (gamma, tau) = evaluator.evaluate(&params)?;
    Ok(SweepPoint {
        beta: params.beta,
        sigma_noise: params.sigma_noise,
        gamma,
        tau,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetaSweep {
    pub sigma_x: f64,
    pub sigma_noise: f64,
    pub mu_x: f64,
    pub points: Vec<SweepPoint>,
}

impl BetaSweep {
    pub fn to_csv(&self) -> String {
        let mut out = String::from("beta,gamma,gamma_err,tau,tau_err,throughput,conditional_qber\n");
        for p in &self.points {
            out.push_str(&format!(
                "{},{:e},{:e},{:e},{:e},{:e},{:e}\n",
                p.beta,
                p.gamma.value,
                p.gamma.error_estimate,
                p.tau.value,
                p.tau.error_estimate,
                p.throughput(),
                p.conditional_qber()
            ));
        }
        out
    }
}

/// `gamma[i][j]` / `tau[i][j]` with `i` over `betas` and `j` over `sigma_noises`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSweep {
    pub sigma_x: f64,
    pub mu_x: f64,
    pub betas: Vec<f64>,
    pub sigma_noises: Vec<f64>,
    pub gamma: Vec<Vec<f64>>,
    pub tau: Vec<Vec<f64>>,
}

impl GridSweep {
    /// Long-format rows, one per (beta, sigma_noise) pair.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("beta,sigma_noise,gamma,tau\n");
        for (i, beta) in self.betas.iter().enumerate() {
            for (j, noise) in self.sigma_noises.iter().enumerate() {
                out.push_str(&format!(
                    "{},{},{:e},{:e}\n",
                    beta, noise, self.gamma[i][j], self.tau[i][j]
                ));
            }
        }
        out
    }
}

/// One-variable analysis: gamma and tau against beta at fixed noise.
pub fn sweep_beta(
    evaluator: &AnalyticEvaluator,
    sigma_x: f64,
    sigma_noise: f64,
    mu_x: f64,
    betas: &[f64],
) -> Result<BetaSweep, EvalError> {
    let params = betas
        .iter()
        .map(|&b| ChannelParameters::new(mu_x, sigma_x, sigma_noise, b))
        .collect::<Result<Vec<_>, _>>()?;

    #[cfg(feature = "parallel")]
    let iter = params.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = params.iter();
    let points = iter
        .map(|p| evaluate_point(evaluator, *p))
        .collect::<Result<Vec<_>, _>>()?;

    crate::debug_log!("beta sweep: {} points at sigma_noise={}", points.len(), sigma_noise);
    Ok(BetaSweep {
        sigma_x,
        sigma_noise,
        mu_x,
        points,
    })
}

/// Two-variable analysis over the beta x sigma_noise grid.
pub fn sweep_grid(
    evaluator: &AnalyticEvaluator,
    sigma_x: f64,
    mu_x: f64,
    betas: &[f64],
    sigma_noises: &[f64],
) -> Result<GridSweep, EvalError> {
    let total = betas.len() * sigma_noises.len();
    let mut gamma = Vec::with_capacity(betas.len());
    let mut tau = Vec::with_capacity(betas.len());

    for (i, &beta) in betas.iter().enumerate() {
        crate::debug_log!("{} / {} combinations processed", i * sigma_noises.len(), total);
        let row = sweep_beta_row(evaluator, sigma_x, mu_x, beta, sigma_noises)?;
        gamma.push(row.iter().map(|p| p.gamma.value).collect());
        tau.push(row.iter().map(|p| p.tau.value).collect());
    }
    crate::debug_log!("{} / {} combinations processed", total, total);

    Ok(GridSweep {
        sigma_x,
        mu_x,
        betas: betas.to_vec(),
        sigma_noises: sigma_noises.to_vec(),
        gamma,
        tau,
    })
}

fn sweep_beta_row(
    evaluator: &AnalyticEvaluator,
    sigma_x: f64,
    mu_x: f64,
    beta: f64,
    sigma_noises: &[f64],
) -> Result<Vec<SweepPoint>, EvalError> {
    let params = sigma_noises
        .iter()
        .map(|&n| ChannelParameters::new(mu_x, sigma_x, n, beta))
        .collect::<Result<Vec<_>, _>>()?;

    #[cfg(feature = "parallel")]
    let iter = params.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = params.iter();
    iter.map(|p| evaluate_point(evaluator, *p)).collect()
}

/// Outcome of solving for the guard band that meets a target bit error rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandSolution {
    pub beta: f64,
    pub gamma: IntegrationResult,
    pub tau: IntegrationResult,
}

const BER_SOLVE_ITERATIONS: usize = 60;

/// Smallest beta in `[0, beta_max]` with `gamma(beta) <= target`, by bisection.
///
/// Relies on gamma being non-increasing in beta.
pub fn solve_beta_for_ber(
    evaluator: &AnalyticEvaluator,
    sigma_x: f64,
    sigma_noise: f64,
    mu_x: f64,
    target: f64,
    beta_max: f64,
) -> Result<BandSolution, EvalError> {
    if !(target > 0.0 && target < 1.0) {
        return Err(EvalError::invalid("target_ber", target, "must lie in (0, 1)"));
    }
    let base = ChannelParameters::new(mu_x, sigma_x, sigma_noise, 0.0)?;
    let solution = |beta: f64| -> Result<BandSolution, EvalError> {
        let p = base.with_beta(beta)?;
        let (gamma, tau) = evaluator.evaluate(&p)?;
        Ok(BandSolution { beta, gamma, tau })
    };

    let at_zero = solution(0.0)?;
    if at_zero.gamma.value <= target {
        return Ok(at_zero);
    }
    let mut hi = solution(beta_max)?;
    if hi.gamma.value > target {
        return Err(EvalError::invalid(
            "target_ber",
            target,
            "not reachable within the beta search range",
        ));
    }

    let (mut lo_beta, mut hi_beta) = (0.0, beta_max);
    for _ in 0..BER_SOLVE_ITERATIONS {
        let mid = 0.5 * (lo_beta + hi_beta);
        if !(lo_beta < mid && mid < hi_beta) {
            break;
        }
        let probe = solution(mid)?;
        if probe.gamma.value <= target {
            hi_beta = mid;
            hi = probe;
        } else {
            lo_beta = mid;
        }
        if hi_beta - lo_beta <= 1e-9 * beta_max.max(1.0) {
            break;
        }
    }
    crate::debug_log!("solved beta={} for target BER {}", hi.beta, target);
    Ok(hi)
}
