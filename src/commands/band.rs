use anyhow::{Context, Result};
use colored::Colorize;

use crate::commands::pct;
use crate::core::analytic::{threshold_only_error, AnalyticEvaluator};
use crate::core::qkd;
use crate::core::sweep::solve_beta_for_ber;

pub fn main_with_opts(
    evaluator: &AnalyticEvaluator,
    noise: f64,
    ber: f64,
    sigma_x: f64,
    beta_max: f64,
) -> Result<()> {
    crate::debug_log!("band: noise = {}, target BER = {}", noise, ber);
    let sol = solve_beta_for_ber(evaluator, sigma_x, noise, 0.0, ber, beta_max)
        .with_context(|| format!("no guard band meets BER {ber} at noise {noise}"))?;

    println!(
        "{} sigma_x = {:.3}, sigma_noise = {:.3}, target BER = {}",
        "band:".bright_blue().bold(),
        sigma_x,
        noise,
        pct(ber)
    );
    println!("  beta              = {:.6}", sol.beta);
    println!("  Gamma (QBER)      = {}", pct(sol.gamma.value).bright_white());
    println!("  Tau (1 - t'put)   = {}", pct(sol.tau.value));
    println!("  Throughput        = {}", pct(qkd::throughput(sol.tau.value)));
    println!(
        "  no-band baseline  = {}",
        pct(threshold_only_error(sigma_x, noise)).dimmed()
    );
    Ok(())
}
