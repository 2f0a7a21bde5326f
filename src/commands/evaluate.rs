use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::cli::ChannelArgs;
use crate::commands::pct;
use crate::core::analytic::{threshold_only_error, AnalyticEvaluator};
use crate::core::qkd;
use crate::core::{ChannelParameters, IntegrationResult};

#[derive(Debug, Serialize)]
struct EvaluateOutput {
    params: ChannelParameters,
    gamma: IntegrationResult,
    tau: IntegrationResult,
    throughput: f64,
    conditional_qber: f64,
    reconciled_fraction: f64,
    threshold_only_error: f64,
}

pub fn main_with_opts(evaluator: &AnalyticEvaluator, channel: ChannelArgs, json: bool) -> Result<()> {
    let params = channel.params().context("invalid channel parameters")?;
    crate::debug_log!("evaluate: {:?}", params);
    let (gamma, tau) = evaluator
        .evaluate(&params)
        .context("analytic evaluation failed")?;

    let out = EvaluateOutput {
        params,
        gamma,
        tau,
        throughput: qkd::throughput(tau.value),
        conditional_qber: qkd::conditional_qber(gamma.value, tau.value),
        reconciled_fraction: qkd::reconciled_fraction(gamma.value, tau.value),
        threshold_only_error: threshold_only_error(params.sigma_x, params.sigma_noise),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} sigma_x = {:.3}, sigma_noise = {:.3}, mu_x = {:.3}, beta = {:.3}",
        "channel:".bright_blue().bold(),
        params.sigma_x,
        params.sigma_noise,
        params.mu_x,
        params.beta
    );
    println!(
        "  Gamma (QBER)      = {} with numerical integration error = {:.2e}%",
        pct(gamma.value).bright_white(),
        gamma.error_estimate * 100.0
    );
    println!(
        "  Tau (1 - t'put)   = {} with numerical integration error = {:.2e}%",
        pct(tau.value).bright_white(),
        tau.error_estimate * 100.0
    );
    println!("  Throughput        = {}", pct(out.throughput));
    println!("  QBER | kept       = {}", pct(out.conditional_qber));
    println!("  1 - H2 (kept)     = {:.6}", out.reconciled_fraction);
    println!("  no-band baseline  = {}", pct(out.threshold_only_error).dimmed());
    Ok(())
}
