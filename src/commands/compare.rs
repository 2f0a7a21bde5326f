use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::ChannelArgs;
use crate::core::harness::{ComparisonHarness, ComparisonReport, DEFAULT_AGREEMENT_SIGMAS};

fn print_report(name: &str, r: &ComparisonReport) {
    let verdict = if r.agrees_within(DEFAULT_AGREEMENT_SIGMAS) {
        "ok".green().bold()
    } else {
        "MISMATCH".bright_red().bold()
    };
    println!("{} {}", format!("{name}:").bright_blue().bold(), verdict);
    println!(
        "  analytic   = {:.6} (quadrature error bound {:.2e})",
        r.analytic.value, r.analytic.error_estimate
    );
    println!(
        "  montecarlo = {:.6} (standard error {:.2e}, n = {})",
        r.montecarlo.value,
        r.standard_error(),
        r.montecarlo.sample_count
    );
    println!(
        "  |diff|     = {:.3e} (relative {:.3e}, {:.2} sigma)",
        r.absolute_diff,
        r.relative_diff,
        r.sigmas()
    );
}

/// Returns the process exit code: 0 when both quantities agree, 1 otherwise.
pub fn main_with_opts(
    harness: &ComparisonHarness,
    channel: ChannelArgs,
    seed: u64,
    json: bool,
) -> Result<i32> {
    let params = channel.params().context("invalid channel parameters")?;
    crate::debug_log!(
        "compare: {:?}, n = {}, seed = {}",
        params,
        harness.montecarlo.sample_count(),
        seed
    );
    let cmp = harness
        .compare_seeded(&params, seed)
        .context("comparison failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cmp)?);
    } else {
        print_report("gamma", &cmp.gamma);
        print_report("tau", &cmp.tau);
    }

    if cmp.agrees_within(DEFAULT_AGREEMENT_SIGMAS) {
        Ok(0)
    } else {
        eprintln!(
            "{} analytic and Monte-Carlo results differ by more than {} standard errors",
            "warn:".yellow().bold(),
            DEFAULT_AGREEMENT_SIGMAS
        );
        Ok(1)
    }
}
