use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::core::sweep::{sweep_beta, sweep_grid};
use crate::io::atomic::atomic_write;

#[derive(Serialize)]
struct Stamped<'a, T: Serialize> {
    generated_at: String,
    settings: &'a Settings,
    sweep: T,
}

fn render<T: Serialize>(settings: &Settings, sweep: T, csv: String, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => Ok(csv),
        OutputFormat::Json => {
            let doc = Stamped {
                generated_at: chrono::Utc::now().to_rfc3339(),
                settings,
                sweep,
            };
            Ok(serde_json::to_string_pretty(&doc)? + "\n")
        }
    }
}

pub fn main_with_opts(
    settings: &Settings,
    grid: bool,
    sigma_noise: Option<f64>,
    out: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let evaluator = settings.analytic();
    let cfg = &settings.sweep;
    let betas = cfg.beta.points();

    let body = if grid {
        let noises = cfg.sigma_noise.points();
        crate::debug_log!("sweep: {} betas x {} noise levels", betas.len(), noises.len());
        let sweep = sweep_grid(&evaluator, cfg.sigma_x, cfg.mu_x, &betas, &noises)
            .context("grid sweep failed")?;
        let csv = sweep.to_csv();
        render(settings, sweep, csv, format)?
    } else {
        let noise = sigma_noise.unwrap_or(cfg.sigma_noise.min);
        crate::debug_log!("sweep: {} betas at sigma_noise={}", betas.len(), noise);
        let sweep = sweep_beta(&evaluator, cfg.sigma_x, noise, cfg.mu_x, &betas)
            .context("beta sweep failed")?;
        let csv = sweep.to_csv();
        render(settings, sweep, csv, format)?
    };

    match out.or_else(|| cfg.output.clone()) {
        Some(path) => {
            atomic_write(&path, body).with_context(|| format!("Write sweep {}", path.display()))?;
            println!("{} {}", "wrote".green().bold(), path.display());
        }
        None => print!("{body}"),
    }
    Ok(())
}
