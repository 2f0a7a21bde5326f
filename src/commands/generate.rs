use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::core::{ChannelParameters, EvalError};
use crate::io::atomic::atomic_write;

/// Decimal places kept in the exported samples.
pub const EXPORT_DECIMALS: usize = 2;

/// One simulated symbol: source value, its bit label and the received value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Symbol {
    pub x: f64,
    pub bit: bool,
    pub y: f64,
}

/// Draw `count` symbols; `params.beta` is ignored.
pub fn sample_symbols(params: &ChannelParameters, count: u64, seed: u64) -> Result<Vec<Symbol>, EvalError> {
    params.validate()?;
    let source = Normal::new(params.mu_x, params.sigma_x)
        .map_err(|_| EvalError::invalid("sigma_x", params.sigma_x, "rejected by normal sampler"))?;
    let noise = Normal::new(0.0, params.sigma_noise)
        .map_err(|_| EvalError::invalid("sigma_noise", params.sigma_noise, "rejected by normal sampler"))?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..count)
        .map(|_| {
            let x = source.sample(&mut rng);
            let y = x + noise.sample(&mut rng);
            Symbol { x, bit: x >= params.mu_x, y }
        })
        .collect())
}

pub fn to_csv(symbols: &[Symbol]) -> String {
    let mut out = String::with_capacity(16 * (symbols.len() + 1));
    out.push_str("x,bit,y\n");
    for s in symbols {
        let _ = writeln!(
            out,
            "{:.prec$},{},{:.prec$}",
            s.x,
            s.bit as u8,
            s.y,
            prec = EXPORT_DECIMALS
        );
    }
    out
}

pub fn main_with_opts(
    noise: f64,
    sigma_x: f64,
    mu_x: f64,
    samples: u64,
    seed: u64,
    out: PathBuf,
) -> Result<()> {
    let params = ChannelParameters::new(mu_x, sigma_x, noise, 0.0).context("invalid channel parameters")?;
    crate::debug_log!("generate: {} samples, seed {}", samples, seed);
    let symbols = sample_symbols(&params, samples, seed)?;
    atomic_write(&out, to_csv(&symbols))
        .with_context(|| format!("Write samples {}", out.display()))?;
    println!(
        "{} {} samples -> {}",
        "generated".green().bold(),
        symbols.len(),
        out.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rounds_to_two_decimals() {
        let csv = to_csv(&[Symbol { x: 0.123456, bit: true, y: -1.0 }]);
        assert_eq!(csv, "x,bit,y\n0.12,1,-1.00\n");
    }

    #[test]
    fn bits_follow_the_threshold() {
        let p = ChannelParameters::new(0.5, 1.0, 0.1, 0.0).unwrap();
        let symbols = sample_symbols(&p, 1000, 3).unwrap();
        assert_eq!(symbols.len(), 1000);
        assert!(symbols.iter().all(|s| s.bit == (s.x >= 0.5)));
        assert_eq!(symbols, sample_symbols(&p, 1000, 3).unwrap());
    }
}
