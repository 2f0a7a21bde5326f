//! Sampling estimate of gamma and tau, used as ground truth for the quadrature.
//!
//! The caller's generator only supplies a root seed. Samples are processed in
//! fixed-size chunks, each driven by its own `StdRng` derived from
//! `(root, chunk index)`, so the tallies are identical whether the chunks run
//! serially or on a rayon pool.

use std::ops::Add;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::error::EvalError;
use super::params::{ChannelParameters, SampleEstimate};

pub const DEFAULT_SAMPLE_COUNT: u64 = 1_000_000;

/// Samples per independently seeded chunk.
pub const CHUNK_SIZE: u64 = 1 << 16;

/// SplitMix64 finaliser over `root + counter * golden`.
fn chunk_seed(root: u64, counter: u64) -> u64 {
    let mut z = root.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Raw counts for a batch of samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub errors: u64,
    pub ignores: u64,
}

impl Add for Tally {
    type Output = Tally;

    fn add(self, rhs: Tally) -> Tally {
        Tally {
            errors: self.errors + rhs.errors,
            ignores: self.ignores + rhs.ignores,
        }
    }
}

/// Error check for one received value given its true bit.
///
/// Bit 0 errs at or above the upper band edge, bit 1 at or below the lower edge.
pub fn is_bit_error(received: f64, bit: bool, band_low: f64, band_high: f64) -> bool {
    if bit {
        received <= band_low
    } else {
        received >= band_high
    }
}

/// Discard check: the received value sits inside the closed guard band.
pub fn is_ignored(received: f64, band_low: f64, band_high: f64) -> bool {
    band_low <= received && received <= band_high
}

fn run_chunk(
    params: &ChannelParameters,
    source: &Normal<f64>,
    noise: &Normal<f64>,
    len: u64,
    seed: u64,
) -> Tally {
    let mut rng = StdRng::seed_from_u64(seed);
    let (lo, hi) = (params.band_low(), params.band_high());
    let mut tally = Tally::default();
    for _ in 0..len {
        let x = source.sample(&mut rng);
        let bit = x >= params.mu_x;
        let y = x + noise.sample(&mut rng);
        tally.errors += is_bit_error(y, bit, lo, hi) as u64;
        tally.ignores += is_ignored(y, lo, hi) as u64;
    }
    tally
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonteCarloEvaluator {
    sample_count: u64,
}

impl Default for MonteCarloEvaluator {
    fn default() -> Self {
        Self { sample_count: DEFAULT_SAMPLE_COUNT }
    }
}

impl MonteCarloEvaluator {
    pub fn new(sample_count: u64) -> Result<Self, EvalError> {
        if sample_count == 0 {
            return Err(EvalError::invalid("sample_count", 0.0, "must be > 0"));
        }
        Ok(Self { sample_count })
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Estimate `(gamma, tau)`, drawing the root seed from `rng`.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        params: &ChannelParameters,
        rng: &mut R,
    ) -> Result<(SampleEstimate, SampleEstimate), EvalError> {
        let root = rng.gen::<u64>();
        self.simulate_seeded(params, root)
    }

    /// Estimate `(gamma, tau)` from an explicit root seed.
    pub fn simulate_seeded(
        &self,
        params: &ChannelParameters,
        seed: u64,
    ) -> Result<(SampleEstimate, SampleEstimate), EvalError> {
        let tally = self.tally(params, seed)?;
        Ok((
            SampleEstimate::from_count(tally.errors, self.sample_count),
            SampleEstimate::from_count(tally.ignores, self.sample_count),
        ))
    }

    /// Raw error/ignore counts over `sample_count` draws.
    pub fn tally(&self, params: &ChannelParameters, seed: u64) -> Result<Tally, EvalError> {
        params.validate()?;
        let source = Normal::new(params.mu_x, params.sigma_x)
            .map_err(|_| EvalError::invalid("sigma_x", params.sigma_x, "rejected by normal sampler"))?;
        let noise = Normal::new(0.0, params.sigma_noise).map_err(|_| {
            EvalError::invalid("sigma_noise", params.sigma_noise, "rejected by normal sampler")
        })?;

        let n = self.sample_count;
        let chunks = n.div_ceil(CHUNK_SIZE);
        let chunk_len = |i: u64| CHUNK_SIZE.min(n - i * CHUNK_SIZE);

        #[cfg(feature = "parallel")]
        let tally = (0..chunks)
            .into_par_iter()
            .map(|i| run_chunk(params, &source, &noise, chunk_len(i), chunk_seed(seed, i)))
            .reduce(Tally::default, Tally::add);

        #[cfg(not(feature = "parallel"))]
        let tally = (0..chunks)
            .map(|i| run_chunk(params, &source, &noise, chunk_len(i), chunk_seed(seed, i)))
            .fold(Tally::default(), Tally::add);

        Ok(tally)
    }
}

/// One-shot helper with the free-function argument order.
pub fn simulate<R: Rng + ?Sized>(
    mu_x: f64,
    sigma_x: f64,
    sigma_noise: f64,
    beta: f64,
    sample_count: u64,
    rng: &mut R,
) -> Result<(SampleEstimate, SampleEstimate), EvalError> {
    let params = ChannelParameters::new(mu_x, sigma_x, sigma_noise, beta)?;
    MonteCarloEvaluator::new(sample_count)?.simulate(&params, rng)
}
