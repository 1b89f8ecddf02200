//! Bootstrap estimate of a sample mean and its standard error.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::statistics::{BinSummary, StatisticsError};

pub const DEFAULT_RESAMPLES: usize = 1000;

/// Mean of the resampled means and their spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapEstimate {
    pub mean: f64,
    pub std_error: f64,
}

/// Counter-based seed derivation (SplitMix64).
///
/// Gives every call index its own well-mixed seed, so consecutive streams
/// derived from one base seed are not correlated.
#[inline]
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Draws `resamples` same-size samples with replacement from `sample` and
/// summarizes their means.
///
/// `std_error` is the population standard deviation of the resampled means.
/// Non-finite values in `sample` propagate into both fields.
pub fn bootstrap_mean<R: Rng>(
    sample: &[f64],
    resamples: usize,
    rng: &mut R,
) -> Result<BootstrapEstimate, StatisticsError> {
    if sample.is_empty() {
        return Err(StatisticsError::EmptySample);
    }
    if resamples == 0 {
        return Err(StatisticsError::NoResamples);
    }

    let n = sample.len();
    let mut means = BinSummary::EMPTY;
    for _ in 0..resamples {
        let mut sum = 0.0;
        for _ in 0..n {
            sum += sample[rng.random_range(0..n)];
        }
        means.merge_in(&BinSummary::singleton(sum / n as f64));
    }

    Ok(BootstrapEstimate {
        mean: means.mean,
        std_error: means.population_variance().unwrap_or(0.0).sqrt(),
    })
}

/// Seeded bootstrap that hands every call its own RNG stream.
///
/// Streams are derived from the base seed and an atomic call counter, so a
/// shared `Bootstrap` never exposes mutable RNG state and calls stay
/// independent when made from several threads.
#[derive(Debug)]
pub struct Bootstrap {
    resamples: usize,
    seed: u64,
    calls: AtomicU64,
}

impl Bootstrap {
    pub fn new(resamples: usize, seed: u64) -> Result<Self, StatisticsError> {
        if resamples == 0 {
            return Err(StatisticsError::NoResamples);
        }
        Ok(Self {
            resamples,
            seed,
            calls: AtomicU64::new(0),
        })
    }

    pub fn estimate(&self, sample: &[f64]) -> Result<BootstrapEstimate, StatisticsError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let mut rng = StdRng::seed_from_u64(counter_rng_seed(self.seed, call));
        bootstrap_mean(sample, self.resamples, &mut rng)
    }
}
