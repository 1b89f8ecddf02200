mod bootstrap;
mod descriptive;
mod error;
mod estimator;
mod online;

pub use bootstrap::{
    Bootstrap, BootstrapEstimate, DEFAULT_RESAMPLES, bootstrap_mean, counter_rng_seed,
};
pub use descriptive::{mean, population_std, population_variance};
pub use error::StatisticsError;
pub use estimator::Estimator;
pub use online::{BinSummary, RunningMean, merge, merge_mean};
