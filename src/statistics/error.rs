use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatisticsError {
    #[error("cannot estimate from an empty sample")]
    EmptySample,

    #[error("bootstrap needs at least one resample")]
    NoResamples,
}
