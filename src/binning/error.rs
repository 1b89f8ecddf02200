use thiserror::Error;

use crate::core::CatalogError;
use crate::statistics::StatisticsError;

#[derive(Debug, Error)]
pub enum BinningError {
    #[error("invalid bin configuration: {0}")]
    InvalidBinConfig(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Statistics(#[from] StatisticsError),
}

impl BinningError {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        BinningError::InvalidBinConfig(msg.into())
    }
}
