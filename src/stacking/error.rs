use thiserror::Error;

use crate::binning::BinningError;
use crate::core::{CatalogError, HaloId};
use crate::io::IoError;

#[derive(Debug, Error)]
pub enum StackError {
    #[error("no truth record for halo {halo_id} (catalog '{identifier}')")]
    MissingTruth { halo_id: HaloId, identifier: String },

    #[error("failed to load catalog '{identifier}'")]
    CatalogLoad {
        identifier: String,
        #[source]
        source: CatalogError,
    },

    #[error("catalog '{identifier}' does not match halo id pattern '{pattern}'")]
    UnmatchedIdentifier { identifier: String, pattern: String },

    #[error("invalid halo id pattern: {0}")]
    InvalidPattern(String),

    #[error("lensing strength at z={z_lens} is {value}")]
    InvalidLensingStrength { z_lens: f64, value: f64 },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Binning(#[from] BinningError),

    #[error(transparent)]
    Io(#[from] IoError),
}
