pub mod catalog;
pub mod cosmology;
mod error;
pub mod truth;

pub use catalog::{BETA_S, BETA_S2, Catalog, GHAT, R_MPC, Row};
pub use cosmology::{
    Cosmology, CosmologyRow, SOURCE_REDSHIFT_AT_INFINITY, TabulatedCosmology,
};
pub use error::{CatalogError, CosmologyError};
pub use truth::{HaloId, MapTruthStore, TruthRecord, TruthStore};
