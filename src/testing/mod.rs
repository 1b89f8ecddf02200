//! Test doubles and synthetic data shared by unit and integration tests.

pub mod dummies;
pub mod stubs;

pub use dummies::{random_catalog, uniform_catalog};
pub use stubs::{ConstantCosmology, VecCatalogLoader};
