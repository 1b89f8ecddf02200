pub mod catalogs;

pub use catalogs::{random_catalog, uniform_catalog};
