pub mod constant_cosmology;
pub mod vec_loader;

pub use constant_cosmology::ConstantCosmology;
pub use vec_loader::VecCatalogLoader;
