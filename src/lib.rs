pub mod binning;
pub mod config;
pub mod core;
pub mod io;
pub mod stacking;
pub mod statistics;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
