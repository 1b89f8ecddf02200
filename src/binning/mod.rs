mod edges;
mod error;
mod fixed_edge;
mod policy;
mod rank;

pub use edges::{BinEdges, BinSpacing};
pub use error::BinningError;
pub use fixed_edge::{DEFAULT_NUM_BINS, FixedEdgeBinning, MIN_OBJECTS_PER_FIXED_BIN};
pub use policy::{BinnedProfile, BinningPolicy, RadialSelection};
pub use rank::{DEFAULT_OBJECTS_PER_BIN, RankBinning, RunEstimator};
