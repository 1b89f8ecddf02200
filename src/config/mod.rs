mod binning_choice;
mod choice;
mod stack_config;

pub use binning_choice::{
    BinningChoice, BinningKind, BootstrapRankParameters, FixedEdgeParameters, RankParameters,
    build_binning,
};
pub use choice::ConfigChoice;
pub use stack_config::StackConfig;
