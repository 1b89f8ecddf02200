use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

use crate::binning::{
    BinEdges, BinSpacing, BinningError, BinningPolicy, DEFAULT_NUM_BINS, DEFAULT_OBJECTS_PER_BIN,
    FixedEdgeBinning, RadialSelection, RankBinning,
};
use crate::config::ConfigChoice;
use crate::core::{GHAT, R_MPC};
use crate::statistics::{Bootstrap, DEFAULT_RESAMPLES};

const DEFAULT_SEED: u64 = 42;
fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_bin_count() -> usize {
    DEFAULT_OBJECTS_PER_BIN
}
fn default_num_bins() -> usize {
    DEFAULT_NUM_BINS
}
fn default_resamples() -> usize {
    DEFAULT_RESAMPLES
}
fn default_rank_min_radius() -> f64 {
    0.0
}
fn default_rank_max_radius() -> f64 {
    2000.0
}
fn default_edge_min_radius() -> f64 {
    0.0
}
fn default_edge_max_radius() -> f64 {
    3.0
}
fn default_spacing() -> String {
    BinSpacing::Linear.to_string()
}
fn default_radial_column() -> String {
    R_MPC.to_string()
}
fn default_shear_column() -> String {
    GHAT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RankParameters {
    #[serde(default = "default_bin_count")]
    #[schemars(
        title = "Objects per bin",
        description = "Number of objects in each radius-ranked bin; the last bin keeps the remainder",
        range(min = 1),
        default = "default_bin_count"
    )]
    pub bin_count: usize,

    #[serde(default = "default_rank_min_radius")]
    #[schemars(title = "Minimum radius", default = "default_rank_min_radius")]
    pub min_radius: f64,

    #[serde(default = "default_rank_max_radius")]
    #[schemars(title = "Maximum radius", default = "default_rank_max_radius")]
    pub max_radius: f64,

    #[serde(default = "default_radial_column")]
    #[schemars(title = "Radial column", default = "default_radial_column")]
    pub radial_column: String,

    #[serde(default = "default_shear_column")]
    #[schemars(title = "Shear column", default = "default_shear_column")]
    pub shear_column: String,
}

impl Default for RankParameters {
    fn default() -> Self {
        Self {
            bin_count: default_bin_count(),
            min_radius: default_rank_min_radius(),
            max_radius: default_rank_max_radius(),
            radial_column: default_radial_column(),
            shear_column: default_shear_column(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BootstrapRankParameters {
    #[serde(default = "default_bin_count")]
    #[schemars(
        title = "Objects per bin",
        description = "Number of objects in each radius-ranked bin; the last bin keeps the remainder",
        range(min = 1),
        default = "default_bin_count"
    )]
    pub bin_count: usize,

    #[serde(default = "default_rank_min_radius")]
    #[schemars(title = "Minimum radius", default = "default_rank_min_radius")]
    pub min_radius: f64,

    #[serde(default = "default_rank_max_radius")]
    #[schemars(title = "Maximum radius", default = "default_rank_max_radius")]
    pub max_radius: f64,

    #[serde(default = "default_radial_column")]
    #[schemars(title = "Radial column", default = "default_radial_column")]
    pub radial_column: String,

    #[serde(default = "default_shear_column")]
    #[schemars(title = "Shear column", default = "default_shear_column")]
    pub shear_column: String,

    #[serde(default = "default_resamples")]
    #[schemars(
        title = "Bootstrap resamples",
        range(min = 1),
        default = "default_resamples"
    )]
    pub bootstrap_resamples: usize,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "PRNG seed", default = "default_seed")]
    pub seed: u64,
}

impl Default for BootstrapRankParameters {
    fn default() -> Self {
        Self {
            bin_count: default_bin_count(),
            min_radius: default_rank_min_radius(),
            max_radius: default_rank_max_radius(),
            radial_column: default_radial_column(),
            shear_column: default_shear_column(),
            bootstrap_resamples: default_resamples(),
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FixedEdgeParameters {
    #[serde(default = "default_edge_min_radius")]
    #[schemars(title = "Minimum radius", default = "default_edge_min_radius")]
    pub min_radius: f64,

    #[serde(default = "default_edge_max_radius")]
    #[schemars(title = "Maximum radius", default = "default_edge_max_radius")]
    pub max_radius: f64,

    #[serde(default = "default_num_bins")]
    #[schemars(title = "Number of bins", range(min = 1), default = "default_num_bins")]
    pub num_bins: usize,

    #[serde(default = "default_spacing")]
    #[schemars(
        title = "Bin spacing",
        description = "Either \"linear\" or \"log\"",
        default = "default_spacing"
    )]
    pub bin_spacing: String,

    #[serde(default = "default_radial_column")]
    #[schemars(title = "Radial column", default = "default_radial_column")]
    pub radial_column: String,

    #[serde(default = "default_shear_column")]
    #[schemars(title = "Shear column", default = "default_shear_column")]
    pub shear_column: String,

    #[serde(default = "default_resamples")]
    #[schemars(
        title = "Bootstrap resamples",
        range(min = 1),
        default = "default_resamples"
    )]
    pub bootstrap_resamples: usize,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "PRNG seed", default = "default_seed")]
    pub seed: u64,
}

impl Default for FixedEdgeParameters {
    fn default() -> Self {
        Self {
            min_radius: default_edge_min_radius(),
            max_radius: default_edge_max_radius(),
            num_bins: default_num_bins(),
            bin_spacing: default_spacing(),
            radial_column: default_radial_column(),
            shear_column: default_shear_column(),
            bootstrap_resamples: default_resamples(),
            seed: default_seed(),
        }
    }
}

impl FixedEdgeParameters {
    pub fn edges(&self) -> Result<BinEdges, BinningError> {
        let spacing: BinSpacing = self.bin_spacing.parse()?;
        BinEdges::with_spacing(spacing, self.min_radius, self.max_radius, self.num_bins)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(BinningKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum BinningChoice {
    #[strum_discriminants(strum(
        message = "Equal-count bins",
        detailed_message = "Radius-ranked bins of a fixed object count; mean and standard error."
    ))]
    Rank(RankParameters),

    #[strum_discriminants(strum(
        message = "Bootstrapped equal-count bins",
        detailed_message = "Radius-ranked bins of a fixed object count; bootstrap mean and error."
    ))]
    BootstrapRank(BootstrapRankParameters),

    #[strum_discriminants(strum(
        message = "Fixed-edge bins",
        detailed_message = "Linear or log radial edges; bootstrap mean and error, sparse bins dropped."
    ))]
    FixedEdge(FixedEdgeParameters),
}

impl Default for BinningChoice {
    fn default() -> Self {
        BinningChoice::FixedEdge(FixedEdgeParameters::default())
    }
}

impl BinningChoice {
    pub fn kind(&self) -> BinningKind {
        self.into()
    }

    pub fn radial_column(&self) -> &str {
        match self {
            BinningChoice::Rank(p) => &p.radial_column,
            BinningChoice::BootstrapRank(p) => &p.radial_column,
            BinningChoice::FixedEdge(p) => &p.radial_column,
        }
    }

    pub fn shear_column(&self) -> &str {
        match self {
            BinningChoice::Rank(p) => &p.shear_column,
            BinningChoice::BootstrapRank(p) => &p.shear_column,
            BinningChoice::FixedEdge(p) => &p.shear_column,
        }
    }
}

impl ConfigChoice for BinningChoice {
    type Kind = BinningKind;

    fn schema() -> Schema {
        schema_for!(BinningChoice)
    }

    fn default_params(kind: Self::Kind) -> serde_json::Result<Value> {
        match kind {
            BinningKind::Rank => serde_json::to_value(RankParameters::default()),
            BinningKind::BootstrapRank => serde_json::to_value(BootstrapRankParameters::default()),
            BinningKind::FixedEdge => serde_json::to_value(FixedEdgeParameters::default()),
        }
    }
}

impl TryFrom<RankParameters> for RankBinning {
    type Error = BinningError;

    fn try_from(p: RankParameters) -> Result<Self, Self::Error> {
        let selection =
            RadialSelection::with_columns(p.radial_column, p.shear_column, p.min_radius, p.max_radius)?;
        RankBinning::new(p.bin_count, selection)
    }
}

impl TryFrom<BootstrapRankParameters> for RankBinning {
    type Error = BinningError;

    fn try_from(p: BootstrapRankParameters) -> Result<Self, Self::Error> {
        let selection =
            RadialSelection::with_columns(p.radial_column, p.shear_column, p.min_radius, p.max_radius)?;
        let bootstrap = Bootstrap::new(p.bootstrap_resamples, p.seed)?;
        RankBinning::bootstrapped(p.bin_count, selection, bootstrap)
    }
}

impl TryFrom<FixedEdgeParameters> for FixedEdgeBinning {
    type Error = BinningError;

    fn try_from(p: FixedEdgeParameters) -> Result<Self, Self::Error> {
        let edges = p.edges()?;
        let bootstrap = Bootstrap::new(p.bootstrap_resamples, p.seed)?;
        FixedEdgeBinning::new(edges, bootstrap).with_columns(p.radial_column, p.shear_column)
    }
}

/// Validates the configuration and builds the selected policy.
pub fn build_binning(choice: BinningChoice) -> Result<Box<dyn BinningPolicy>, BinningError> {
    match choice {
        BinningChoice::Rank(p) => {
            let b = RankBinning::try_from(p)?;
            Ok(Box::new(b))
        }
        BinningChoice::BootstrapRank(p) => {
            let b = RankBinning::try_from(p)?;
            Ok(Box::new(b))
        }
        BinningChoice::FixedEdge(p) => {
            let b = FixedEdgeBinning::try_from(p)?;
            Ok(Box::new(b))
        }
    }
}
