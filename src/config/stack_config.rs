use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};

use crate::binning::{BinEdges, BinningError};
use crate::config::BinningChoice;
use crate::io::IoError;
use crate::stacking::SimulationKind;

/// Settings for one stacking run, usually read from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StackConfig {
    #[serde(default)]
    #[schemars(
        title = "Binning",
        description = "Per-catalog binning policy; stacking reuses the fixed-edge bins"
    )]
    pub binning: BinningChoice,

    #[serde(default)]
    #[schemars(
        title = "Simulation",
        description = "Simulation family selecting the halo id pattern; inferred from the answers file name when empty"
    )]
    pub simulation: Option<SimulationKind>,

    #[serde(default)]
    #[schemars(
        title = "Halo id pattern",
        description = "Regex with one capture group for the halo id, matched against the catalog file name"
    )]
    pub id_pattern: Option<String>,

    #[serde(default)]
    #[schemars(
        with = "Option<String>",
        title = "Cosmology table",
        description = "JSON table of (z, angular_diameter_distance, beta_inf) rows; relative to the config file"
    )]
    pub cosmology_table: Option<PathBuf>,
}

impl StackConfig {
    pub fn schema() -> Schema {
        schema_for!(StackConfig)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut config: StackConfig = serde_json::from_reader(reader)?;
        if let (Some(table), Some(dir)) = (config.cosmology_table.as_mut(), path.parent()) {
            if table.is_relative() {
                *table = dir.join(&*table);
            }
        }
        Ok(config)
    }

    /// Radial bins shared by every catalog in a stack.
    ///
    /// Only fixed-edge binning defines edges that are common to all catalogs.
    pub fn stack_edges(&self) -> Result<BinEdges, BinningError> {
        match &self.binning {
            BinningChoice::FixedEdge(p) => p.edges(),
            other => Err(BinningError::InvalidBinConfig(format!(
                "stacking needs fixed-edge binning, got '{}'",
                other.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FixedEdgeParameters, RankParameters};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_stacks_over_twelve_linear_bins() {
        let cfg = StackConfig::default();
        let edges = cfg.stack_edges().unwrap();
        assert_eq!(edges.num_bins(), 12);
        assert_eq!(edges.min(), 0.0);
        assert_eq!(edges.max(), 3.0);
    }

    #[test]
    fn rank_binning_has_no_stack_edges() {
        let cfg = StackConfig {
            binning: BinningChoice::Rank(RankParameters::default()),
            ..StackConfig::default()
        };
        assert!(matches!(
            cfg.stack_edges(),
            Err(BinningError::InvalidBinConfig(_))
        ));
    }

    #[test]
    fn reads_json_and_resolves_relative_table() {
        let mut tf = NamedTempFile::new().unwrap();
        write!(
            tf,
            r#"{{
                "binning": {{"type": "fixed-edge", "params": {{"num_bins": 4, "bin_spacing": "linear"}}}},
                "simulation": "bcc",
                "cosmology_table": "cosmo.json"
            }}"#
        )
        .unwrap();

        let cfg = StackConfig::from_path(tf.path()).unwrap();
        assert_eq!(cfg.simulation, Some(SimulationKind::Bcc));
        assert_eq!(
            cfg.binning,
            BinningChoice::FixedEdge(FixedEdgeParameters {
                num_bins: 4,
                ..FixedEdgeParameters::default()
            })
        );
        let table = cfg.cosmology_table.unwrap();
        assert_eq!(table, tf.path().parent().unwrap().join("cosmo.json"));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            StackConfig::from_path("/definitely/not/here.json"),
            Err(IoError::Io(_))
        ));
    }

    #[test]
    fn schema_mentions_binning_and_simulation() {
        let s = serde_json::to_string(&StackConfig::schema()).unwrap();
        assert!(s.contains("binning"));
        assert!(s.contains("mxxlsnap41"));
    }
}
