use tracing::trace;

use crate::binning::{BinEdges, BinnedProfile, BinningError, BinningPolicy};
use crate::core::{Catalog, GHAT, R_MPC};
use crate::statistics::{Bootstrap, mean};

pub const DEFAULT_NUM_BINS: usize = 12;

/// Bins with fewer selected rows are left out of the profile.
pub const MIN_OBJECTS_PER_FIXED_BIN: usize = 5;

/// Bins with fixed radial edges; values and errors come from the bootstrap.
#[derive(Debug)]
pub struct FixedEdgeBinning {
    edges: BinEdges,
    radial_column: String,
    shear_column: String,
    bootstrap: Bootstrap,
}

impl FixedEdgeBinning {
    pub fn new(edges: BinEdges, bootstrap: Bootstrap) -> Self {
        Self {
            edges,
            radial_column: R_MPC.to_string(),
            shear_column: GHAT.to_string(),
            bootstrap,
        }
    }

    pub fn with_columns<R: Into<String>, S: Into<String>>(
        mut self,
        radial_column: R,
        shear_column: S,
    ) -> Result<Self, BinningError> {
        self.radial_column = radial_column.into();
        self.shear_column = shear_column.into();
        if self.radial_column.is_empty() || self.shear_column.is_empty() {
            return Err(BinningError::invalid("column names must not be empty"));
        }
        Ok(self)
    }
}

impl BinningPolicy for FixedEdgeBinning {
    fn name(&self) -> &'static str {
        "fixed-edge"
    }

    fn bin(&self, catalog: &Catalog) -> Result<BinnedProfile, BinningError> {
        let mut profile = BinnedProfile::default();
        if catalog.is_empty() {
            return Ok(profile);
        }

        let radii = catalog.require(&self.radial_column)?;
        let shear = catalog.require(&self.shear_column)?;

        let n_bins = self.edges.num_bins();
        let mut bin_radii: Vec<Vec<f64>> = vec![Vec::new(); n_bins];
        let mut bin_shear: Vec<Vec<f64>> = vec![Vec::new(); n_bins];
        for (&r, &g) in radii.iter().zip(shear) {
            if let Some(i) = self.edges.bin_index(r) {
                bin_radii[i].push(r);
                bin_shear[i].push(g);
            }
        }

        for (i, (r_bin, g_bin)) in bin_radii.iter().zip(&bin_shear).enumerate() {
            if r_bin.len() < MIN_OBJECTS_PER_FIXED_BIN {
                trace!(bin = i, objects = r_bin.len(), "skipping sparse bin");
                continue;
            }
            let radius = mean(r_bin).unwrap_or(f64::NAN);
            let est = self.bootstrap.estimate(g_bin)?;
            profile.push(radius, est.mean, est.std_error, r_bin.len());
        }

        Ok(profile)
    }
}
