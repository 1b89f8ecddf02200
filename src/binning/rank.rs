use crate::binning::{BinnedProfile, BinningError, BinningPolicy, RadialSelection};
use crate::core::Catalog;
use crate::statistics::{Bootstrap, mean, population_std};

pub const DEFAULT_OBJECTS_PER_BIN: usize = 200;

/// How a run of shear values becomes a bin value and error.
#[derive(Debug)]
pub enum RunEstimator {
    /// Mean and `std / sqrt(n)`.
    StandardError,
    Bootstrap(Bootstrap),
}

/// Equal-count bins: sort by radius and cut into consecutive runs of
/// `objects_per_bin` rows. The last run keeps whatever remains.
#[derive(Debug)]
pub struct RankBinning {
    objects_per_bin: usize,
    selection: RadialSelection,
    estimator: RunEstimator,
}

impl RankBinning {
    pub fn new(objects_per_bin: usize, selection: RadialSelection) -> Result<Self, BinningError> {
        Self::with_estimator(objects_per_bin, selection, RunEstimator::StandardError)
    }

    pub fn bootstrapped(
        objects_per_bin: usize,
        selection: RadialSelection,
        bootstrap: Bootstrap,
    ) -> Result<Self, BinningError> {
        Self::with_estimator(objects_per_bin, selection, RunEstimator::Bootstrap(bootstrap))
    }

    pub fn with_estimator(
        objects_per_bin: usize,
        selection: RadialSelection,
        estimator: RunEstimator,
    ) -> Result<Self, BinningError> {
        if objects_per_bin == 0 {
            return Err(BinningError::invalid("objects per bin must be > 0"));
        }
        Ok(Self {
            objects_per_bin,
            selection,
            estimator,
        })
    }

    fn estimate(&self, shear: &[f64]) -> Result<(f64, f64), BinningError> {
        match &self.estimator {
            RunEstimator::StandardError => {
                let value = mean(shear).unwrap_or(f64::NAN);
                let std = population_std(shear).unwrap_or(f64::NAN);
                Ok((value, std / (shear.len() as f64).sqrt()))
            }
            RunEstimator::Bootstrap(b) => {
                let est = b.estimate(shear)?;
                Ok((est.mean, est.std_error))
            }
        }
    }
}

impl BinningPolicy for RankBinning {
    fn name(&self) -> &'static str {
        match self.estimator {
            RunEstimator::StandardError => "rank",
            RunEstimator::Bootstrap(_) => "bootstrap-rank",
        }
    }

    fn bin(&self, catalog: &Catalog) -> Result<BinnedProfile, BinningError> {
        let mut profile = BinnedProfile::default();
        if catalog.is_empty() {
            return Ok(profile);
        }

        let selected = self
            .selection
            .apply(catalog)?
            .sorted_by(self.selection.radial_column())?;
        let radii = selected.require(self.selection.radial_column())?;
        let shear = selected.require(self.selection.shear_column())?;

        for (r_run, g_run) in radii
            .chunks(self.objects_per_bin)
            .zip(shear.chunks(self.objects_per_bin))
        {
            let radius = mean(r_run).unwrap_or(f64::NAN);
            let (value, error) = self.estimate(g_run)?;
            profile.push(radius, value, error, r_run.len());
        }

        Ok(profile)
    }
}
