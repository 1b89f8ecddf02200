use crate::binning::BinEdges;
use crate::core::{BETA_S, Catalog, CatalogError, Cosmology, GHAT, R_MPC, TruthRecord};
use crate::stacking::{ProfileBin, StackError, StackedProfile};
use crate::statistics::{BinSummary, Estimator, RunningMean};

/// Running per-bin aggregate across every catalog stacked so far.
///
/// Each bin keeps the count/mean/M2 triple of the residual shear plus
/// mean-only aggregates of radius, `beta` and `beta^2`. Raw rows are dropped
/// once a catalog has been folded in.
#[derive(Debug, Clone)]
pub struct ProfileAccumulator {
    edges: BinEdges,
    radial_column: String,
    shear_column: String,
    shear: Vec<BinSummary>,
    radius: Vec<RunningMean>,
    beta: Vec<RunningMean>,
    beta2: Vec<RunningMean>,
    z_lens: RunningMean,
    m200: RunningMean,
    concen: RunningMean,
    catalogs: u64,
}

/// Catalog-local contribution to one bin, computed before any merge.
struct BinPartial {
    bin: usize,
    shear: BinSummary,
    radius: f64,
    beta: f64,
    beta2: f64,
}

impl ProfileAccumulator {
    pub fn new(edges: BinEdges) -> Self {
        let n = edges.num_bins();
        Self {
            edges,
            radial_column: R_MPC.to_string(),
            shear_column: GHAT.to_string(),
            shear: vec![BinSummary::EMPTY; n],
            radius: vec![RunningMean::default(); n],
            beta: vec![RunningMean::default(); n],
            beta2: vec![RunningMean::default(); n],
            z_lens: RunningMean::default(),
            m200: RunningMean::default(),
            concen: RunningMean::default(),
            catalogs: 0,
        }
    }

    pub fn with_columns<R: Into<String>, S: Into<String>>(
        mut self,
        radial_column: R,
        shear_column: S,
    ) -> Self {
        self.radial_column = radial_column.into();
        self.shear_column = shear_column.into();
        self
    }

    #[inline]
    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    #[inline]
    pub fn catalogs(&self) -> u64 {
        self.catalogs
    }

    #[inline]
    pub fn bin_summaries(&self) -> &[BinSummary] {
        &self.shear
    }

    /// Mean lens redshift over accumulated catalogs; `NaN` before the first.
    #[inline]
    pub fn mean_redshift(&self) -> f64 {
        self.z_lens.estimation()
    }

    /// Folds one catalog into the aggregate and returns how many of its rows
    /// landed in a bin.
    ///
    /// Nothing is mutated unless the whole catalog validates.
    pub fn accumulate(
        &mut self,
        catalog: &Catalog,
        truth: &TruthRecord,
        cosmology: &dyn Cosmology,
    ) -> Result<u64, StackError> {
        let partials = self.partials(catalog, cosmology)?;

        let mut binned = 0;
        for p in partials {
            let n = p.shear.count;
            binned += n;
            self.shear[p.bin].merge_in(&p.shear);
            self.radius[p.bin].merge_partition(n, p.radius);
            self.beta[p.bin].merge_partition(n, p.beta);
            self.beta2[p.bin].merge_partition(n, p.beta2);
        }
        self.z_lens.add(catalog.z_lens());
        self.m200.add(truth.m200);
        self.concen.add(truth.concen);
        self.catalogs += 1;
        Ok(binned)
    }

    fn partials(
        &self,
        catalog: &Catalog,
        cosmology: &dyn Cosmology,
    ) -> Result<Vec<BinPartial>, StackError> {
        let radii = catalog.require(&self.radial_column)?;
        let shear = catalog.require(&self.shear_column)?;
        let beta = catalog.require(BETA_S)?;
        let beta2 = catalog.beta_squared()?;

        let z_lens = catalog.z_lens();
        if !z_lens.is_finite() {
            return Err(CatalogError::MissingRedshift.into());
        }
        let strength = cosmology.lensing_strength(z_lens);
        if !strength.is_finite() || strength == 0.0 {
            return Err(StackError::InvalidLensingStrength {
                z_lens,
                value: strength,
            });
        }

        let mut members: Vec<Vec<usize>> = vec![Vec::new(); self.edges.num_bins()];
        for (i, &r) in radii.iter().enumerate() {
            if let Some(bin) = self.edges.bin_index(r) {
                members[bin].push(i);
            }
        }

        let mean_of = |col: &[f64], idx: &[usize]| {
            idx.iter().map(|&i| col[i]).sum::<f64>() / idx.len() as f64
        };

        Ok(members
            .iter()
            .enumerate()
            .filter(|(_, idx)| !idx.is_empty())
            .map(|(bin, idx)| {
                let residuals: Vec<f64> = idx
                    .iter()
                    .map(|&i| shear[i] / (beta[i] * strength))
                    .collect();
                BinPartial {
                    bin,
                    shear: BinSummary::from_sample(&residuals),
                    radius: mean_of(radii, idx),
                    beta: mean_of(beta, idx),
                    beta2: mean_of(&beta2[..], idx),
                }
            })
            .collect())
    }

    /// Unbiased residual variance per bin.
    pub fn variance(&self) -> Vec<Option<f64>> {
        self.shear.iter().map(BinSummary::variance).collect()
    }

    pub fn to_profile(&self) -> StackedProfile {
        let bins = (0..self.edges.num_bins())
            .map(|i| ProfileBin {
                radius: self.radius[i].mean(),
                shear: self.shear[i].mean,
                shear_variance: self.shear[i].variance(),
                count: self.shear[i].count,
                beta_mean: self.beta[i].mean(),
                beta2_mean: self.beta2[i].mean(),
            })
            .collect();
        StackedProfile {
            edges: self.edges.edges().to_vec(),
            bins,
            mean_redshift: self.z_lens.estimation(),
            catalogs: self.catalogs,
            mean_m200: self.m200.estimation(),
            mean_concen: self.concen.estimation(),
        }
    }
}
