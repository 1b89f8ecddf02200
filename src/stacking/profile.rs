use serde::Serialize;

/// One radial bin of a stacked profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileBin {
    pub radius: f64,
    pub shear: f64,
    /// Unbiased variance of the residual shear; absent below two objects.
    pub shear_variance: Option<f64>,
    pub count: u64,
    pub beta_mean: f64,
    pub beta2_mean: f64,
}

impl ProfileBin {
    #[inline]
    pub fn shear_error(&self) -> Option<f64> {
        self.shear_variance.map(f64::sqrt)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Snapshot of a stacking run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedProfile {
    pub edges: Vec<f64>,
    pub bins: Vec<ProfileBin>,
    pub mean_redshift: f64,
    pub catalogs: u64,
    pub mean_m200: f64,
    pub mean_concen: f64,
}

impl StackedProfile {
    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|b| b.count).collect()
    }

    pub fn total_objects(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn populated_bins(&self) -> impl Iterator<Item = (usize, &ProfileBin)> {
        self.bins.iter().enumerate().filter(|(_, b)| !b.is_empty())
    }
}
