use std::str::FromStr;

use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::binning::BinningError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum BinSpacing {
    #[default]
    Linear,
    Log,
}

impl FromStr for BinSpacing {
    type Err = BinningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(BinSpacing::Linear),
            "log" => Ok(BinSpacing::Log),
            other => Err(BinningError::invalid(format!(
                "unknown bin spacing '{other}' (expected 'linear' or 'log')"
            ))),
        }
    }
}

/// Strictly increasing radii; bin `i` is `[edges[i], edges[i + 1])`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    pub fn from_edges(edges: Vec<f64>) -> Result<Self, BinningError> {
        if edges.len() < 2 {
            return Err(BinningError::invalid("at least two bin edges are required"));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(BinningError::invalid("bin edges must be finite"));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(BinningError::invalid("bin edges must be strictly increasing"));
        }
        Ok(Self { edges })
    }

    pub fn linear(min: f64, max: f64, num_bins: usize) -> Result<Self, BinningError> {
        check_range(min, max, num_bins)?;
        let n = num_bins as f64;
        let mut edges: Vec<f64> = (0..=num_bins)
            .map(|i| min + (max - min) * i as f64 / n)
            .collect();
        edges[num_bins] = max;
        Self::from_edges(edges)
    }

    pub fn log(min: f64, max: f64, num_bins: usize) -> Result<Self, BinningError> {
        check_range(min, max, num_bins)?;
        if min <= 0.0 {
            return Err(BinningError::invalid(format!(
                "log-spaced bins need a positive lower bound, got {min}"
            )));
        }
        let lo = min.log10();
        let step = (max.log10() - lo) / num_bins as f64;
        let mut edges: Vec<f64> = (0..=num_bins)
            .map(|i| 10f64.powf(lo + step * i as f64))
            .collect();
        edges[0] = min;
        edges[num_bins] = max;
        Self::from_edges(edges)
    }

    pub fn with_spacing(
        spacing: BinSpacing,
        min: f64,
        max: f64,
        num_bins: usize,
    ) -> Result<Self, BinningError> {
        match spacing {
            BinSpacing::Linear => Self::linear(min, max, num_bins),
            BinSpacing::Log => Self::log(min, max, num_bins),
        }
    }

    #[inline]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.edges.len() - 1
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.edges[0]
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Bin holding `x`, or `None` outside `[min, max)` (and for `NaN`).
    pub fn bin_index(&self, x: f64) -> Option<usize> {
        if !(self.min() <= x && x < self.max()) {
            return None;
        }
        Some(self.edges.partition_point(|&e| e <= x) - 1)
    }
}

fn check_range(min: f64, max: f64, num_bins: usize) -> Result<(), BinningError> {
    if num_bins == 0 {
        return Err(BinningError::invalid("number of bins must be > 0"));
    }
    if !(min.is_finite() && max.is_finite()) {
        return Err(BinningError::invalid("bin range must be finite"));
    }
    if min >= max {
        return Err(BinningError::invalid(format!(
            "bin range must be increasing, got [{min}, {max}]"
        )));
    }
    Ok(())
}
