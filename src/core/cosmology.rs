//! Cosmology-derived scalars consumed by the stacker.
//!
//! Distances and lensing efficiencies are computed elsewhere; this module only
//! defines the interface the stacker calls and a tabulated implementation for
//! feeding precomputed values in.

use serde::{Deserialize, Serialize};

use crate::core::CosmologyError;

/// Source redshift standing in for a source at infinite distance.
pub const SOURCE_REDSHIFT_AT_INFINITY: f64 = 1e6;

pub trait Cosmology {
    /// Angular diameter distance to redshift `z`, in Mpc.
    fn angular_diameter_distance(&self, z: f64) -> f64;

    /// Lensing efficiency `D_ls / D_s`; zero when the source is not behind
    /// the lens.
    fn beta(&self, z_source: f64, z_lens: f64) -> f64;

    /// Scalar dividing `beta * shear` into the stacked residual, for a source
    /// at [`SOURCE_REDSHIFT_AT_INFINITY`].
    fn lensing_strength(&self, z_lens: f64) -> f64 {
        self.beta(SOURCE_REDSHIFT_AT_INFINITY, z_lens) * self.angular_diameter_distance(z_lens)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CosmologyRow {
    pub z: f64,
    pub angular_diameter_distance: f64,
    pub beta_inf: f64,
}

/// Piecewise-linear interpolation over precomputed rows; clamps outside the
/// tabulated redshift range.
///
/// `beta_inf` holds the efficiency for a source at infinity. Sources inside
/// the table use the flat-universe relation between comoving distances
/// `D_M = (1 + z) D_A`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CosmologyRow>", into = "Vec<CosmologyRow>")]
pub struct TabulatedCosmology {
    rows: Vec<CosmologyRow>,
}

impl TabulatedCosmology {
    pub fn new(rows: Vec<CosmologyRow>) -> Result<Self, CosmologyError> {
        if rows.is_empty() {
            return Err(CosmologyError::EmptyTable);
        }
        for (i, row) in rows.iter().enumerate() {
            if !(row.z.is_finite()
                && row.angular_diameter_distance.is_finite()
                && row.beta_inf.is_finite())
            {
                return Err(CosmologyError::NonFinite(i));
            }
            if i > 0 && row.z <= rows[i - 1].z {
                return Err(CosmologyError::UnorderedTable(i));
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[CosmologyRow] {
        &self.rows
    }

    fn interpolate(&self, z: f64, pick: impl Fn(&CosmologyRow) -> f64) -> f64 {
        let rows = &self.rows;
        let first = &rows[0];
        let last = &rows[rows.len() - 1];
        if z <= first.z {
            return pick(first);
        }
        if z >= last.z {
            return pick(last);
        }
        // first index with row.z > z; guaranteed in 1..len by the clamps above
        let hi = rows.partition_point(|r| r.z <= z);
        let (a, b) = (&rows[hi - 1], &rows[hi]);
        let t = (z - a.z) / (b.z - a.z);
        pick(a) + t * (pick(b) - pick(a))
    }
}

impl TryFrom<Vec<CosmologyRow>> for TabulatedCosmology {
    type Error = CosmologyError;

    fn try_from(rows: Vec<CosmologyRow>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<TabulatedCosmology> for Vec<CosmologyRow> {
    fn from(table: TabulatedCosmology) -> Self {
        table.rows
    }
}

impl Cosmology for TabulatedCosmology {
    fn angular_diameter_distance(&self, z: f64) -> f64 {
        self.interpolate(z, |r| r.angular_diameter_distance)
    }

    fn beta(&self, z_source: f64, z_lens: f64) -> f64 {
        if z_source <= z_lens {
            return 0.0;
        }
        let last = self.rows[self.rows.len() - 1].z;
        if z_source >= last {
            return self.interpolate(z_lens, |r| r.beta_inf);
        }
        let dm_source = (1.0 + z_source) * self.angular_diameter_distance(z_source);
        let dm_lens = (1.0 + z_lens) * self.angular_diameter_distance(z_lens);
        if dm_source <= 0.0 {
            return 0.0;
        }
        ((dm_source - dm_lens) / dm_source).max(0.0)
    }
}
