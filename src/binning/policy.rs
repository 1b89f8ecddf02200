use crate::binning::BinningError;
use crate::core::{Catalog, GHAT, R_MPC};

/// Per-bin summary of one catalog, ordered by increasing radius.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinnedProfile {
    pub radii: Vec<f64>,
    pub values: Vec<f64>,
    pub errors: Vec<f64>,
    pub counts: Vec<usize>,
}

impl BinnedProfile {
    pub fn push(&mut self, radius: f64, value: f64, error: f64, count: usize) {
        self.radii.push(radius);
        self.values.push(value);
        self.errors.push(error);
        self.counts.push(count);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }
}

/// Strategy turning a catalog into radial bin centers, values and errors.
///
/// Implementations validate their configuration when constructed, never
/// mutate the catalog, and return an empty profile for an empty catalog.
pub trait BinningPolicy: Send + Sync {
    /// Short kebab-case name used in logs.
    fn name(&self) -> &'static str;

    fn bin(&self, catalog: &Catalog) -> Result<BinnedProfile, BinningError>;
}

/// Which columns a policy reads and the `[min_radius, max_radius)` window it
/// keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialSelection {
    radial_column: String,
    shear_column: String,
    min_radius: f64,
    max_radius: f64,
}

impl RadialSelection {
    pub fn new(min_radius: f64, max_radius: f64) -> Result<Self, BinningError> {
        Self::with_columns(R_MPC, GHAT, min_radius, max_radius)
    }

    pub fn with_columns<R: Into<String>, S: Into<String>>(
        radial_column: R,
        shear_column: S,
        min_radius: f64,
        max_radius: f64,
    ) -> Result<Self, BinningError> {
        if min_radius.is_nan() || max_radius.is_nan() || min_radius >= max_radius {
            return Err(BinningError::invalid(format!(
                "radial window must satisfy min < max, got [{min_radius}, {max_radius})"
            )));
        }
        let radial_column = radial_column.into();
        let shear_column = shear_column.into();
        if radial_column.is_empty() || shear_column.is_empty() {
            return Err(BinningError::invalid("column names must not be empty"));
        }
        Ok(Self {
            radial_column,
            shear_column,
            min_radius,
            max_radius,
        })
    }

    #[inline]
    pub fn radial_column(&self) -> &str {
        &self.radial_column
    }

    #[inline]
    pub fn shear_column(&self) -> &str {
        &self.shear_column
    }

    #[inline]
    pub fn min_radius(&self) -> f64 {
        self.min_radius
    }

    #[inline]
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    pub fn apply(&self, catalog: &Catalog) -> Result<Catalog, BinningError> {
        Ok(catalog.in_range(&self.radial_column, self.min_radius, self.max_radius)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_validates_window() {
        assert!(RadialSelection::new(0.0, 2000.0).is_ok());
        assert!(RadialSelection::new(1.0, 1.0).is_err());
        assert!(RadialSelection::new(f64::NAN, 1.0).is_err());
        assert!(RadialSelection::with_columns("", GHAT, 0.0, 1.0).is_err());
        assert!(RadialSelection::with_columns(R_MPC, GHAT, 5.0, 1.0).is_err());

        let sel = RadialSelection::with_columns("r_arcmin", "g_t", 0.5, 8.0).unwrap();
        assert_eq!(sel.radial_column(), "r_arcmin");
        assert_eq!(sel.shear_column(), "g_t");
        assert_eq!((sel.min_radius(), sel.max_radius()), (0.5, 8.0));
    }

    #[test]
    fn selection_keeps_half_open_window() {
        let cat = Catalog::new("c", 0.2)
            .with_column(R_MPC, vec![0.0, 0.5, 1.0, 1.5])
            .unwrap();
        let sel = RadialSelection::new(0.0, 1.0).unwrap().apply(&cat).unwrap();
        assert_eq!(sel.column(R_MPC).unwrap(), &[0.0, 0.5]);
    }
}
