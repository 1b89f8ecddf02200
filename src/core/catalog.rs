use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::core::CatalogError;

/// Projected radius from the halo center, in Mpc.
pub const R_MPC: &str = "r_mpc";
/// Per-object reduced shear estimate.
pub const GHAT: &str = "ghat";
/// Per-object lensing efficiency `beta`.
pub const BETA_S: &str = "beta_s";
/// Per-object `beta^2`; derived from [`BETA_S`] when absent.
pub const BETA_S2: &str = "beta_s2";

/// Columnar table of per-object lensing measurements for one halo.
///
/// Every column holds exactly [`len`](Catalog::len) values. Selection
/// methods return new catalogs and leave `self` untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    name: String,
    z_lens: f64,
    columns: BTreeMap<String, Vec<f64>>,
    len: usize,
}

/// Borrowed view of one catalog row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    catalog: &'a Catalog,
    index: usize,
}

impl<'a> Row<'a> {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.catalog.column(column).map(|c| c[self.index])
    }
}

impl Catalog {
    pub fn new<N: Into<String>>(name: N, z_lens: f64) -> Self {
        Self {
            name: name.into(),
            z_lens,
            columns: BTreeMap::new(),
            len: 0,
        }
    }

    /// Adds (or replaces) a column. The first column fixes the row count.
    pub fn with_column<N: Into<String>>(
        mut self,
        name: N,
        values: Vec<f64>,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        let replacing_only_column = self.columns.len() == 1 && self.columns.contains_key(&name);
        if !self.columns.is_empty() && !replacing_only_column && values.len() != self.len {
            return Err(CatalogError::ColumnLength {
                column: name,
                expected: self.len,
                found: values.len(),
            });
        }
        self.len = values.len();
        self.columns.insert(name, values);
        Ok(self)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn z_lens(&self) -> f64 {
        self.z_lens
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn require(&self, name: &str) -> Result<&[f64], CatalogError> {
        self.column(name)
            .ok_or_else(|| CatalogError::MissingColumn(name.to_string()))
    }

    /// `beta^2` per row: the stored [`BETA_S2`] column, or [`BETA_S`] squared.
    pub fn beta_squared(&self) -> Result<Cow<'_, [f64]>, CatalogError> {
        if let Some(b2) = self.column(BETA_S2) {
            return Ok(Cow::Borrowed(b2));
        }
        let beta = self.require(BETA_S)?;
        Ok(Cow::Owned(beta.iter().map(|b| b * b).collect()))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.len).map(move |index| Row {
            catalog: self,
            index,
        })
    }

    /// New catalog holding `indices` in the given order.
    pub fn select(&self, indices: &[usize]) -> Catalog {
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), indices.iter().map(|&i| values[i]).collect()))
            .collect();
        Catalog {
            name: self.name.clone(),
            z_lens: self.z_lens,
            columns,
            len: indices.len(),
        }
    }

    /// Keeps the rows for which `keep` returns true, preserving their order.
    pub fn filter<F>(&self, mut keep: F) -> Catalog
    where
        F: FnMut(Row<'_>) -> bool,
    {
        let indices: Vec<usize> = self
            .rows()
            .filter(|row| keep(*row))
            .map(|row| row.index)
            .collect();
        self.select(&indices)
    }

    /// Rows with `lo <= column < hi`.
    pub fn in_range(&self, column: &str, lo: f64, hi: f64) -> Result<Catalog, CatalogError> {
        let values = self.require(column)?;
        let indices: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| lo <= v && v < hi)
            .map(|(i, _)| i)
            .collect();
        Ok(self.select(&indices))
    }

    /// Stable ascending sort on `column`; `NaN`s go last.
    pub fn sorted_by(&self, column: &str) -> Result<Catalog, CatalogError> {
        let values = self.require(column)?;
        let mut indices: Vec<usize> = (0..self.len).collect();
        indices.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        Ok(self.select(&indices))
    }
}
