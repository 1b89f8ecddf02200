use std::collections::HashMap;
use std::io::{Error, ErrorKind};

use crate::core::{Catalog, CatalogError};
use crate::io::CatalogLoader;

/// Serves catalogs from memory by exact identifier.
#[derive(Debug, Clone, Default)]
pub struct VecCatalogLoader {
    catalogs: HashMap<String, Catalog>,
}

impl VecCatalogLoader {
    pub fn with<S: Into<String>>(mut self, identifier: S, catalog: Catalog) -> Self {
        self.catalogs.insert(identifier.into(), catalog);
        self
    }
}

impl CatalogLoader for VecCatalogLoader {
    fn load(&self, identifier: &str) -> Result<Catalog, CatalogError> {
        self.catalogs.get(identifier).cloned().ok_or_else(|| {
            CatalogError::Io(Error::new(
                ErrorKind::NotFound,
                format!("no catalog '{identifier}'"),
            ))
        })
    }
}
