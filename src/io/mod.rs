//! File formats read and written around a stacking run.

mod catalog_loader;
mod error;
mod profile_writer;
mod stack_list;
mod tables;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

pub use catalog_loader::{CatalogLoader, TextCatalogLoader, ZLENS_KEY};
pub use error::IoError;
pub use profile_writer::{ProfileFormat, write_binned_profile, write_profile};
pub use stack_list::{
    HALO_ID_PLACEHOLDER, catalog_path, read_stack_list, write_assignments, write_stack_list,
};
pub use tables::{read_cosmology, read_truth};

/// Replaces `path` with `contents` via a temporary file in the same directory,
/// so readers never observe a partial write.
pub(crate) fn replace_file(path: &Path, contents: &[u8]) -> Result<(), IoError> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
