use std::fmt::{Display, Formatter, Result};

use crate::core::HaloId;

/// Progress of a stacking run, sent after each catalog.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StackProgress {
    pub catalogs_seen: u64,
    pub objects_seen: u64,
    pub last_halo: HaloId,
    pub seconds: f64,
}

impl Display for StackProgress {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "catalogs={}, objects={}, halo={}, t={:.3}s",
            self.catalogs_seen, self.objects_seen, self.last_halo, self.seconds
        )
    }
}
