use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type HaloId = u64;

/// Simulated ground truth for one halo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruthRecord {
    pub m200: f64,
    pub concen: f64,
    pub redshift: f64,
}

/// Read-only lookup of halo truth, scoped to one stacking run.
pub trait TruthStore {
    fn lookup(&self, halo_id: HaloId) -> Option<&TruthRecord>;

    /// All known halo ids in ascending order.
    fn halo_ids(&self) -> Vec<HaloId>;
}

/// Truth table held in memory, e.g. deserialized from an answers file.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapTruthStore {
    records: BTreeMap<HaloId, TruthRecord>,
}

impl MapTruthStore {
    pub fn insert(&mut self, halo_id: HaloId, record: TruthRecord) -> Option<TruthRecord> {
        self.records.insert(halo_id, record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HaloId, &TruthRecord)> {
        self.records.iter().map(|(id, r)| (*id, r))
    }
}

impl FromIterator<(HaloId, TruthRecord)> for MapTruthStore {
    fn from_iter<I: IntoIterator<Item = (HaloId, TruthRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl TruthStore for MapTruthStore {
    fn lookup(&self, halo_id: HaloId) -> Option<&TruthRecord> {
        self.records.get(&halo_id)
    }

    fn halo_ids(&self) -> Vec<HaloId> {
        self.records.keys().copied().collect()
    }
}
