use serde::Serialize;
use tracing::trace;

use crate::binning::BinEdges;
use crate::core::{HaloId, TruthStore};
use crate::statistics::{Estimator, RunningMean};

/// Mass bin edges in solar masses used for the standard simulation stacks.
pub const DEFAULT_MASS_EDGES: [f64; 5] = [0.0, 2.2e14, 2.6e14, 3.2e14, 1e16];

/// Redshift bin edges for light-cone simulations.
pub const DEFAULT_REDSHIFT_EDGES: [f64; 4] = [0.0, 0.4, 0.6, 1.0];

/// Halos sharing one mass bin, and one redshift bin when binning by redshift.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackAssignment {
    pub mass_bin: usize,
    pub redshift_bin: Option<usize>,
    pub halo_ids: Vec<HaloId>,
    pub mean_m200: f64,
    pub mean_concen: f64,
    pub mean_redshift: f64,
}

impl StackAssignment {
    /// Short name such as `m2` or `z0_m2`.
    pub fn label(&self) -> String {
        match self.redshift_bin {
            Some(z) => format!("z{z}_m{}", self.mass_bin),
            None => format!("m{}", self.mass_bin),
        }
    }
}

#[derive(Default)]
struct StackBuilder {
    halo_ids: Vec<HaloId>,
    m200: RunningMean,
    concen: RunningMean,
    redshift: RunningMean,
}

/// Partitions every halo of `truth` into `[edge_i, edge_i+1)` mass bins,
/// crossed with redshift bins when `redshift_edges` is given.
///
/// Stacks come out redshift-major, then by mass. Empty stacks are kept with
/// NaN means; halos outside the edges are left out.
pub fn assign_stacks(
    truth: &dyn TruthStore,
    mass_edges: &BinEdges,
    redshift_edges: Option<&BinEdges>,
) -> Vec<StackAssignment> {
    let n_mass = mass_edges.num_bins();
    let n_z = redshift_edges.map_or(1, BinEdges::num_bins);
    let mut stacks: Vec<StackBuilder> = (0..n_mass * n_z).map(|_| StackBuilder::default()).collect();

    for id in truth.halo_ids() {
        let Some(record) = truth.lookup(id) else {
            continue;
        };
        let Some(m) = mass_edges.bin_index(record.m200) else {
            trace!(halo_id = id, m200 = record.m200, "halo outside mass edges");
            continue;
        };
        let z = match redshift_edges {
            Some(edges) => match edges.bin_index(record.redshift) {
                Some(z) => z,
                None => {
                    trace!(halo_id = id, z = record.redshift, "halo outside redshift edges");
                    continue;
                }
            },
            None => 0,
        };
        let stack = &mut stacks[z * n_mass + m];
        stack.halo_ids.push(id);
        stack.m200.add(record.m200);
        stack.concen.add(record.concen);
        stack.redshift.add(record.redshift);
    }

    stacks
        .into_iter()
        .enumerate()
        .map(|(i, s)| StackAssignment {
            mass_bin: i % n_mass,
            redshift_bin: redshift_edges.map(|_| i / n_mass),
            halo_ids: s.halo_ids,
            mean_m200: s.m200.estimation(),
            mean_concen: s.concen.estimation(),
            mean_redshift: s.redshift.estimation(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MapTruthStore, TruthRecord};

    fn store() -> MapTruthStore {
        [
            (1, 1.0e14, 0.2),
            (2, 2.3e14, 0.5),
            (3, 2.4e14, 0.3),
            (4, 5.0e14, 0.7),
            (5, 2.0e16, 0.3),
            (6, 3.0e14, 1.2),
        ]
        .into_iter()
        .map(|(id, m200, redshift)| {
            (
                id,
                TruthRecord {
                    m200,
                    concen: 4.0,
                    redshift,
                },
            )
        })
        .collect()
    }

    #[test]
    fn mass_only_stacks() {
        let edges = BinEdges::from_edges(DEFAULT_MASS_EDGES.to_vec()).unwrap();
        let stacks = assign_stacks(&store(), &edges, None);
        assert_eq!(stacks.len(), 4);
        assert_eq!(stacks[0].halo_ids, vec![1]);
        assert_eq!(stacks[1].halo_ids, vec![2, 3]);
        assert_eq!(stacks[2].halo_ids, vec![6]);
        assert_eq!(stacks[3].halo_ids, vec![4]);
        assert!((stacks[1].mean_m200 - 2.35e14).abs() < 1.0);
        assert!((stacks[1].mean_redshift - 0.4).abs() < 1e-12);
        assert_eq!(stacks[1].label(), "m1");
    }

    #[test]
    fn redshift_crossed_stacks_are_redshift_major() {
        let mass = BinEdges::from_edges(DEFAULT_MASS_EDGES.to_vec()).unwrap();
        let z = BinEdges::from_edges(DEFAULT_REDSHIFT_EDGES.to_vec()).unwrap();
        let stacks = assign_stacks(&store(), &mass, Some(&z));
        assert_eq!(stacks.len(), 12);

        let find = |zb: usize, mb: usize| {
            stacks
                .iter()
                .find(|s| s.redshift_bin == Some(zb) && s.mass_bin == mb)
                .unwrap()
        };
        assert_eq!(find(0, 0).halo_ids, vec![1]);
        assert_eq!(find(0, 1).halo_ids, vec![3]);
        assert_eq!(find(1, 1).halo_ids, vec![2]);
        assert_eq!(find(2, 3).halo_ids, vec![4]);
        assert_eq!(stacks[4].label(), "z1_m0");

        let placed: usize = stacks.iter().map(|s| s.halo_ids.len()).sum();
        assert_eq!(placed, 4);
    }

    #[test]
    fn empty_stacks_have_nan_means() {
        let edges = BinEdges::from_edges(vec![0.0, 1.0e13, 1.0e14]).unwrap();
        let stacks = assign_stacks(&store(), &edges, None);
        assert!(stacks[0].halo_ids.is_empty());
        assert!(stacks[0].mean_m200.is_nan());
        assert!(stacks[1].halo_ids.is_empty());
    }
}
