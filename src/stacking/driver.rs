use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Instant;

use tracing::{debug, info};

use crate::core::{Cosmology, TruthStore};
use crate::io::{CatalogLoader, ProfileFormat, write_profile};
use crate::stacking::{HaloIdPattern, ProfileAccumulator, StackError, StackProgress, StackedProfile};

/// Runs a stack: resolves each catalog's halo, folds it into the
/// accumulator and reports the final profile.
pub struct StackingDriver {
    ids: HaloIdPattern,
    truth: Box<dyn TruthStore>,
    loader: Box<dyn CatalogLoader>,
    cosmology: Box<dyn Cosmology>,
    accumulator: ProfileAccumulator,

    objects_seen: u64,
    start_time: Instant,
    progress_tx: Option<Sender<StackProgress>>,
}

impl StackingDriver {
    pub fn new(
        accumulator: ProfileAccumulator,
        ids: HaloIdPattern,
        truth: Box<dyn TruthStore>,
        loader: Box<dyn CatalogLoader>,
        cosmology: Box<dyn Cosmology>,
    ) -> Self {
        Self {
            ids,
            truth,
            loader,
            cosmology,
            accumulator,
            objects_seen: 0,
            start_time: Instant::now(),
            progress_tx: None,
        }
    }

    pub fn with_progress(mut self, tx: Sender<StackProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    #[inline]
    pub fn accumulator(&self) -> &ProfileAccumulator {
        &self.accumulator
    }

    /// Stacks one catalog. On error the aggregate is left as it was.
    pub fn process(&mut self, identifier: &str) -> Result<u64, StackError> {
        let halo_id = self.ids.resolve(identifier)?;
        let truth = *self
            .truth
            .lookup(halo_id)
            .ok_or_else(|| StackError::MissingTruth {
                halo_id,
                identifier: identifier.to_string(),
            })?;
        let catalog = self
            .loader
            .load(identifier)
            .map_err(|source| StackError::CatalogLoad {
                identifier: identifier.to_string(),
                source,
            })?;

        let binned = self
            .accumulator
            .accumulate(&catalog, &truth, self.cosmology.as_ref())
            .map_err(|e| match e {
                StackError::Catalog(source) => StackError::CatalogLoad {
                    identifier: identifier.to_string(),
                    source,
                },
                other => other,
            })?;
        self.objects_seen += binned;
        debug!(
            halo_id,
            rows = catalog.len(),
            binned,
            z_lens = catalog.z_lens(),
            "stacked {identifier}"
        );

        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(StackProgress {
                catalogs_seen: self.accumulator.catalogs(),
                objects_seen: self.objects_seen,
                last_halo: halo_id,
                seconds: self.start_time.elapsed().as_secs_f64(),
            });
        }
        Ok(binned)
    }

    /// Stacks every identifier in order; the first failure aborts the run.
    pub fn run<I, S>(&mut self, identifiers: I) -> Result<StackedProfile, StackError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.start_time = Instant::now();
        info!(
            pattern = self.ids.as_str(),
            bins = self.accumulator.edges().num_bins(),
            "stacking started"
        );
        for id in identifiers {
            self.process(id.as_ref())?;
        }
        let profile = self.accumulator.to_profile();
        info!(
            catalogs = profile.catalogs,
            objects = self.objects_seen,
            mean_redshift = profile.mean_redshift,
            seconds = self.start_time.elapsed().as_secs_f64(),
            "stacking finished"
        );
        Ok(profile)
    }

    /// Like [`run`](Self::run), then writes the profile. Nothing is written
    /// when any catalog fails.
    pub fn run_to_file<I, S, P>(
        &mut self,
        identifiers: I,
        path: P,
        fmt: ProfileFormat,
    ) -> Result<StackedProfile, StackError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        P: AsRef<Path>,
    {
        let profile = self.run(identifiers)?;
        write_profile(&profile, path.as_ref(), fmt)?;
        info!(path = %path.as_ref().display(), format = %fmt, "profile written");
        Ok(profile)
    }
}
