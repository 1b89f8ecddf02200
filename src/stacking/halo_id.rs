use std::path::Path;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::core::HaloId;
use crate::stacking::StackError;

/// Simulation families with a known catalog naming scheme.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SimulationKind {
    MxxlSnap41,
    MxxlSnap54,
    Bcc,
    Bk11Snap141,
    Bk11Snap124,
}

impl SimulationKind {
    pub fn id_pattern(&self) -> &'static str {
        match self {
            SimulationKind::MxxlSnap41 | SimulationKind::MxxlSnap54 => r"halo_cid(\d+)",
            SimulationKind::Bcc => r"cluster_(\d+)\.hdf5",
            SimulationKind::Bk11Snap141 | SimulationKind::Bk11Snap124 => r"haloid(\d+)_zLens.+",
        }
    }

    /// Catalog file name for a halo, with `{id}` standing for the halo id.
    ///
    /// Bk11 names also encode the lens redshift, so they have no template.
    pub fn catalog_template(&self) -> Option<&'static str> {
        match self {
            SimulationKind::MxxlSnap41 | SimulationKind::MxxlSnap54 => Some("halo_cid{id}"),
            SimulationKind::Bcc => Some("cluster_{id}.hdf5"),
            SimulationKind::Bk11Snap141 | SimulationKind::Bk11Snap124 => None,
        }
    }

    /// Light-cone simulations spread halos over redshift and stack per
    /// redshift slice; snapshots share one redshift.
    pub fn bins_by_redshift(&self) -> bool {
        matches!(self, SimulationKind::Bcc)
    }

    /// Family named by an answers file, e.g. `mxxlsnap41_answers.json`.
    pub fn from_answer_file<P: AsRef<Path>>(path: P) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_str()?;
        let (prefix, rest) = name.rsplit_once("_answers")?;
        if !(rest.is_empty() || rest.starts_with('.')) {
            return None;
        }
        prefix.parse().ok()
    }
}

/// Extracts a halo id from a catalog file name.
///
/// The pattern must match at the start of the file name and capture the
/// numeric id in its first group.
#[derive(Debug, Clone)]
pub struct HaloIdPattern {
    source: String,
    regex: Regex,
}

impl HaloIdPattern {
    pub fn new(pattern: &str) -> Result<Self, StackError> {
        let regex = Regex::new(&format!("^(?:{pattern})"))
            .map_err(|e| StackError::InvalidPattern(e.to_string()))?;
        if regex.captures_len() < 2 {
            return Err(StackError::InvalidPattern(format!(
                "'{pattern}' has no capture group for the halo id"
            )));
        }
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn for_simulation(kind: SimulationKind) -> Result<Self, StackError> {
        Self::new(kind.id_pattern())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn resolve(&self, identifier: &str) -> Result<HaloId, StackError> {
        let unmatched = || StackError::UnmatchedIdentifier {
            identifier: identifier.to_string(),
            pattern: self.source.clone(),
        };
        let file_name = Path::new(identifier)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(identifier);
        let caps = self.regex.captures(file_name).ok_or_else(unmatched)?;
        caps.get(1)
            .and_then(|m| m.as_str().parse::<HaloId>().ok())
            .ok_or_else(unmatched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn builtin_patterns_resolve_ids() {
        let mxxl = HaloIdPattern::for_simulation(SimulationKind::MxxlSnap41).unwrap();
        assert_eq!(mxxl.resolve("/vol/mxxl/snap41/halo_cid1234").unwrap(), 1234);

        let bcc = HaloIdPattern::for_simulation(SimulationKind::Bcc).unwrap();
        assert_eq!(bcc.resolve("recentered/cluster_77.hdf5").unwrap(), 77);

        let bk = HaloIdPattern::for_simulation(SimulationKind::Bk11Snap141).unwrap();
        assert_eq!(
            bk.resolve("haloid905_zLens0.24533000_intlength400.fit").unwrap(),
            905
        );
    }

    #[test]
    fn match_is_anchored_at_file_name_start() {
        let bcc = HaloIdPattern::for_simulation(SimulationKind::Bcc).unwrap();
        assert!(matches!(
            bcc.resolve("old_cluster_77.hdf5"),
            Err(StackError::UnmatchedIdentifier { .. })
        ));
        assert!(bcc.resolve("cluster_77.fits").is_err());
    }

    #[test]
    fn every_builtin_pattern_compiles() {
        for kind in SimulationKind::iter() {
            assert!(HaloIdPattern::new(kind.id_pattern()).is_ok(), "{kind}");
        }
    }

    #[test]
    fn templates_round_trip_through_patterns() {
        for kind in SimulationKind::iter() {
            let Some(template) = kind.catalog_template() else {
                continue;
            };
            let name = template.replace("{id}", "314");
            let pattern = HaloIdPattern::for_simulation(kind).unwrap();
            assert_eq!(pattern.resolve(&name).unwrap(), 314, "{kind}");
        }
    }

    #[test]
    fn custom_patterns_need_a_capture_group() {
        assert!(matches!(
            HaloIdPattern::new(r"halo_\d+"),
            Err(StackError::InvalidPattern(_))
        ));
        assert!(matches!(
            HaloIdPattern::new(r"halo_(\d+"),
            Err(StackError::InvalidPattern(_))
        ));
        let p = HaloIdPattern::new(r"h(\d+)\.txt").unwrap();
        assert_eq!(p.resolve("h42.txt").unwrap(), 42);
        assert_eq!(p.as_str(), r"h(\d+)\.txt");
    }

    #[test]
    fn simulation_from_answer_file_name() {
        assert_eq!(
            SimulationKind::from_answer_file("data/mxxlsnap54_answers.json"),
            Some(SimulationKind::MxxlSnap54)
        );
        assert_eq!(
            SimulationKind::from_answer_file("bk11snap124_answers.pkl"),
            Some(SimulationKind::Bk11Snap124)
        );
        assert_eq!(SimulationKind::from_answer_file("answers.json"), None);
        assert_eq!(SimulationKind::from_answer_file("sdss_answers.json"), None);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SimulationKind::Bk11Snap141).unwrap(),
            "\"bk11snap141\""
        );
        assert_eq!(SimulationKind::MxxlSnap41.to_string(), "mxxlsnap41");
    }
}
