use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::core::{MapTruthStore, TabulatedCosmology};
use crate::io::IoError;

/// Reads an answers file: a JSON object keyed by halo id.
///
/// ```json
/// {"1234": {"m200": 2.1e14, "concen": 4.2, "redshift": 0.25}}
/// ```
pub fn read_truth<P: AsRef<Path>>(path: P) -> Result<MapTruthStore, IoError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Reads a JSON array of `(z, angular_diameter_distance, beta_inf)` rows.
pub fn read_cosmology<P: AsRef<Path>>(path: P) -> Result<TabulatedCosmology, IoError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cosmology, TruthStore};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_truth_keyed_by_halo_id() {
        let mut tf = NamedTempFile::new().unwrap();
        write!(
            tf,
            r#"{{"12": {{"m200": 2.0e14, "concen": 4.0, "redshift": 0.2}},
                 "7": {{"m200": 3.0e14, "concen": 5.0, "redshift": 0.4}}}}"#
        )
        .unwrap();
        let truth = read_truth(tf.path()).unwrap();
        assert_eq!(truth.halo_ids(), vec![7, 12]);
        assert_eq!(truth.lookup(12).unwrap().concen, 4.0);
    }

    #[test]
    fn malformed_truth_is_serialization_error() {
        let mut tf = NamedTempFile::new().unwrap();
        write!(tf, r#"{{"12": {{"m200": 2.0e14}}}}"#).unwrap();
        assert!(matches!(
            read_truth(tf.path()),
            Err(IoError::Serialization(_))
        ));
    }

    #[test]
    fn reads_and_validates_cosmology_table() {
        let mut tf = NamedTempFile::new().unwrap();
        write!(
            tf,
            r#"[{{"z": 0.1, "angular_diameter_distance": 400.0, "beta_inf": 0.9}},
                {{"z": 0.3, "angular_diameter_distance": 900.0, "beta_inf": 0.7}}]"#
        )
        .unwrap();
        let cosmo = read_cosmology(tf.path()).unwrap();
        assert!((cosmo.lensing_strength(0.3) - 630.0).abs() < 1e-9);

        let mut bad = NamedTempFile::new().unwrap();
        write!(
            bad,
            r#"[{{"z": 0.3, "angular_diameter_distance": 1.0, "beta_inf": 1.0}},
                {{"z": 0.1, "angular_diameter_distance": 1.0, "beta_inf": 1.0}}]"#
        )
        .unwrap();
        assert!(matches!(
            read_cosmology(bad.path()),
            Err(IoError::Serialization(_))
        ));
    }
}
