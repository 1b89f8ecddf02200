use std::fs;
use std::path::Path;

use halostack::config::StackConfig;
use halostack::core::Cosmology;
use halostack::io::{
    ProfileFormat, TextCatalogLoader, read_cosmology, read_stack_list, read_truth,
};
use halostack::stacking::{HaloIdPattern, ProfileAccumulator, StackError, StackingDriver};
use tempfile::tempdir;

const Z_LENS: f64 = 0.3;

fn write_catalog(path: &Path, rows: usize) {
    let mut text = format!("# zlens = {Z_LENS}\nr_mpc ghat beta_s\n");
    for i in 0..rows {
        let r = 0.1 + 2.8 * i as f64 / (rows - 1) as f64;
        text.push_str(&format!("{r} 0.5 1.0\n"));
    }
    fs::write(path, text).unwrap();
}

fn write_fixture(dir: &Path) {
    write_catalog(&dir.join("halo_cid101"), 10);
    write_catalog(&dir.join("halo_cid202"), 10);
    fs::write(
        dir.join("mxxlsnap41_answers.json"),
        r#"{"101": {"m200": 2.0e14, "concen": 4.0, "redshift": 0.3},
            "202": {"m200": 3.0e14, "concen": 6.0, "redshift": 0.3}}"#,
    )
    .unwrap();
    fs::write(
        dir.join("cosmology.json"),
        r#"[{"z": 0.1, "angular_diameter_distance": 400.0, "beta_inf": 0.9},
            {"z": 0.3, "angular_diameter_distance": 900.0, "beta_inf": 0.7},
            {"z": 0.5, "angular_diameter_distance": 1200.0, "beta_inf": 0.5}]"#,
    )
    .unwrap();
    fs::write(
        dir.join("stack.json"),
        r#"{"binning": {"type": "fixed-edge",
                        "params": {"min_radius": 0.0, "max_radius": 3.0, "num_bins": 4}},
            "simulation": "mxxlsnap41",
            "cosmology_table": "cosmology.json"}"#,
    )
    .unwrap();
    fs::write(dir.join("m1.list"), "halo_cid101 2.0e14\nhalo_cid202 3.0e14\n").unwrap();
}

fn driver(dir: &Path) -> StackingDriver {
    let config = StackConfig::from_path(dir.join("stack.json")).unwrap();
    let edges = config.stack_edges().unwrap();
    let cosmology = read_cosmology(config.cosmology_table.as_ref().unwrap()).unwrap();
    let truth = read_truth(dir.join("mxxlsnap41_answers.json")).unwrap();
    StackingDriver::new(
        ProfileAccumulator::new(edges),
        HaloIdPattern::for_simulation(config.simulation.unwrap()).unwrap(),
        Box::new(truth),
        Box::new(TextCatalogLoader::new().with_root(dir)),
        Box::new(cosmology),
    )
}

#[test]
fn two_uniform_catalogs_stack_to_constant_residual() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    let ids = read_stack_list(dir.path().join("m1.list")).unwrap();
    let out = dir.path().join("m1.csv");
    let profile = driver(dir.path())
        .run_to_file(&ids, &out, ProfileFormat::Csv)
        .unwrap();

    let cosmology = read_cosmology(dir.path().join("cosmology.json")).unwrap();
    let expected = 0.5 / cosmology.lensing_strength(Z_LENS);
    assert!((expected - 0.5 / 630.0).abs() < 1e-15);

    assert_eq!(profile.catalogs, 2);
    assert_eq!(profile.mean_redshift, Z_LENS);
    assert_eq!(profile.counts(), vec![6, 4, 4, 6]);
    for (_, bin) in profile.populated_bins() {
        assert!((bin.shear - expected).abs() <= 1e-12 * expected);
        assert!(bin.shear_variance.unwrap() < 1e-20);
        assert_eq!(bin.beta_mean, 1.0);
        assert_eq!(bin.beta2_mean, 1.0);
    }
    assert!((profile.mean_m200 - 2.5e14).abs() < 1.0);
    assert!((profile.mean_concen - 5.0).abs() < 1e-12);

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("# mean_redshift = 0.300000000000\n"));
    assert_eq!(text.lines().filter(|l| !l.starts_with('#')).count(), 5);
}

#[test]
fn unknown_halo_fails_without_output() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    write_catalog(&dir.path().join("halo_cid303"), 10);

    let out = dir.path().join("bad.json");
    let err = driver(dir.path())
        .run_to_file(["halo_cid101", "halo_cid303"], &out, ProfileFormat::Json)
        .unwrap_err();
    assert!(matches!(err, StackError::MissingTruth { halo_id: 303, .. }));
    assert!(!out.exists());
}

#[test]
fn json_output_round_trips_through_serde() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    let out = dir.path().join("m1.json");
    driver(dir.path())
        .run_to_file(["halo_cid101", "halo_cid202"], &out, ProfileFormat::Json)
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["catalogs"], 2);
    assert_eq!(v["bins"].as_array().unwrap().len(), 4);
    assert_eq!(v["edges"].as_array().unwrap().len(), 5);
}
