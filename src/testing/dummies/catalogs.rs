use rand::Rng;

use crate::core::{BETA_S, Catalog, GHAT, R_MPC};

/// `n` objects at evenly spaced radii over `[lo, hi]`, all with the same
/// shear and `beta`.
pub fn uniform_catalog(
    name: &str,
    n: usize,
    lo: f64,
    hi: f64,
    shear: f64,
    beta: f64,
    z_lens: f64,
) -> Catalog {
    let radii: Vec<f64> = match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + step * i as f64).collect()
        }
    };
    Catalog::new(name, z_lens)
        .with_column(R_MPC, radii)
        .and_then(|c| c.with_column(GHAT, vec![shear; n]))
        .and_then(|c| c.with_column(BETA_S, vec![beta; n]))
        .unwrap_or_else(|e| panic!("uniform catalog: {e}"))
}

/// `n` objects with radii uniform on `[lo, hi)` and shear uniform on
/// `[-spread, spread)`, `beta = 1`.
pub fn random_catalog<R: Rng>(
    name: &str,
    n: usize,
    lo: f64,
    hi: f64,
    spread: f64,
    z_lens: f64,
    rng: &mut R,
) -> Catalog {
    let radii: Vec<f64> = (0..n).map(|_| rng.random_range(lo..hi)).collect();
    let shear: Vec<f64> = (0..n).map(|_| rng.random_range(-spread..spread)).collect();
    Catalog::new(name, z_lens)
        .with_column(R_MPC, radii)
        .and_then(|c| c.with_column(GHAT, shear))
        .and_then(|c| c.with_column(BETA_S, vec![1.0; n]))
        .unwrap_or_else(|e| panic!("random catalog: {e}"))
}
