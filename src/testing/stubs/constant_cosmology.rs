use crate::core::Cosmology;

/// Same distance and source efficiency at every redshift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantCosmology {
    pub angular_diameter_distance: f64,
    pub beta: f64,
}

impl ConstantCosmology {
    pub fn new(angular_diameter_distance: f64, beta: f64) -> Self {
        Self {
            angular_diameter_distance,
            beta,
        }
    }
}

impl Cosmology for ConstantCosmology {
    fn angular_diameter_distance(&self, _z: f64) -> f64 {
        self.angular_diameter_distance
    }

    fn beta(&self, z_source: f64, z_lens: f64) -> f64 {
        if z_source > z_lens { self.beta } else { 0.0 }
    }
}
