/// Online scalar estimator (e.g., streaming mean).
///
/// Implementations accept values incrementally via [`add`] and expose the
/// current estimate via [`estimation`].
///
/// [`add`]: Estimator::add
/// [`estimation`]: Estimator::estimation
pub trait Estimator {
    /// Incorporates a new observation. `NaN` observations are ignored.
    fn add(&mut self, v: f64);

    /// Returns the current estimate, or `NaN` before the first observation.
    fn estimation(&self) -> f64;
}
