use crate::statistics::Estimator;

/// Sufficient statistics for the first two moments of one partition.
///
/// `m2` is the sum of squared deviations from `mean`. An empty summary has
/// `count == 0`, `mean == 0` and `m2 == 0`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BinSummary {
    pub count: u64,
    pub mean: f64,
    pub m2: f64,
}

impl BinSummary {
    pub const EMPTY: Self = Self {
        count: 0,
        mean: 0.0,
        m2: 0.0,
    };

    pub fn new(count: u64, mean: f64, m2: f64) -> Self {
        if count == 0 {
            return Self::EMPTY;
        }
        Self {
            count,
            mean,
            m2: m2.max(0.0),
        }
    }

    #[inline]
    pub fn singleton(x: f64) -> Self {
        Self::new(1, x, 0.0)
    }

    /// Two-pass summary of a raw sample.
    pub fn from_sample(xs: &[f64]) -> Self {
        if xs.is_empty() {
            return Self::EMPTY;
        }
        let n = xs.len() as f64;
        let mean = xs.iter().sum::<f64>() / n;
        let m2 = xs.iter().map(|x| (x - mean) * (x - mean)).sum();
        Self::new(xs.len() as u64, mean, m2)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn merge_in(&mut self, other: &BinSummary) {
        *self = merge(*self, *other);
    }

    /// Unbiased variance `m2 / (count - 1)`; `None` for fewer than two samples.
    pub fn variance(&self) -> Option<f64> {
        if self.count > 1 {
            Some(self.m2 / (self.count - 1) as f64)
        } else {
            None
        }
    }

    pub fn population_variance(&self) -> Option<f64> {
        if self.count > 0 {
            Some(self.m2 / self.count as f64)
        } else {
            None
        }
    }
}

impl Estimator for BinSummary {
    #[inline]
    fn add(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        self.merge_in(&BinSummary::singleton(v));
    }

    #[inline]
    fn estimation(&self) -> f64 {
        if self.count > 0 { self.mean } else { f64::NAN }
    }
}

/// Combines the statistics of two disjoint partitions.
///
/// ```text
/// n_X    = n_A + n_B
/// delta  = mean_B - mean_A
/// mean_X = mean_A + delta * n_B / n_X
/// M2_X   = M2_A + M2_B + delta^2 * n_A * n_B / n_X
/// ```
///
/// An empty side returns the other side unchanged.
pub fn merge(a: BinSummary, b: BinSummary) -> BinSummary {
    if b.count == 0 {
        return a;
    }
    if a.count == 0 {
        return b;
    }

    let n_a = a.count as f64;
    let n_b = b.count as f64;
    let count = a.count + b.count;
    let n_x = count as f64;

    let delta = b.mean - a.mean;
    let mean = a.mean + delta * n_b / n_x;
    let m2 = a.m2 + b.m2 + delta * delta * n_a * n_b / n_x;

    BinSummary { count, mean, m2 }
}

/// First-moment half of [`merge`].
pub fn merge_mean(n_a: u64, mean_a: f64, n_b: u64, mean_b: f64) -> f64 {
    if n_b == 0 {
        return mean_a;
    }
    if n_a == 0 {
        return mean_b;
    }
    let n_x = (n_a + n_b) as f64;
    mean_a + (mean_b - mean_a) * n_b as f64 / n_x
}

/// Streaming mean that absorbs whole partitions, keeping only the first moment.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunningMean {
    count: u64,
    mean: f64,
}

impl RunningMean {
    pub fn merge_partition(&mut self, count: u64, mean: f64) {
        self.mean = merge_mean(self.count, self.mean, count, mean);
        self.count += count;
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Current mean; `0.0` while empty.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }
}

impl Estimator for RunningMean {
    #[inline]
    fn add(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        self.merge_partition(1, v);
    }

    #[inline]
    fn estimation(&self) -> f64 {
        if self.count > 0 { self.mean } else { f64::NAN }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps * (1.0 + a.abs().max(b.abs()))
    }

    fn assert_summary_close(got: &BinSummary, want: &BinSummary) {
        assert_eq!(got.count, want.count);
        assert!(
            approx_eq(got.mean, want.mean, EPS),
            "mean got={}, want={}",
            got.mean,
            want.mean
        );
        assert!(
            approx_eq(got.m2, want.m2, EPS),
            "m2 got={}, want={}",
            got.m2,
            want.m2
        );
    }

    fn sample(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.random_range(-3.0..7.0)).collect()
    }

    #[test]
    fn merge_of_two_halves_matches_full_sample() {
        let xs = sample(101, 7);
        let (left, right) = xs.split_at(40);
        let merged = merge(BinSummary::from_sample(left), BinSummary::from_sample(right));
        assert_summary_close(&merged, &BinSummary::from_sample(&xs));
    }

    #[test]
    fn merge_is_order_independent_across_many_partitions() {
        let xs = sample(500, 11);
        let parts: Vec<BinSummary> = xs.chunks(37).map(BinSummary::from_sample).collect();

        let forward = parts.iter().fold(BinSummary::EMPTY, |acc, p| merge(acc, *p));
        let backward = parts
            .iter()
            .rev()
            .fold(BinSummary::EMPTY, |acc, p| merge(acc, *p));

        let mut shuffled = parts.clone();
        shuffled.swap(0, 7);
        shuffled.swap(3, 12);
        shuffled.reverse();
        shuffled.swap(1, 5);
        let mixed = shuffled
            .iter()
            .fold(BinSummary::EMPTY, |acc, p| merge(acc, *p));

        // pairwise tree reduction
        let mut level = parts.clone();
        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|c| if c.len() == 2 { merge(c[0], c[1]) } else { c[0] })
                .collect();
        }

        let direct = BinSummary::from_sample(&xs);
        assert_summary_close(&forward, &direct);
        assert_summary_close(&backward, &direct);
        assert_summary_close(&mixed, &direct);
        assert_summary_close(&level[0], &direct);
    }

    #[test]
    fn empty_partition_is_identity() {
        let s = BinSummary::new(12, 3.5, 8.25);
        assert_eq!(merge(s, BinSummary::EMPTY), s);
        assert_eq!(merge(BinSummary::EMPTY, s), s);
        assert_eq!(merge(BinSummary::EMPTY, BinSummary::EMPTY), BinSummary::EMPTY);
    }

    #[test]
    fn sequential_single_item_merges_match_two_pass() {
        let xs: Vec<f64> = (0..1000).map(|i| 1e6 + (i % 7) as f64).collect();
        let mut s = BinSummary::EMPTY;
        for &x in &xs {
            s.add(x);
        }
        assert_summary_close(&s, &BinSummary::from_sample(&xs));
    }

    #[test]
    fn variance_requires_two_samples() {
        assert!(BinSummary::EMPTY.variance().is_none());
        assert!(BinSummary::singleton(4.0).variance().is_none());

        let s = BinSummary::from_sample(&[1.0, 2.0, 3.0, 4.0]);
        assert!(approx_eq(s.variance().unwrap(), 5.0 / 3.0, EPS));
        assert!(approx_eq(s.population_variance().unwrap(), 1.25, EPS));
    }

    #[test]
    fn new_with_zero_count_is_empty() {
        assert_eq!(BinSummary::new(0, 5.0, 2.0), BinSummary::EMPTY);
    }

    #[test]
    fn estimator_ignores_nan() {
        let mut s = BinSummary::default();
        assert!(s.estimation().is_nan());
        s.add(f64::NAN);
        assert!(s.is_empty());
        s.add(2.0);
        s.add(4.0);
        assert_eq!(s.estimation(), 3.0);
    }

    #[test]
    fn merge_mean_weights_by_count() {
        assert_eq!(merge_mean(0, 0.0, 3, 2.0), 2.0);
        assert_eq!(merge_mean(3, 2.0, 0, 9.0), 2.0);
        assert!(approx_eq(merge_mean(1, 0.0, 3, 4.0), 3.0, EPS));
    }

    #[test]
    fn running_mean_absorbs_partitions() {
        let mut m = RunningMean::default();
        assert!(m.estimation().is_nan());
        assert_eq!(m.mean(), 0.0);

        m.merge_partition(2, 1.0);
        m.merge_partition(2, 3.0);
        m.add(7.0);
        assert_eq!(m.count(), 5);
        assert!(approx_eq(m.mean(), 3.0, EPS));

        m.merge_partition(0, 100.0);
        assert_eq!(m.count(), 5);
        assert!(approx_eq(m.estimation(), 3.0, EPS));
    }
}
