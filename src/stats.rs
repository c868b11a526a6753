//! Numerically stable accumulation for ensemble averages.
//!
//! # Algorithms
//!
//! - **Summation**: Kahan-Babuška (Neumaier) compensated summation.
//! - **Mean/Variance**: Welford's online algorithm, with Chan's pairwise
//!   merge so per-thread accumulators can be combined.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).

/// Kahan-Babuška (Neumaier) compensated sum.
///
/// Unlike plain Kahan summation, this also handles the case where the
/// addend is larger in magnitude than the running sum.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Examples
/// ```
/// use site_percolation::stats::kahan_sum;
/// assert_eq!(kahan_sum([1e100, 1.0, -1e100]), 1.0);
/// ```
pub fn kahan_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for x in values {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

/// Streaming accumulator for mean and variance.
///
/// # Examples
/// ```
/// use site_percolation::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.sample_variance().unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

impl WelfordAccumulator {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean_acc: 0.0,
            m2: 0.0,
        }
    }

    /// Feeds a new sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    /// Returns the number of samples seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the running mean, or `None` if no samples have been added.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean_acc)
        }
    }

    /// Returns the sample variance (n − 1 denominator), or `None` if fewer
    /// than 2 samples have been added.
    pub fn sample_variance(&self) -> Option<f64> {
        if self.count < 2 {
            None
        } else {
            Some(self.m2 / (self.count - 1) as f64)
        }
    }

    /// Returns the sample standard deviation, or `None` if fewer than 2
    /// samples have been added.
    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    /// Merges another accumulator into this one.
    ///
    /// Reference: Chan, Golub & LeVeque (1979), "Updating Formulae and a
    /// Pairwise Algorithm for Computing Sample Variances".
    pub fn merge(&mut self, other: &WelfordAccumulator) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }
        let na = self.count as f64;
        let nb = other.count as f64;
        let total = self.count + other.count;
        let n = total as f64;
        let delta = other.mean_acc - self.mean_acc;

        self.mean_acc += delta * (nb / n);
        self.m2 += other.m2 + delta * delta * na * nb / n;
        self.count = total;
    }
}

impl Default for WelfordAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kahan_sum_empty() {
        assert_eq!(kahan_sum(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_kahan_sum_many_small() {
        let s = kahan_sum(std::iter::repeat(0.1).take(10));
        assert!((s - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_welford_empty() {
        let acc = WelfordAccumulator::new();
        assert_eq!(acc.count(), 0);
        assert!(acc.mean().is_none());
        assert!(acc.sample_variance().is_none());
    }

    #[test]
    fn test_welford_single() {
        let mut acc = WelfordAccumulator::new();
        acc.update(3.5);
        assert_eq!(acc.mean(), Some(3.5));
        assert!(acc.sample_variance().is_none());
    }

    #[test]
    fn test_welford_constant() {
        let mut acc = WelfordAccumulator::default();
        for _ in 0..10 {
            acc.update(0.25);
        }
        assert!((acc.mean().unwrap() - 0.25).abs() < 1e-15);
        assert!(acc.sample_variance().unwrap().abs() < 1e-15);
    }

    #[test]
    fn test_welford_merge_with_empty() {
        let mut a = WelfordAccumulator::new();
        let mut b = WelfordAccumulator::new();
        b.update(1.0);
        b.update(2.0);
        a.merge(&b);
        assert_eq!(a, b);
        a.merge(&WelfordAccumulator::new());
        assert_eq!(a, b);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn merge_matches_sequential(
            xs in proptest::collection::vec(0.0_f64..1.0, 0..50),
            ys in proptest::collection::vec(0.0_f64..1.0, 0..50),
        ) {
            let mut seq = WelfordAccumulator::new();
            let mut a = WelfordAccumulator::new();
            let mut b = WelfordAccumulator::new();
            for &x in &xs {
                seq.update(x);
                a.update(x);
            }
            for &y in &ys {
                seq.update(y);
                b.update(y);
            }
            a.merge(&b);
            prop_assert_eq!(a.count(), seq.count());
            if let (Some(m1), Some(m2)) = (a.mean(), seq.mean()) {
                prop_assert!((m1 - m2).abs() < 1e-12);
            }
            if let (Some(v1), Some(v2)) = (a.sample_variance(), seq.sample_variance()) {
                prop_assert!((v1 - v2).abs() < 1e-10);
            }
        }
    }
}
