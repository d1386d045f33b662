//! Fixed-vs-random timing leakage assessment.
//!
//! Execution times of two input classes are accumulated with Welford's
//! online algorithm and compared by Welch's t-test. A `|t|` above
//! [`TVLA_THRESHOLD`] is taken as evidence of a timing dependence on the
//! input class.

use std::time::{Duration, Instant};

use tracing::debug;

/// Conventional TVLA pass/fail bound on `|t|`.
pub const TVLA_THRESHOLD: f64 = 4.5;

/// Running mean and variance of a sample stream.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Welford {
    count: u64,
    mean: f64,
    m2: f64,
}

impl Welford {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    pub fn update(&mut self, sample: f64) {
        self.count += 1;
        let delta = sample - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (sample - self.mean);
    }

    #[inline]
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance; `None` below two samples.
    #[must_use]
    pub fn variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }

    #[must_use]
    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }
}

impl Extend<f64> for Welford {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for sample in iter {
            self.update(sample);
        }
    }
}

/// Welch's t-statistic of `a` against `b`.
///
/// `None` if either side has fewer than two samples or both have zero
/// variance.
#[must_use]
pub fn welch_t(a: &Welford, b: &Welford) -> Option<f64> {
    let (var_a, var_b) = (a.variance()?, b.variance()?);
    let den = (var_a / a.count as f64 + var_b / b.count as f64).sqrt();
    if den == 0.0 {
        return None;
    }
    Some((a.mean - b.mean) / den)
}

/// Timing samples for a fixed input class and a random input class.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingTest {
    fixed: Welford,
    random: Welford,
}

impl TimingTest {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fixed: Welford::new(),
            random: Welford::new(),
        }
    }

    pub fn record_fixed(&mut self, elapsed: Duration) {
        self.fixed.update(elapsed.as_nanos() as f64);
    }

    pub fn record_random(&mut self, elapsed: Duration) {
        self.random.update(elapsed.as_nanos() as f64);
    }

    /// Time `f` and record it in the fixed class.
    pub fn measure_fixed<T>(&mut self, f: impl FnOnce() -> T) -> T {
        let (out, elapsed) = timed(f);
        self.record_fixed(elapsed);
        out
    }

    /// Time `f` and record it in the random class.
    pub fn measure_random<T>(&mut self, f: impl FnOnce() -> T) -> T {
        let (out, elapsed) = timed(f);
        self.record_random(elapsed);
        out
    }

    #[inline]
    #[must_use]
    pub const fn fixed(&self) -> &Welford {
        &self.fixed
    }

    #[inline]
    #[must_use]
    pub const fn random(&self) -> &Welford {
        &self.random
    }

    #[must_use]
    pub fn t_statistic(&self) -> Option<f64> {
        welch_t(&self.fixed, &self.random)
    }

    /// `true` unless `|t|` exceeds [`TVLA_THRESHOLD`]. A statistic that
    /// cannot be computed counts as a pass.
    #[must_use]
    pub fn passes(&self) -> bool {
        let t = self.t_statistic();
        debug!(
            fixed = self.fixed.count,
            random = self.random.count,
            t = ?t,
            "timing t-test"
        );
        t.is_none_or(|t| t.abs() <= TVLA_THRESHOLD)
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = core::hint::black_box(f());
    (out, start.elapsed())
}
