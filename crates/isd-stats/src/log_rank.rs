//! Two-sample log-rank test
//!
//! Compares the survival distributions of two samples using the at-risk and
//! event counts at every distinct event time. Ties are handled the standard
//! way: all events and censorings that share a timestamp are resolved
//! simultaneously using the counts at that timestamp.
//!
//! The reported `p` is the upper tail of the standard normal at `|Z|`
//! (`1 - Φ(|Z|)`). [`LogRankStatistic::two_sided_p`] doubles it.

use crate::{normal, survival::Observation};

/// Result of a two-sample log-rank test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRankStatistic {
    /// Observed events in the first sample.
    pub observed: f64,
    /// Expected events in the first sample under the null hypothesis.
    pub expected: f64,
    /// Hypergeometric variance of `observed - expected`.
    pub variance: f64,
    /// Standardized statistic, `0.0` when the variance is zero.
    pub z: f64,
    /// `1 - Φ(|z|)`.
    pub p: f64,
}

impl LogRankStatistic {
    /// Compares `first` against `second`.
    ///
    /// # Examples
    ///
    /// ```
    /// use isd_stats::{log_rank::LogRankStatistic, survival::Observation};
    ///
    /// let a = [1.0, 2.0, 3.0].map(|t| Observation::new(t, true));
    /// let result = LogRankStatistic::compute(&a, &a);
    /// assert_eq!(result.z, 0.0);
    /// assert!((result.two_sided_p() - 1.0).abs() < 1e-6);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn compute(first: &[Observation], second: &[Observation]) -> Self {
        let first = SortedSample::new(first);
        let second = SortedSample::new(second);

        let mut times = first
            .times()
            .chain(second.times())
            .collect::<Vec<_>>();
        times.sort_by(f64::total_cmp);
        times.dedup_by(|a, b| a.total_cmp(b).is_eq());

        let mut observed = 0.0;
        let mut expected = 0.0;
        let mut variance = 0.0;

        for t in times {
            let (n1, e1) = first.counts_at(t);
            let (n2, e2) = second.counts_at(t);
            let d = e1 + e2;
            if d == 0 {
                continue;
            }
            let n = (n1 + n2) as f64;
            let (n1, n2, d) = (n1 as f64, n2 as f64, d as f64);

            observed += e1 as f64;
            expected += n1 * d / n;
            variance += n1 * n2 * d * (n - d) / (n * n) / (n - 1.0).max(1.0);
        }

        let z = if variance > 0.0 {
            (observed - expected) / variance.sqrt()
        } else {
            0.0
        };
        let p = normal::upper_tail(z.abs());

        Self {
            observed,
            expected,
            variance,
            z,
            p,
        }
    }

    /// Two-sided p-value, `2 * (1 - Φ(|z|))` capped at 1.
    #[must_use]
    pub fn two_sided_p(&self) -> f64 {
        (2.0 * self.p).min(1.0)
    }
}

/// Observations sorted by time, for at-risk/event lookups by binary search.
struct SortedSample {
    data: Vec<Observation>,
}

impl SortedSample {
    fn new(data: &[Observation]) -> Self {
        let mut data = data.to_vec();
        data.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { data }
    }

    fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().map(|o| o.time)
    }

    /// Returns `(at_risk, events)` at `time`: the number of observations with
    /// `time >= t`, and the number of events exactly at `t`.
    fn counts_at(&self, time: f64) -> (usize, usize) {
        let start = self.data.partition_point(|o| o.time.total_cmp(&time).is_lt());
        let end = self.data.partition_point(|o| o.time.total_cmp(&time).is_le());
        let at_risk = self.data.len() - start;
        let events = self.data[start..end].iter().filter(|o| o.event).count();
        (at_risk, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(data: &[(f64, bool)]) -> Vec<Observation> {
        data.iter().map(|&(t, e)| Observation::new(t, e)).collect()
    }

    #[test]
    fn test_identical_samples() {
        let a = obs(&[(1.0, true), (2.0, false), (3.0, true), (5.0, true)]);
        let result = LogRankStatistic::compute(&a, &a);
        assert!(result.z.abs() < 1e-12);
        assert!((result.p - 0.5).abs() < 1e-7);
        assert!((result.two_sided_p() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_swap_flips_sign_only() {
        let a = obs(&[(1.0, true), (2.0, true), (3.0, true), (4.0, false)]);
        let b = obs(&[(3.0, true), (5.0, true), (6.0, false), (8.0, true)]);
        let ab = LogRankStatistic::compute(&a, &b);
        let ba = LogRankStatistic::compute(&b, &a);
        assert!(ab.z > 0.0, "earlier events in `a` should give positive Z");
        assert!((ab.z + ba.z).abs() < 1e-12);
        assert!((ab.p - ba.p).abs() < 1e-12);
    }

    #[test]
    fn test_hand_computed_statistic() {
        // a: events at 1, 2; b: event at 3, censored at 4
        let a = obs(&[(1.0, true), (2.0, true)]);
        let b = obs(&[(3.0, true), (4.0, false)]);
        let result = LogRankStatistic::compute(&a, &b);

        // t=1: n1=2 n2=2 d=1 -> E=0.5,  V=2*2*1*3/16/3 = 0.25
        // t=2: n1=1 n2=2 d=1 -> E=1/3,  V=1*2*1*2/9/2  = 2/9
        // t=3: n1=0 n2=2 d=1 -> E=0,    V=0
        let expected = 0.5 + 1.0 / 3.0;
        let variance = 0.25 + 2.0 / 9.0;
        assert!((result.observed - 2.0).abs() < 1e-12);
        assert!((result.expected - expected).abs() < 1e-12);
        assert!((result.variance - variance).abs() < 1e-12);
        let z = (2.0 - expected) / variance.sqrt();
        assert!((result.z - z).abs() < 1e-12);
        assert!((result.p - (1.0 - normal::cdf(z))).abs() < 1e-12);
    }

    #[test]
    fn test_no_events_is_degenerate() {
        let a = obs(&[(1.0, false), (2.0, false)]);
        let b = obs(&[(1.5, false)]);
        let result = LogRankStatistic::compute(&a, &b);
        assert!(result.z.abs() < f64::EPSILON);
        assert!(result.variance.abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_samples() {
        let result = LogRankStatistic::compute(&[], &[]);
        assert!(result.z.abs() < f64::EPSILON);
        assert!((result.p - normal::upper_tail(0.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_subject_risk_set_uses_unit_denominator() {
        // At t=2 only one subject remains at risk: n-1 = 0 is replaced by 1
        let a = obs(&[(1.0, true)]);
        let b = obs(&[(2.0, true)]);
        let result = LogRankStatistic::compute(&a, &b);
        // t=1: n1=1 n2=1 d=1 -> E=0.5, V=1*1*1*1/4/1 = 0.25
        // t=2: n1=0 n2=1 d=1 -> E=0,   V=0
        assert!((result.expected - 0.5).abs() < 1e-12);
        assert!((result.variance - 0.25).abs() < 1e-12);
        assert!((result.z - 1.0).abs() < 1e-12);
    }
}
