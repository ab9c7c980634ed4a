//! Interpolation of sparse survival curves
//!
//! Individual survival distributions arrive as sparse `(time, survival %)`
//! samples. This module evaluates such a curve at an arbitrary time and
//! computes the mean of many individual curves at a time point, which is what
//! dashboards label as the "overall" curve.
//!
//! The mean of individual curves is a display convenience and is **not** a
//! Kaplan-Meier estimate; for the group-level estimator see
//! [`crate::survival::KaplanMeierCurve`].
//!
//! # Examples
//!
//! ```
//! use isd_stats::interpolation::{StepCurve, mean_of_curves};
//!
//! let a = StepCurve::new(&[0.0, 10.0], &[100.0, 50.0]);
//! let b = StepCurve::new(&[0.0, 10.0], &[100.0, 70.0]);
//!
//! assert_eq!(a.value_at(5.0), Some(75.0));
//! assert_eq!(mean_of_curves([a, b], 10.0), Some(60.0));
//! ```

/// A borrowed view of a sparse survival curve.
///
/// `times` is expected to be strictly increasing and `values` to be in percent.
/// When the two slices differ in length the extra tail of the longer one is ignored.
#[derive(Debug, Clone, Copy)]
pub struct StepCurve<'a> {
    times: &'a [f64],
    values: &'a [f64],
}

impl<'a> StepCurve<'a> {
    #[must_use]
    pub fn new(times: &'a [f64], values: &'a [f64]) -> Self {
        let len = times.len().min(values.len());
        Self {
            times: &times[..len],
            values: &values[..len],
        }
    }

    #[must_use]
    pub fn times(&self) -> &'a [f64] {
        self.times
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// First observed time, if any.
    #[must_use]
    pub fn first_time(&self) -> Option<f64> {
        self.times.first().copied()
    }

    /// Evaluates the curve at `time`.
    ///
    /// - an exact match returns the stored value (the last one when a time is
    ///   repeated, as at a Kaplan-Meier drop at time zero),
    /// - before the first time the first value is returned (flat extrapolation),
    /// - between two samples the value is linearly interpolated,
    /// - after the last time the last value is returned.
    ///
    /// Returns `None` only for an empty curve.
    #[must_use]
    pub fn value_at(&self, time: f64) -> Option<f64> {
        let last = self.times.len().checked_sub(1)?;
        let idx = self.times.partition_point(|&t| t <= time);

        if idx > 0 && self.times[idx - 1] == time {
            return Some(self.values[idx - 1]);
        }
        if idx == 0 {
            return Some(self.values[0]);
        }
        if idx > last {
            return Some(self.values[last]);
        }

        let (t0, t1) = (self.times[idx - 1], self.times[idx]);
        let (v0, v1) = (self.values[idx - 1], self.values[idx]);
        let span = t1 - t0;
        if span <= 0.0 {
            // Non-increasing times; fall back to the left sample
            return Some(v0);
        }
        Some(v0 + (v1 - v0) * (time - t0) / span)
    }
}

/// Mean of the individual curves' values at `time`.
///
/// Only curves that have at least one sample at or before `time` contribute;
/// the others are excluded from the average rather than counted as zero.
/// Returns `None` when no curve contributes.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean_of_curves<'a, I>(curves: I, time: f64) -> Option<f64>
where
    I: IntoIterator<Item = StepCurve<'a>>,
{
    let (sum, count) = curves
        .into_iter()
        .filter(|curve| curve.first_time().is_some_and(|first| first <= time))
        .filter_map(|curve| curve.value_at(time))
        .fold((0.0, 0_usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Sorted, de-duplicated union of the sample times of all curves.
///
/// This is the shared time axis used when several curves are laid out as rows
/// of a single chart.
#[must_use]
pub fn time_axis<'a, I>(curves: I) -> Vec<f64>
where
    I: IntoIterator<Item = StepCurve<'a>>,
{
    let mut times = curves
        .into_iter()
        .flat_map(|curve| curve.times().iter().copied())
        .collect::<Vec<_>>();
    times.sort_by(f64::total_cmp);
    times.dedup_by(|a, b| a.total_cmp(b).is_eq());
    times
}
