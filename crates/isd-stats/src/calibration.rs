//! D-calibration histogram and Hosmer-Lemeshow goodness of fit
//!
//! D-calibration checks that the predicted survival probability evaluated at
//! each subject's own observed time is uniformly distributed across
//! `[0, 100]` percent. The probabilities are binned into equal-width bins,
//! split by censoring status, and compared against the bin midpoints with a
//! Hosmer-Lemeshow chi-square statistic. The p-value uses the Wilson-Hilferty
//! cube-root transformation of the chi-square distribution.
//!
//! # Examples
//!
//! ```
//! use isd_stats::calibration::DCalibration;
//!
//! let probs = [5.0, 15.0, 55.0, 95.0, 100.0];
//! let events = [true, false, true, true, false];
//! let result = DCalibration::compute(&probs, &events, 10);
//!
//! assert_eq!(result.bins.len(), 10);
//! assert_eq!(result.bins[9].censored_count, 1); // exactly 100 lands in the last bin
//! assert!((0.0..=1.0).contains(&result.p_value));
//! ```

use crate::normal;

/// One equal-width probability bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationBin {
    /// Inclusive lower bound, in percent.
    pub bin_start: f64,
    /// Exclusive upper bound (inclusive for the last bin), in percent.
    pub bin_end: f64,
    /// Subjects whose event was observed.
    pub uncensored_count: usize,
    /// Censored subjects.
    pub censored_count: usize,
}

impl CalibrationBin {
    #[must_use]
    pub fn total(&self) -> usize {
        self.uncensored_count + self.censored_count
    }

    /// Bin midpoint as a fraction in `[0, 1]`.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.bin_start + self.bin_end) / 2.0 / 100.0
    }
}

/// Binned D-calibration counts with the Hosmer-Lemeshow test.
#[derive(Debug, Clone, PartialEq)]
pub struct DCalibration {
    pub bins: Vec<CalibrationBin>,
    /// Hosmer-Lemeshow chi-square statistic.
    pub chi_square: f64,
    /// Degrees of freedom, `num_bins - 2` (may be zero or negative).
    pub degrees_of_freedom: i64,
    /// Wilson-Hilferty p-value in `[0, 1]`; `1.0` when undefined.
    pub p_value: f64,
}

impl DCalibration {
    /// Bins `prob_at_observed_time` (percent) by censoring status and tests the fit.
    ///
    /// Bins are half-open `[start, end)` except the last one, which is closed so
    /// that exactly-100 values are counted. Values outside `[0, 100]` are clamped
    /// into the first or last bin. When the two slices differ in length only the
    /// common prefix is used.
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    #[must_use]
    pub fn compute(prob_at_observed_time: &[f64], events: &[bool], num_bins: usize) -> Self {
        let mut bins = (0..num_bins)
            .map(|idx| CalibrationBin {
                // Computed per bin to avoid accumulated rounding error
                bin_start: idx as f64 * 100.0 / num_bins as f64,
                bin_end: (idx + 1) as f64 * 100.0 / num_bins as f64,
                uncensored_count: 0,
                censored_count: 0,
            })
            .collect::<Vec<_>>();

        if let Some(last) = num_bins.checked_sub(1) {
            for (&prob, &event) in prob_at_observed_time.iter().zip(events) {
                // Located against the stored edges; negatives and NaN land in bin 0
                let idx = bins.partition_point(|bin| bin.bin_end <= prob).min(last);
                let bin = &mut bins[idx];
                if event {
                    bin.uncensored_count += 1;
                } else {
                    bin.censored_count += 1;
                }
            }
        }

        let chi_square = hosmer_lemeshow(&bins);
        let degrees_of_freedom = num_bins as i64 - 2;
        let p_value = wilson_hilferty_p_value(chi_square, degrees_of_freedom);

        Self {
            bins,
            chi_square,
            degrees_of_freedom,
            p_value,
        }
    }

    /// Number of subjects counted across all bins.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(CalibrationBin::total).sum()
    }
}

/// Hosmer-Lemeshow statistic against the bin midpoints.
///
/// For each non-empty bin the expected uncensored count is `mid * total` and the
/// expected censored count `(1 - mid) * total`. Terms with zero expectation are skipped.
#[expect(clippy::cast_precision_loss)]
fn hosmer_lemeshow(bins: &[CalibrationBin]) -> f64 {
    let mut chi_square = 0.0;
    for bin in bins.iter().filter(|bin| bin.total() > 0) {
        let total = bin.total() as f64;
        let mid = bin.midpoint();
        let cells = [
            (bin.uncensored_count as f64, mid * total),
            (bin.censored_count as f64, (1.0 - mid) * total),
        ];
        for (observed, expected) in cells {
            if expected != 0.0 {
                chi_square += (observed - expected).powi(2) / expected;
            }
        }
    }
    chi_square
}

/// Upper-tail chi-square probability via the Wilson-Hilferty approximation.
///
/// Returns `1.0` when `df <= 0` or the statistic is negative.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn wilson_hilferty_p_value(chi_square: f64, df: i64) -> f64 {
    if df <= 0 || chi_square < 0.0 {
        return 1.0;
    }
    let k = df as f64;
    let scale = 2.0 / (9.0 * k);
    let z = ((chi_square / k).cbrt() - (1.0 - scale)) / scale.sqrt();
    (1.0 - normal::cdf(z)).clamp(0.0, 1.0)
}
