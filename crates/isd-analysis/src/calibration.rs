//! D-calibration histogram rows for the charting layer

use isd_stats::calibration::{CalibrationBin, DCalibration};
use serde::Serialize;

use crate::payload::FullPredictionsData;

/// One bar of the D-calibration histogram.
///
/// Percentages are relative to the total number of subjects, so the bars of
/// both series together sum to 100%.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationRow {
    pub bin_label: String,
    pub uncensored_percent: f64,
    pub censored_percent: f64,
    pub uncensored_count: usize,
    pub censored_count: usize,
    pub total_count: usize,
}

/// Histogram rows plus the Hosmer-Lemeshow summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationHistogram {
    pub rows: Vec<CalibrationRow>,
    pub chi_square: f64,
    pub p_value: f64,
}

impl CalibrationHistogram {
    #[must_use]
    pub fn from_payload(data: &FullPredictionsData, num_bins: usize) -> Self {
        let (probs, events) = data.calibration_inputs();
        Self::compute(&probs, &events, num_bins)
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn compute(prob_at_observed_time: &[f64], events: &[bool], num_bins: usize) -> Self {
        let result = DCalibration::compute(prob_at_observed_time, events, num_bins);
        let subjects = result.total_count();
        let percent = |count: usize| {
            if subjects == 0 {
                0.0
            } else {
                100.0 * count as f64 / subjects as f64
            }
        };

        let rows = result
            .bins
            .iter()
            .map(|bin| CalibrationRow {
                bin_label: bin_label(bin),
                uncensored_percent: percent(bin.uncensored_count),
                censored_percent: percent(bin.censored_count),
                uncensored_count: bin.uncensored_count,
                censored_count: bin.censored_count,
                total_count: bin.total(),
            })
            .collect();

        log::debug!(
            "D-calibration over {subjects} subjects: chi2={:.4}, df={}, p={:.4}",
            result.chi_square,
            result.degrees_of_freedom,
            result.p_value
        );

        Self {
            rows,
            chi_square: result.chi_square,
            p_value: result.p_value,
        }
    }
}

/// Label such as `"0-10%"` or `"33.3-66.7%"`.
fn bin_label(bin: &CalibrationBin) -> String {
    format!("{}-{}%", format_bound(bin.bin_start), format_bound(bin.bin_end))
}

fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_and_percentages() {
        let probs = [5.0, 15.0, 18.0, 95.0];
        let events = [true, false, true, false];
        let histogram = CalibrationHistogram::compute(&probs, &events, 10);

        assert_eq!(histogram.rows.len(), 10);
        let first = &histogram.rows[0];
        assert_eq!(first.bin_label, "0-10%");
        assert_eq!(first.uncensored_count, 1);
        assert!((first.uncensored_percent - 25.0).abs() < 1e-12);

        let second = &histogram.rows[1];
        assert_eq!(second.total_count, 2);
        assert!((second.censored_percent - 25.0).abs() < 1e-12);
        assert!((second.uncensored_percent - 25.0).abs() < 1e-12);

        let total_percent = histogram
            .rows
            .iter()
            .map(|r| r.uncensored_percent + r.censored_percent)
            .sum::<f64>();
        assert!((total_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_fractional_labels() {
        let histogram = CalibrationHistogram::compute(&[], &[], 3);
        let labels = histogram
            .rows
            .iter()
            .map(|r| r.bin_label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, ["0-33.3%", "33.3-66.7%", "66.7-100%"]);
        assert!(histogram.rows.iter().all(|r| r.uncensored_percent == 0.0));
        assert!((histogram.p_value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_payload() {
        let data = FullPredictionsData {
            test_indices: vec![1, 2],
            actual_times: vec![1.0, 2.0],
            actual_events: vec![1, 0],
            median_predictions: vec![1.0, 2.0],
            mean_predictions: vec![1.0, 2.0],
            prob_at_actual_time: vec![100.0, 0.0],
        };
        let histogram = CalibrationHistogram::from_payload(&data, 2);
        assert_eq!(histogram.rows[0].censored_count, 1);
        assert_eq!(histogram.rows[1].uncensored_count, 1);
        assert!((histogram.p_value - 1.0).abs() < f64::EPSILON);
    }
}
