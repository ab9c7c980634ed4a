//! Individual survival curves laid out for charting
//!
//! Produces one [`ChartRow`] per distinct time across the given curves, with
//! an `overall` column holding the mean of the individual curves (see
//! [`isd_stats::interpolation::mean_of_curves`]) and one `subject<id>` column
//! per curve. The `overall` column is a mean of predictions, not a
//! Kaplan-Meier estimate.

use isd_stats::interpolation::{self, StepCurve};

use crate::{chart::ChartRow, subject::PredictionCurve};

/// Column name of the mean-of-curves series.
pub const OVERALL_SERIES: &str = "overall";

/// Column name of an individual curve.
#[must_use]
pub fn series_name(curve: &PredictionCurve) -> String {
    format!("subject{}", curve.subject_id)
}

/// Mean of the individual curves at `time`, over the curves that have started by then.
#[must_use]
pub fn overall_at(curves: &[PredictionCurve], time: f64) -> Option<f64> {
    interpolation::mean_of_curves(curves.iter().map(PredictionCurve::step_curve), time)
}

/// Builds chart rows for `curves` on the union of their time points.
#[must_use]
pub fn chart_rows(curves: &[PredictionCurve]) -> Vec<ChartRow> {
    let axis = interpolation::time_axis(curves.iter().map(PredictionCurve::step_curve));
    let names = curves.iter().map(series_name).collect::<Vec<_>>();
    let steps = curves
        .iter()
        .map(PredictionCurve::step_curve)
        .collect::<Vec<StepCurve<'_>>>();

    axis.into_iter()
        .map(|time| {
            let overall = interpolation::mean_of_curves(steps.iter().copied(), time);
            let values = std::iter::once((OVERALL_SERIES.to_owned(), overall))
                .chain(
                    names
                        .iter()
                        .zip(&steps)
                        .map(|(name, step)| (name.clone(), step.value_at(time))),
                )
                .collect();
            ChartRow { time, values }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(subject_id: i64, times: &[f64], values: &[f64]) -> PredictionCurve {
        PredictionCurve {
            subject_id,
            times: times.to_vec(),
            survival_probabilities: values.to_vec(),
        }
    }

    #[test]
    fn test_rows_with_overall() {
        let curves = [
            curve(1, &[0.0, 10.0], &[100.0, 40.0]),
            curve(2, &[5.0, 10.0], &[90.0, 60.0]),
        ];
        let rows = chart_rows(&curves);
        assert_eq!(rows.iter().map(|r| r.time).collect::<Vec<_>>(), [0.0, 5.0, 10.0]);

        // t=0: only subject 1 has started
        assert_eq!(rows[0].get("overall"), Some(100.0));
        assert_eq!(rows[0].get("subject2"), Some(90.0));
        // t=5: (70 + 90) / 2
        assert_eq!(rows[1].get("subject1"), Some(70.0));
        assert_eq!(rows[1].get("overall"), Some(80.0));
        // t=10: (40 + 60) / 2
        assert_eq!(rows[2].get("overall"), Some(50.0));
    }

    #[test]
    fn test_overall_at() {
        let curves = [curve(1, &[2.0, 4.0], &[80.0, 60.0])];
        assert_eq!(overall_at(&curves, 1.0), None);
        assert_eq!(overall_at(&curves, 3.0), Some(70.0));
        assert_eq!(overall_at(&[], 3.0), None);
    }

    #[test]
    fn test_no_curves() {
        assert!(chart_rows(&[]).is_empty());
    }
}
