use std::num::NonZeroUsize;

use isd_analysis::{
    cache::ReportCache,
    calibration::CalibrationHistogram,
    curves,
    payload::{FullPredictionsData, PayloadError, SurvivalCurvesData},
    report::{AnalysisParams, EvaluationReport},
    subject::ScoreField,
};

const FULL_PREDICTIONS: &str = include_str!("fixtures/full_predictions.json");
const SURVIVAL_CURVES: &str = include_str!("fixtures/survival_curves.json");

#[track_caller]
fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn full_predictions() -> FullPredictionsData {
    serde_json::from_str(FULL_PREDICTIONS).unwrap()
}

fn survival_curves() -> SurvivalCurvesData {
    serde_json::from_str(SURVIVAL_CURVES).unwrap()
}

#[test]
fn test_fixture_is_valid() {
    let data = full_predictions();
    assert_eq!(data.len(), 10);
    assert_eq!(data.validate(), Ok(()));
    assert_eq!(survival_curves().validate(), Ok(()));
}

#[test]
fn test_group_curves() {
    let report = EvaluationReport::compute(&full_predictions(), &AnalysisParams::default());
    assert_eq!(report.subjects, 10);
    assert_eq!(report.groups.len(), 2);

    let early = &report.groups[0];
    assert_eq!(early.group_id, 1);
    assert_eq!(early.subjects, 5);
    let expected = [(0.0, 100.0), (1.0, 80.0), (2.0, 60.0), (3.0, 40.0), (5.0, 0.0)];
    assert_eq!(early.points.len(), expected.len());
    for (point, (time, pct)) in early.points.iter().zip(expected) {
        assert_close(point.time, time);
        assert_close(point.survival_pct, pct);
    }
    assert_close(early.median_survival.unwrap(), 2.5);

    let late = &report.groups[1];
    let points = late
        .points
        .iter()
        .map(|p| (p.time, p.survival_pct))
        .collect::<Vec<_>>();
    assert_eq!(points.len(), 4);
    assert_close(points[1].0, 6.0);
    assert_close(points[1].1, 80.0);
    assert_close(points[2].1, 160.0 / 3.0);
    assert_close(points[3].1, 80.0 / 3.0);
    assert_eq!(late.points[3].at_risk, 2);
}

#[test]
fn test_combined_rows() {
    let report = EvaluationReport::compute(&full_predictions(), &AnalysisParams::default());
    let times = report
        .survival_rows
        .iter()
        .map(|r| r.time)
        .collect::<Vec<_>>();
    assert_eq!(times, [0.0, 1.0, 2.0, 3.0, 5.0, 6.0, 8.0, 9.0]);

    let last = report.survival_rows.last().unwrap();
    assert_close(last.get("group1").unwrap(), 0.0);
    assert_close(last.get("group2").unwrap(), 80.0 / 3.0);

    let first = &report.survival_rows[0];
    assert_eq!(first.get("group1"), Some(100.0));
    assert_eq!(first.get("group2"), Some(100.0));
}

#[test]
fn test_log_rank_separates_groups() {
    let report = EvaluationReport::compute(&full_predictions(), &AnalysisParams::default());
    assert_eq!(report.log_rank.len(), 1);
    let result = report.log_rank[0];
    assert_eq!((result.group_a, result.group_b), (1, 2));
    assert!(result.z > 0.0);
    assert!(result.p > 0.0 && result.p < 0.5);
}

#[test]
fn test_more_groups() {
    let params = AnalysisParams {
        groups: NonZeroUsize::new(4).unwrap(),
        score_field: ScoreField::Mean,
        num_bins: 5,
    };
    let report = EvaluationReport::compute(&full_predictions(), &params);
    let sizes = report
        .groups
        .iter()
        .map(|g| g.subjects)
        .collect::<Vec<_>>();
    assert_eq!(sizes, [3, 3, 3, 1]);
    assert_eq!(report.log_rank.len(), 6);
    assert_eq!(report.calibration.rows.len(), 5);
}

#[test]
fn test_calibration() {
    let histogram = CalibrationHistogram::from_payload(&full_predictions(), 10);
    assert_eq!(histogram.rows.len(), 10);
    for (row, &event) in histogram.rows.iter().zip(&full_predictions().actual_events) {
        assert_eq!(row.total_count, 1);
        assert_eq!(row.uncensored_count, usize::from(event));
        assert_close(row.uncensored_percent + row.censored_percent, 10.0);
    }
    assert_eq!(histogram.rows[0].bin_label, "0-10%");
    assert_eq!(histogram.rows[9].bin_label, "90-100%");
    assert!(histogram.chi_square.is_finite());
    assert!((0.0..=1.0).contains(&histogram.p_value));
}

#[test]
fn test_individual_curves() {
    let curves = survival_curves().prediction_curves();
    assert_eq!(
        curves.iter().map(|c| c.subject_id).collect::<Vec<_>>(),
        [3, 7]
    );

    let rows = curves::chart_rows(&curves);
    assert_eq!(
        rows.iter().map(|r| r.time).collect::<Vec<_>>(),
        [0.0, 2.0, 5.0, 10.0]
    );

    // only subject 3 has started at t=0
    assert_eq!(rows[0].get("overall"), Some(100.0));
    assert_eq!(rows[0].get("subject7"), Some(90.0));

    assert_close(rows[1].get("subject3").unwrap(), 84.0);
    assert_close(rows[1].get("overall").unwrap(), 87.0);
    assert_close(rows[2].get("subject7").unwrap(), 75.0);
    assert_close(rows[2].get("overall").unwrap(), 67.5);
    assert_close(rows[3].get("overall").unwrap(), 35.0);
}

#[test]
fn test_report_json_shape() {
    let report = EvaluationReport::compute(&full_predictions(), &AnalysisParams::default());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["params"]["scoreField"], "median");
    assert_eq!(json["groups"][0]["groupId"], 1);
    assert_eq!(json["survivalRows"][0]["time"], 0.0);
    assert_eq!(json["survivalRows"][0]["group2"], 100.0);
    assert_eq!(json["logRank"][0]["groupA"], 1);
    assert_eq!(json["calibration"]["rows"][0]["binLabel"], "0-10%");
}

#[test]
fn test_cache_follows_params() {
    let data = full_predictions();
    let mut cache = ReportCache::new();
    let params = AnalysisParams::default();

    let first = cache.get_or_compute(&data, &params);
    let again = cache.get_or_compute(&data, &params);
    assert_eq!(first, again);
    assert_eq!(cache.hits(), 1);

    let binned = cache.get_or_compute(
        &data,
        &AnalysisParams {
            num_bins: 4,
            ..params
        },
    );
    assert_eq!(binned.calibration.rows.len(), 4);
    assert_eq!(cache.misses(), 2);
}

#[test]
fn test_strict_validation_rejects_bad_payload() {
    let mut data = full_predictions();
    data.actual_events[4] = 3;
    assert_eq!(
        data.validate(),
        Err(PayloadError::InvalidEvent { index: 4, value: 3 })
    );

    // the lenient path still evaluates it
    let report = EvaluationReport::compute(&data, &AnalysisParams::default());
    assert_eq!(report.subjects, 10);
}
