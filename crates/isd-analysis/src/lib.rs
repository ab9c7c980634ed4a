//! Evaluation of survival prediction models on a held-out test set
//!
//! This crate turns the prediction payloads returned by the model-serving
//! service into the statistical artifacts used to judge a model, built on the
//! primitives of [`isd_stats`].
//!
//! # Overview
//!
//! The analysis supports three workflows:
//!
//! ## Risk Group Workflow
//!
//! Check that the predicted risk separates subjects with different outcomes:
//!
//! 1. **Load Payload** ([`payload::FullPredictionsData`]): Per-subject outcomes and predictions
//! 2. **Stratify** ([`stratify::stratify`]): Split subjects into K ordered risk groups by
//!    median or mean predicted survival time
//! 3. **Kaplan-Meier Curves** ([`survival::GroupSurvival`]): One curve per group, plus chart rows
//!    on a shared time axis
//! 4. **Log-Rank Tests** ([`log_rank::compare_all`]): Compare every pair of groups
//!
//! ## Calibration Workflow
//!
//! Check that the predicted survival probability at each subject's observed time
//! is uniformly distributed:
//!
//! 1. **Load Payload** ([`payload::FullPredictionsData`])
//! 2. **Histogram** ([`calibration::CalibrationHistogram`]): D-calibration bins split by
//!    censoring status, with a Hosmer-Lemeshow p-value
//!
//! ## Individual Curve Workflow
//!
//! 1. **Load Curves** ([`payload::SurvivalCurvesData`]): Predicted curve per subject
//! 2. **Sample** ([`sampling::sample_curves`]): Optionally pick a random subset for display
//! 3. **Chart Rows** ([`curves::chart_rows`]): Interpolated curves plus the mean-of-curves series
//!
//! [`report::EvaluationReport`] runs the first two workflows in one pass, and
//! [`cache::ReportCache`] memoizes reports per payload and [`report::AnalysisParams`].
//!
//! # Examples
//!
//! ```
//! use isd_analysis::{
//!     payload::FullPredictionsData,
//!     report::{AnalysisParams, EvaluationReport},
//! };
//!
//! let data = FullPredictionsData {
//!     test_indices: vec![0, 1, 2, 3],
//!     actual_times: vec![2.0, 3.0, 9.0, 12.0],
//!     actual_events: vec![1, 1, 0, 1],
//!     median_predictions: vec![2.5, 4.0, 10.0, 11.0],
//!     mean_predictions: vec![3.0, 4.5, 9.5, 12.5],
//!     prob_at_actual_time: vec![55.0, 40.0, 62.0, 35.0],
//! };
//!
//! let report = EvaluationReport::compute(&data, &AnalysisParams::default());
//! assert_eq!(report.groups.len(), 2);
//! assert_eq!(report.log_rank.len(), 1);
//! // The shortest predicted survival times form group 1, which fails earliest
//! assert!(report.log_rank[0].z > 0.0);
//! ```

pub mod cache;
pub mod calibration;
pub mod chart;
pub mod curves;
pub mod log_rank;
pub mod payload;
pub mod report;
pub mod sampling;
pub mod stratify;
pub mod subject;
pub mod survival;
