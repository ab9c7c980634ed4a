//! Complete model evaluation report
//!
//! Runs the whole pipeline on a [`FullPredictionsData`] payload:
//!
//! 1. **Stratify** subjects into risk groups ([`stratify::stratify`])
//! 2. **Kaplan-Meier** curve per group ([`GroupSurvival`])
//! 3. **Log-rank** test between every pair of groups ([`log_rank::compare_all`])
//! 4. **Chart rows** on a shared time axis ([`GroupSurvival::chart_rows`])
//! 5. **D-calibration** histogram ([`CalibrationHistogram`]), computed independently

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{
    calibration::CalibrationHistogram,
    chart::ChartRow,
    log_rank::{self, LogRankResult},
    payload::FullPredictionsData,
    stratify,
    subject::ScoreField,
    survival::GroupSurvival,
};

/// Parameters that select how a payload is analysed.
///
/// Any change of these values requires a full recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisParams {
    /// Number of risk groups.
    pub groups: NonZeroUsize,
    /// Risk score used for stratification.
    pub score_field: ScoreField,
    /// Number of D-calibration bins.
    pub num_bins: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            groups: NonZeroUsize::new(2).unwrap_or(NonZeroUsize::MIN),
            score_field: ScoreField::Median,
            num_bins: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    pub params: AnalysisParams,
    pub subjects: usize,
    pub groups: Vec<GroupSurvival>,
    pub survival_rows: Vec<ChartRow>,
    pub log_rank: Vec<LogRankResult>,
    pub calibration: CalibrationHistogram,
}

impl EvaluationReport {
    #[must_use]
    pub fn compute(data: &FullPredictionsData, params: &AnalysisParams) -> Self {
        let subjects = data.subjects();
        let risk_groups = stratify::stratify(&subjects, params.groups.get(), params.score_field);
        let groups = GroupSurvival::from_groups(&risk_groups);
        let survival_rows = GroupSurvival::chart_rows(&groups);
        let log_rank = log_rank::compare_all(&risk_groups);
        let calibration = CalibrationHistogram::from_payload(data, params.num_bins);

        log::info!(
            "evaluated {} subjects: {} groups, {} log-rank pairs, {} calibration bins",
            subjects.len(),
            groups.len(),
            log_rank.len(),
            calibration.rows.len()
        );

        Self {
            params: *params,
            subjects: subjects.len(),
            groups,
            survival_rows,
            log_rank,
            calibration,
        }
    }
}
