//! Risk stratification of a cohort
//!
//! Subjects are ranked by a scalar risk score and cut into `k` contiguous
//! blocks of `ceil(n / k)` subjects. Group 1 holds the lowest scores.
//! Groups are rebuilt from scratch for every `(k, score field)` pair.

use serde::Serialize;

use crate::subject::{ScoreField, Subject};

/// A block of subjects with adjacent risk scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskGroup {
    /// 1-based group number, in ascending score order.
    pub group_id: usize,
    pub members: Vec<Subject>,
    /// Arithmetic mean of the members' risk scores.
    pub mean_risk: f64,
}

/// Partitions `subjects` into at most `k` ordered risk groups.
///
/// The sort is stable, so subjects with equal scores keep their input order.
/// Blocks that would be empty (when `n < k`) are dropped, and `k == 0` or an
/// empty cohort yields no groups.
///
/// # Examples
///
/// ```
/// use isd_analysis::{stratify::stratify, subject::{ScoreField, Subject}};
///
/// let subjects = (0..5)
///     .map(|i| Subject {
///         id: i,
///         observed_time: 1.0,
///         event: true,
///         median_risk: f64::from(5 - i as i32),
///         mean_risk: 0.0,
///     })
///     .collect::<Vec<_>>();
/// let groups = stratify(&subjects, 2, ScoreField::Median);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].members.len(), 3);
/// assert_eq!(groups[0].members[0].id, 4);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn stratify(subjects: &[Subject], k: usize, score_field: ScoreField) -> Vec<RiskGroup> {
    if k == 0 || subjects.is_empty() {
        return vec![];
    }

    let mut sorted = subjects.to_vec();
    sorted.sort_by(|a, b| {
        a.risk_score(score_field)
            .total_cmp(&b.risk_score(score_field))
    });

    let block_size = sorted.len().div_ceil(k);
    let groups = sorted
        .chunks(block_size)
        .enumerate()
        .map(|(idx, members)| {
            let mean_risk = members
                .iter()
                .map(|s| s.risk_score(score_field))
                .sum::<f64>()
                / members.len() as f64;
            RiskGroup {
                group_id: idx + 1,
                members: members.to_vec(),
                mean_risk,
            }
        })
        .collect::<Vec<_>>();

    log::debug!(
        "stratified {} subjects into {} groups of up to {block_size} by {score_field:?}",
        subjects.len(),
        groups.len()
    );
    groups
}
