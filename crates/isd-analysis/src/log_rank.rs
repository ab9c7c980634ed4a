//! Pairwise log-rank comparison of risk groups

use std::fmt::{self, Write as _};

use isd_stats::{log_rank::LogRankStatistic, survival::Observation};
use serde::Serialize;

use crate::stratify::RiskGroup;

/// Log-rank test between two risk groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRankResult {
    pub group_a: usize,
    pub group_b: usize,
    pub z: f64,
    /// `1 - Φ(|z|)`.
    pub p: f64,
}

/// Runs the log-rank test for every unordered pair `(i, j)`, `i < j`, in group order.
///
/// Fewer than two groups yield an empty table.
#[must_use]
pub fn compare_all(groups: &[RiskGroup]) -> Vec<LogRankResult> {
    let samples = groups
        .iter()
        .map(|group| {
            group
                .members
                .iter()
                .map(Observation::from)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut results = Vec::with_capacity(groups.len() * groups.len().saturating_sub(1) / 2);
    for (i, group_a) in groups.iter().enumerate() {
        for (j, group_b) in groups.iter().enumerate().skip(i + 1) {
            let statistic = LogRankStatistic::compute(&samples[i], &samples[j]);
            if statistic.variance <= 0.0 {
                log::debug!(
                    "log-rank between groups {} and {} has zero variance",
                    group_a.group_id,
                    group_b.group_id
                );
            }
            results.push(LogRankResult {
                group_a: group_a.group_id,
                group_b: group_b.group_id,
                z: statistic.z,
                p: statistic.p,
            });
        }
    }
    results
}

/// Renders the table as CSV with the header `Group 1,Group 2,Z,Q`.
pub fn to_csv(results: &[LogRankResult]) -> Result<String, fmt::Error> {
    let mut csv = String::from("Group 1,Group 2,Z,Q\n");
    for result in results {
        writeln!(
            &mut csv,
            "{},{},{},{}",
            result.group_a, result.group_b, result.z, result.p
        )?;
    }
    Ok(csv)
}
