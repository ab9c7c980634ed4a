//! Kaplan-Meier curves per risk group
//!
//! Each [`RiskGroup`] gets its own Kaplan-Meier curve computed from the true
//! outcomes of its members. The curves are returned both as per-group series
//! and as combined chart rows on a shared time axis.
//!
//! # Examples
//!
//! ```
//! use isd_analysis::{
//!     stratify::stratify,
//!     subject::{ScoreField, Subject},
//!     survival::GroupSurvival,
//! };
//!
//! let subjects = [(2.0, true, 9.0), (4.0, false, 1.0), (6.0, true, 2.0), (1.0, true, 8.0)]
//!     .into_iter()
//!     .enumerate()
//!     .map(|(id, (time, event, risk))| Subject {
//!         id: id as i64,
//!         observed_time: time,
//!         event,
//!         median_risk: risk,
//!         mean_risk: risk,
//!     })
//!     .collect::<Vec<_>>();
//!
//! let groups = stratify(&subjects, 2, ScoreField::Median);
//! let survival = GroupSurvival::from_groups(&groups);
//! assert_eq!(survival.len(), 2);
//! let rows = GroupSurvival::chart_rows(&survival);
//! assert_eq!(rows[0].get("group1"), Some(100.0));
//! ```

use isd_stats::{
    interpolation::StepCurve,
    survival::{KaplanMeierCurve, KmPoint},
};
use serde::Serialize;

use crate::{chart::ChartRow, stratify::RiskGroup};

/// A Kaplan-Meier point as handed to the charting layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalPoint {
    pub time: f64,
    pub survival_pct: f64,
    pub at_risk: usize,
    pub events: usize,
}

impl From<&KmPoint> for SurvivalPoint {
    fn from(point: &KmPoint) -> Self {
        Self {
            time: point.time,
            survival_pct: point.survival_pct,
            at_risk: point.at_risk,
            events: point.events,
        }
    }
}

/// Kaplan-Meier curve of one risk group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSurvival {
    pub group_id: usize,
    pub mean_risk: f64,
    pub subjects: usize,
    /// Kaplan-Meier median survival time, if the curve reaches 50%.
    pub median_survival: Option<f64>,
    pub points: Vec<SurvivalPoint>,
}

impl GroupSurvival {
    #[must_use]
    pub fn from_group(group: &RiskGroup) -> Self {
        let curve = KaplanMeierCurve::from_observations(group.members.iter().map(Into::into));
        Self {
            group_id: group.group_id,
            mean_risk: group.mean_risk,
            subjects: group.members.len(),
            median_survival: curve.median_survival(),
            points: curve.points.iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn from_groups(groups: &[RiskGroup]) -> Vec<Self> {
        groups.iter().map(Self::from_group).collect()
    }

    /// Column name of this group in combined chart rows.
    #[must_use]
    pub fn series_name(&self) -> String {
        format!("group{}", self.group_id)
    }

    fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }

    fn survival_pcts(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.survival_pct).collect()
    }

    /// Lays all group curves out on the union of their time points.
    ///
    /// Each group's value at a time it has no point of its own comes from
    /// [`StepCurve::value_at`], i.e. linear interpolation between the group's
    /// neighbouring points and flat extension past its last point. At a time
    /// with several points (an event at time zero) the row shows the last one.
    #[must_use]
    pub fn chart_rows(groups: &[Self]) -> Vec<ChartRow> {
        let columns = groups
            .iter()
            .map(|group| (group.series_name(), group.times(), group.survival_pcts()))
            .collect::<Vec<_>>();
        let axis = isd_stats::interpolation::time_axis(
            columns
                .iter()
                .map(|(_, times, values)| StepCurve::new(times, values)),
        );

        axis.into_iter()
            .map(|time| ChartRow {
                time,
                values: columns
                    .iter()
                    .map(|(name, times, values)| {
                        (name.clone(), StepCurve::new(times, values).value_at(time))
                    })
                    .collect(),
            })
            .collect()
    }
}
