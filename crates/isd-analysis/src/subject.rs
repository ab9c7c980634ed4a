//! Per-subject values extracted from a prediction payload

use isd_stats::{interpolation::StepCurve, survival::Observation};
use serde::{Deserialize, Serialize};

/// Which summary of a predicted survival distribution is used as the risk score.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum ScoreField {
    /// Median of the predicted survival distribution.
    #[default]
    Median,
    /// Mean of the predicted survival distribution.
    Mean,
}

/// A test subject with its true outcome and predicted risk summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    /// Event or censoring time.
    pub observed_time: f64,
    /// `true` when the event was observed (uncensored).
    pub event: bool,
    /// Median of the predicted survival distribution.
    pub median_risk: f64,
    /// Mean of the predicted survival distribution.
    pub mean_risk: f64,
}

impl Subject {
    #[must_use]
    pub fn risk_score(&self, field: ScoreField) -> f64 {
        match field {
            ScoreField::Median => self.median_risk,
            ScoreField::Mean => self.mean_risk,
        }
    }

    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation::new(self.observed_time, self.event)
    }
}

impl From<&Subject> for Observation {
    fn from(subject: &Subject) -> Self {
        subject.observation()
    }
}

/// An individual predicted survival curve.
///
/// `times` should be strictly increasing and `survival_probabilities` (percent)
/// non-increasing; neither is re-checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionCurve {
    pub subject_id: i64,
    pub times: Vec<f64>,
    pub survival_probabilities: Vec<f64>,
}

impl PredictionCurve {
    #[must_use]
    pub fn step_curve(&self) -> StepCurve<'_> {
        StepCurve::new(&self.times, &self.survival_probabilities)
    }

    /// Survival percentage at `time`, see [`StepCurve::value_at`].
    #[must_use]
    pub fn value_at(&self, time: f64) -> Option<f64> {
        self.step_curve().value_at(time)
    }
}
