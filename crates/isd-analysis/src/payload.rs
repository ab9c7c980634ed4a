//! Prediction payloads produced by the model-serving service
//!
//! Two JSON documents are consumed:
//!
//! - [`FullPredictionsData`]: parallel per-subject arrays with true outcomes,
//!   risk summaries and the predicted survival probability at each subject's
//!   own observed time.
//! - [`SurvivalCurvesData`]: the individual predicted survival curve of every
//!   subject, keyed by subject id.
//!
//! Conversion into domain values never fails: malformed payloads degrade
//! (arrays are truncated to their common length, with a warning). Callers that
//! prefer to reject such payloads run [`FullPredictionsData::validate`] or
//! [`SurvivalCurvesData::validate`] first.

use std::{
    collections::BTreeMap,
    hash::{DefaultHasher, Hash as _, Hasher as _},
};

use serde::{Deserialize, Serialize};

use crate::subject::{PredictionCurve, Subject};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum PayloadError {
    #[display("`{field}` has {actual} entries but `test_indices` has {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[display("actual_events[{index}] is {value}, expected 0 or 1")]
    InvalidEvent { index: usize, value: u8 },
    #[display("actual_times[{index}] is {value}, expected a finite non-negative time")]
    InvalidTime { index: usize, value: f64 },
    #[display("prob_at_actual_time[{index}] is {value}, expected a percentage in [0, 100]")]
    ProbabilityOutOfRange { index: usize, value: f64 },
    #[display("curve of subject {subject_id} has {times} times but {probabilities} probabilities")]
    CurveLengthMismatch {
        subject_id: i64,
        times: usize,
        probabilities: usize,
    },
    #[display("curve of subject {subject_id} is not strictly increasing in time at index {index}")]
    NonIncreasingTimes { subject_id: i64, index: usize },
}

/// Per-subject outcomes and predictions for the test set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FullPredictionsData {
    #[serde(default)]
    pub test_indices: Vec<i64>,
    #[serde(default)]
    pub actual_times: Vec<f64>,
    /// `1` for an observed event, `0` for a censored subject.
    #[serde(default)]
    pub actual_events: Vec<u8>,
    #[serde(default)]
    pub median_predictions: Vec<f64>,
    #[serde(default)]
    pub mean_predictions: Vec<f64>,
    /// Predicted survival probability (percent) at the subject's observed time.
    #[serde(default)]
    pub prob_at_actual_time: Vec<f64>,
}

impl FullPredictionsData {
    /// Length of the shortest of the parallel arrays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.array_lengths()
            .iter()
            .map(|(_, len)| *len)
            .min()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn array_lengths(&self) -> [(&'static str, usize); 6] {
        [
            ("test_indices", self.test_indices.len()),
            ("actual_times", self.actual_times.len()),
            ("actual_events", self.actual_events.len()),
            ("median_predictions", self.median_predictions.len()),
            ("mean_predictions", self.mean_predictions.len()),
            ("prob_at_actual_time", self.prob_at_actual_time.len()),
        ]
    }

    fn warn_if_ragged(&self) {
        let lengths = self.array_lengths();
        if lengths.iter().any(|(_, len)| *len != lengths[0].1) {
            log::warn!(
                "prediction arrays differ in length ({lengths:?}); using the first {} entries",
                self.len()
            );
        }
    }

    /// Builds the subjects of the payload, truncating to the common array length.
    #[must_use]
    pub fn subjects(&self) -> Vec<Subject> {
        self.warn_if_ragged();
        (0..self.len())
            .map(|i| Subject {
                id: self.test_indices[i],
                observed_time: self.actual_times[i],
                event: self.actual_events[i] != 0,
                median_risk: self.median_predictions[i],
                mean_risk: self.mean_predictions[i],
            })
            .collect()
    }

    /// Returns the `(probability at observed time, event)` columns for D-calibration.
    #[must_use]
    pub fn calibration_inputs(&self) -> (Vec<f64>, Vec<bool>) {
        self.warn_if_ragged();
        let len = self.len();
        let probs = self.prob_at_actual_time[..len].to_vec();
        let events = self.actual_events[..len].iter().map(|e| *e != 0).collect();
        (probs, events)
    }

    /// Strict validation for callers that want to reject malformed payloads.
    pub fn validate(&self) -> Result<(), PayloadError> {
        let expected = self.test_indices.len();
        for (field, actual) in self.array_lengths() {
            if actual != expected {
                return Err(PayloadError::LengthMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }
        for (index, &value) in self.actual_events.iter().enumerate() {
            if value > 1 {
                return Err(PayloadError::InvalidEvent { index, value });
            }
        }
        for (index, &value) in self.actual_times.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(PayloadError::InvalidTime { index, value });
            }
        }
        for (index, &value) in self.prob_at_actual_time.iter().enumerate() {
            if !(0.0..=100.0).contains(&value) {
                return Err(PayloadError::ProbabilityOutOfRange { index, value });
            }
        }
        Ok(())
    }

    /// In-process fingerprint of the payload contents, used as a cache key.
    ///
    /// `DefaultHasher` output may change between Rust releases, so the value
    /// must not be persisted.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.test_indices.hash(&mut hasher);
        self.actual_events.hash(&mut hasher);
        for column in [
            &self.actual_times,
            &self.median_predictions,
            &self.mean_predictions,
            &self.prob_at_actual_time,
        ] {
            column.len().hash(&mut hasher);
            for value in column {
                value.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}

/// Sampled survival curve of one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveData {
    pub times: Vec<f64>,
    /// Survival probabilities in percent.
    pub survival_probabilities: Vec<f64>,
}

/// Individual predicted survival curves keyed by subject id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurvivalCurvesData {
    pub curves: BTreeMap<i64, CurveData>,
}

impl SurvivalCurvesData {
    /// Returns the curves ordered by subject id.
    #[must_use]
    pub fn prediction_curves(&self) -> Vec<PredictionCurve> {
        self.curves
            .iter()
            .map(|(&subject_id, curve)| PredictionCurve {
                subject_id,
                times: curve.times.clone(),
                survival_probabilities: curve.survival_probabilities.clone(),
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), PayloadError> {
        for (&subject_id, curve) in &self.curves {
            if curve.times.len() != curve.survival_probabilities.len() {
                return Err(PayloadError::CurveLengthMismatch {
                    subject_id,
                    times: curve.times.len(),
                    probabilities: curve.survival_probabilities.len(),
                });
            }
            if let Some(index) = curve.times.windows(2).position(|w| w[0] >= w[1]) {
                return Err(PayloadError::NonIncreasingTimes {
                    subject_id,
                    index: index + 1,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> FullPredictionsData {
        FullPredictionsData {
            test_indices: vec![10, 11, 12],
            actual_times: vec![5.0, 8.0, 2.0],
            actual_events: vec![1, 0, 1],
            median_predictions: vec![6.0, 9.0, 1.0],
            mean_predictions: vec![7.0, 8.5, 1.5],
            prob_at_actual_time: vec![45.0, 70.0, 30.0],
        }
    }

    #[test]
    fn test_subjects() {
        let subjects = payload().subjects();
        assert_eq!(subjects.len(), 3);
        assert_eq!(subjects[1].id, 11);
        assert!(!subjects[1].event);
        assert!((subjects[2].mean_risk - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ragged_arrays_are_truncated() {
        let mut data = payload();
        data.mean_predictions.pop();
        assert_eq!(data.len(), 2);
        assert_eq!(data.subjects().len(), 2);
        let (probs, events) = data.calibration_inputs();
        assert_eq!(probs, [45.0, 70.0]);
        assert_eq!(events, [true, false]);
        assert_eq!(
            data.validate(),
            Err(PayloadError::LengthMismatch {
                field: "mean_predictions",
                expected: 3,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_validate() {
        assert_eq!(payload().validate(), Ok(()));

        let mut data = payload();
        data.actual_events[2] = 2;
        assert_eq!(
            data.validate(),
            Err(PayloadError::InvalidEvent { index: 2, value: 2 })
        );

        let mut data = payload();
        data.prob_at_actual_time[0] = 100.5;
        assert!(matches!(
            data.validate(),
            Err(PayloadError::ProbabilityOutOfRange { index: 0, .. })
        ));

        let mut data = payload();
        data.actual_times[1] = -1.0;
        assert!(matches!(
            data.validate(),
            Err(PayloadError::InvalidTime { index: 1, .. })
        ));
    }

    #[test]
    fn test_fingerprint_tracks_contents() {
        let data = payload();
        assert_eq!(data.fingerprint(), payload().fingerprint());

        let mut changed = payload();
        changed.actual_times[0] = 5.5;
        assert_ne!(data.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn test_deserialize_curves_with_string_keys() {
        let json = r#"{
            "curves": {
                "2": { "times": [0, 5, 10], "survival_probabilities": [100, 60, 20] },
                "1": { "times": [0, 4], "survival_probabilities": [100, 50] }
            }
        }"#;
        let data: SurvivalCurvesData = serde_json::from_str(json).unwrap();
        let curves = data.prediction_curves();
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].subject_id, 1);
        assert_eq!(curves[1].times, [0.0, 5.0, 10.0]);
        assert_eq!(data.validate(), Ok(()));
    }

    #[test]
    fn test_validate_curves() {
        let mut data = SurvivalCurvesData::default();
        data.curves.insert(
            4,
            CurveData {
                times: vec![0.0, 3.0, 3.0],
                survival_probabilities: vec![100.0, 90.0, 80.0],
            },
        );
        assert_eq!(
            data.validate(),
            Err(PayloadError::NonIncreasingTimes {
                subject_id: 4,
                index: 2,
            })
        );

        data.curves.get_mut(&4).unwrap().survival_probabilities.pop();
        assert!(matches!(
            data.validate(),
            Err(PayloadError::CurveLengthMismatch { subject_id: 4, .. })
        ));
    }
}
