/// A single right-censored observation.
///
/// `event == true` means the outcome was observed at `time` (uncensored).
/// `event == false` means the subject was censored at `time`, so only a
/// lower bound of the true event time is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Observed time (event or censoring time).
    pub time: f64,
    /// Whether the event was observed.
    pub event: bool,
}

impl Observation {
    #[must_use]
    pub fn new(time: f64, event: bool) -> Self {
        Self { time, event }
    }
}

/// A step of a Kaplan-Meier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KmPoint {
    /// Time of the step.
    pub time: f64,
    /// Survival probability after the step, in percent (0.0 to 100.0).
    pub survival_pct: f64,
    /// Number of subjects at risk just before the step.
    pub at_risk: usize,
    /// Number of events at the step (0 for the synthetic origin point).
    pub events: usize,
}

/// Kaplan-Meier survival curve for survival analysis.
///
/// The Kaplan-Meier estimator is a non-parametric statistic used to estimate the survival
/// function from lifetime data. It accounts for censored data (observations where the event
/// of interest has not occurred by the end of the study period).
///
/// The curve always starts with the synthetic point `(0, 100%)` followed by one point per
/// distinct time at which at least one event occurred. Times where only censoring happened
/// shrink the risk set without adding a point.
#[derive(Debug, Clone, PartialEq)]
pub struct KaplanMeierCurve {
    /// Curve points ordered by time, starting at `(0, 100)`.
    pub points: Vec<KmPoint>,
}

impl KaplanMeierCurve {
    /// Computes the Kaplan-Meier survival curve from survival data.
    ///
    /// Observations are grouped by exact time. At each distinct time (ascending) the
    /// survival is multiplied by `(at_risk - events) / at_risk` when events occurred,
    /// then the risk set shrinks by every subject observed at that time, censored or not.
    ///
    /// The risk set never becomes negative: malformed input that would underflow it
    /// clamps it to zero, after which no further points are produced.
    ///
    /// # Examples
    ///
    /// ```
    /// # use isd_stats::survival::{KaplanMeierCurve, Observation};
    /// let data = [
    ///     Observation::new(5.0, true),
    ///     Observation::new(5.0, true),
    ///     Observation::new(10.0, false),
    ///     Observation::new(15.0, true),
    /// ];
    /// let curve = KaplanMeierCurve::from_observations(data);
    /// let points = curve.points.iter().map(|p| (p.time, p.survival_pct)).collect::<Vec<_>>();
    /// assert_eq!(points, [(0.0, 100.0), (5.0, 50.0), (15.0, 0.0)]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut data = observations.into_iter().collect::<Vec<_>>();
        let total = data.len();

        let mut points = vec![KmPoint {
            time: 0.0,
            survival_pct: 100.0,
            at_risk: total,
            events: 0,
        }];

        // Sort by time
        data.sort_by(|a, b| a.time.total_cmp(&b.time));

        let mut at_risk = total;
        let mut survival = 1.0;

        let mut i = 0;
        while i < data.len() {
            let current_time = data[i].time;

            // Count events and all observations at this time point
            let mut event_count = 0;
            let mut j = i;
            while j < data.len() && data[j].time.total_cmp(&current_time).is_eq() {
                if data[j].event {
                    event_count += 1;
                }
                j += 1;
            }
            let total_at_time = j - i;

            if event_count > 0 && at_risk > 0 {
                let survivors = at_risk.saturating_sub(event_count);
                survival *= survivors as f64 / at_risk as f64;
                points.push(KmPoint {
                    time: current_time,
                    survival_pct: survival * 100.0,
                    at_risk,
                    events: event_count,
                });
            }

            at_risk = at_risk.saturating_sub(total_at_time);
            i = j;
        }

        Self { points }
    }

    /// Returns the median survival time.
    ///
    /// The median survival time is the time at which the survival probability
    /// drops to or below 50%. If the survival probability never reaches 50%,
    /// this method returns `None`.
    ///
    /// Linear interpolation is used between time points for more accurate estimates.
    ///
    /// # Examples
    ///
    /// ```
    /// # use isd_stats::survival::{KaplanMeierCurve, Observation};
    /// let data = [10.0, 20.0, 30.0].map(|t| Observation::new(t, true));
    /// let curve = KaplanMeierCurve::from_observations(data);
    /// let median = curve.median_survival().unwrap();
    /// assert!(median > 10.0 && median <= 20.0);
    /// ```
    #[must_use]
    pub fn median_survival(&self) -> Option<f64> {
        let idx = self.points.iter().position(|p| p.survival_pct <= 50.0)?;
        if idx == 0 {
            return Some(self.points[0].time);
        }
        let p0 = &self.points[idx - 1];
        let p1 = &self.points[idx];
        let median =
            p0.time + (50.0 - p0.survival_pct) / (p1.survival_pct - p0.survival_pct) * (p1.time - p0.time);
        Some(median)
    }

    /// Returns the survival percentage at a specific time.
    ///
    /// This method uses a right-continuous step function: the survival
    /// percentage remains constant between event times and drops exactly at
    /// an event time.
    ///
    /// # Examples
    ///
    /// ```
    /// # use isd_stats::survival::{KaplanMeierCurve, Observation};
    /// let data = [Observation::new(10.0, true), Observation::new(20.0, true)];
    /// let curve = KaplanMeierCurve::from_observations(data);
    ///
    /// assert_eq!(curve.survival_at(5.0), 100.0); // Before first event
    /// assert_eq!(curve.survival_at(10.0), 50.0);
    /// assert_eq!(curve.survival_at(25.0), 0.0);
    /// ```
    #[must_use]
    pub fn survival_at(&self, time: f64) -> f64 {
        self.points
            .iter()
            .rev()
            .find(|p| p.time <= time)
            .map_or(100.0, |p| p.survival_pct)
    }

    /// Iterates over `(time, survival_pct)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|p| (p.time, p.survival_pct))
    }
}
