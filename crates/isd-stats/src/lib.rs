//! Statistical primitives for evaluating individual survival distributions.
//!
//! This crate provides the numerical building blocks used to evaluate survival
//! prediction models:
//!
//! - **Normal approximation**: Standard normal CDF used by the hypothesis tests
//! - **Survival analysis**: Kaplan-Meier estimator for time-to-event data with censoring
//! - **Curve interpolation**: Evaluation of sparse individual survival curves
//! - **Log-rank test**: Two-sample comparison of survival distributions
//! - **D-calibration**: Probability histogram with a Hosmer-Lemeshow goodness-of-fit test
//!
//! Every function is pure: identical inputs always produce identical outputs.
//!
//! # Modules
//!
//! - [`normal`]: Zelen-Severo approximation of the standard normal CDF
//! - [`survival`]: Kaplan-Meier survival curves
//! - [`interpolation`]: Individual curve interpolation and the mean-of-curves aggregate
//! - [`log_rank`]: Two-sample log-rank statistic
//! - [`calibration`]: D-calibration binning and Wilson-Hilferty p-values
//!
//! # Examples
//!
//! ## Analyzing survival data
//!
//! ```
//! use isd_stats::survival::{KaplanMeierCurve, Observation};
//!
//! let data = vec![
//!     Observation::new(10.0, true),  // Event occurred at time 10
//!     Observation::new(20.0, false), // Censored at time 20
//!     Observation::new(30.0, true),  // Event occurred at time 30
//! ];
//! let curve = KaplanMeierCurve::from_observations(data);
//! assert_eq!(curve.points.len(), 3);
//! ```
//!
//! ## Comparing two groups
//!
//! ```
//! use isd_stats::{log_rank::LogRankStatistic, survival::Observation};
//!
//! let low_risk = [8.0, 9.0, 12.0, 15.0].map(|t| Observation::new(t, true));
//! let high_risk = [1.0, 2.0, 3.0, 4.0].map(|t| Observation::new(t, true));
//! let result = LogRankStatistic::compute(&low_risk, &high_risk);
//! assert!(result.z < 0.0);
//! assert!(result.p < 0.05);
//! ```

pub mod calibration;
pub mod interpolation;
pub mod log_rank;
pub mod normal;
pub mod survival;
