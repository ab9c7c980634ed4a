//! Random selection of individual curves for display
//!
//! Showing every individual curve of a large test set is unreadable, so
//! dashboards draw a random handful. The randomness is confined here: the
//! statistical functions never sample, and callers pass their own RNG so that
//! a seeded generator reproduces the same selection.

use rand::{Rng, seq::IndexedRandom as _};

use crate::subject::PredictionCurve;

/// Picks up to `count` curves at random, returned in subject-id order.
///
/// When `count` is at least the number of curves, all curves are returned.
#[must_use]
pub fn sample_curves<R>(curves: &[PredictionCurve], count: usize, rng: &mut R) -> Vec<PredictionCurve>
where
    R: Rng + ?Sized,
{
    let mut selected = curves
        .choose_multiple(rng, count)
        .cloned()
        .collect::<Vec<_>>();
    selected.sort_by_key(|curve| curve.subject_id);
    log::debug!("sampled {} of {} curves", selected.len(), curves.len());
    selected
}
