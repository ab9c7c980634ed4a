//! Memoization of evaluation reports
//!
//! A report depends only on the payload contents and the [`AnalysisParams`],
//! so it is recomputed only when one of them changes. Reports are shared as
//! [`Arc`]s so that several consumers can hold the same result.

use std::{collections::HashMap, sync::Arc};

use crate::{
    payload::FullPredictionsData,
    report::{AnalysisParams, EvaluationReport},
};

#[derive(Debug, Default)]
pub struct ReportCache {
    reports: HashMap<(u64, AnalysisParams), Arc<EvaluationReport>>,
    hits: usize,
    misses: usize,
}

impl ReportCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached report for `(data, params)`, computing it on a miss.
    pub fn get_or_compute(
        &mut self,
        data: &FullPredictionsData,
        params: &AnalysisParams,
    ) -> Arc<EvaluationReport> {
        let key = (data.fingerprint(), *params);
        if let Some(report) = self.reports.get(&key) {
            self.hits += 1;
            log::debug!("report cache hit ({params:?})");
            return Arc::clone(report);
        }

        self.misses += 1;
        log::debug!("report cache miss ({params:?})");
        let report = Arc::new(EvaluationReport::compute(data, params));
        self.reports.insert(key, Arc::clone(&report));
        report
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }

    #[must_use]
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.reports.clear();
    }
}
