//! Run driver state: filtering, deduplication, and skip accounting.
//!
//! The accumulating state is an explicit owned object rather than anything
//! process-wide, so a run can be driven (and tested) without touching the
//! network: feed each term's fetched records in, then `finish()`.

use crate::catalog::QueryTerm;
use crate::dedupe::{Deduplicator, IncludedRecord};
use crate::error::SearchError;
use crate::filter::{self, Verdict};
use crate::openalex::RawRecord;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// End-of-run accounting across all terms.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Raw records seen before filtering and deduplication
    pub records_identified: usize,
    /// Records rejected by the filter
    pub excluded: usize,
    /// Rejection tally keyed by reason
    pub rejections: BTreeMap<String, usize>,
    /// Terms abandoned after a fetch failure
    pub skipped_terms: usize,
}

/// Single-run pipeline state. One instance per invocation.
#[derive(Debug, Default)]
pub struct Pipeline {
    dedupe: Deduplicator,
    summary: RunSummary,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one page of records fetched for `term` and merge the accepted
    /// ones under the term's task/material tag. Returns how many were
    /// accepted.
    pub fn ingest(&mut self, term: &QueryTerm, records: Vec<RawRecord>) -> usize {
        let mut accepted = 0;
        for record in records {
            self.summary.records_identified += 1;
            match filter::evaluate(&record) {
                Verdict::Accepted { tasks } => {
                    debug!(
                        title = %record.title,
                        tasks = ?tasks,
                        "Record accepted"
                    );
                    self.dedupe.ingest(record, (term.task, term.material));
                    accepted += 1;
                }
                Verdict::Rejected(reason) => {
                    debug!(title = %record.title, reason = %reason, "Record rejected");
                    self.summary.excluded += 1;
                    *self.summary.rejections.entry(reason.to_string()).or_insert(0) += 1;
                }
            }
        }
        accepted
    }

    /// Record a term whose remaining pages were abandoned after a fetch
    /// failure. The run continues with the next term.
    pub fn record_skipped_term(&mut self, term: &QueryTerm, error: &SearchError) {
        warn!(
            expression = term.expression,
            error = %error,
            transient = error.is_transient(),
            "Abandoning term after fetch failure"
        );
        self.summary.skipped_terms += 1;
    }

    /// Distinct records accumulated so far.
    pub fn included_count(&self) -> usize {
        self.dedupe.len()
    }

    /// Finalize the run: the merged record set in first-seen order, plus the
    /// accounting summary.
    pub fn finish(self) -> (Vec<IncludedRecord>, RunSummary) {
        (self.dedupe.finalize(), self.summary)
    }
}
