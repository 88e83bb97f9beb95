//! PRISMA-style summary statistics over the finalized record set.
//!
//! Single read-only pass: per-task and per-material counts come from each
//! record's tag set (a record covering three tasks increments three task
//! counters but counts once toward the total), year and journal counts fall
//! back to an "unknown" bucket when the field is missing.

use crate::catalog::{Material, Task};
use crate::dedupe::IncludedRecord;
use crate::pipeline::RunSummary;
use chrono::Local;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bucket label for records missing a year or venue.
const UNKNOWN: &str = "unknown";

/// Default size of the ranked journal list.
pub const DEFAULT_TOP_JOURNALS: usize = 20;

/// One entry of the ranked journal list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalCount {
    pub journal: String,
    pub count: usize,
}

/// Aggregate counts describing the search funnel. Computed once after the
/// record set is finalized; never mutated afterwards.
#[derive(Debug, Serialize)]
pub struct PrismaStats {
    pub database: String,
    pub search_date: String,
    pub date_range: String,
    /// Raw records seen before filtering and deduplication
    pub records_identified: usize,
    /// Distinct records in the final set
    pub records_included: usize,
    pub excluded: usize,
    pub skipped_terms: usize,
    pub open_access: usize,
    pub by_task: BTreeMap<String, usize>,
    pub by_material: BTreeMap<String, usize>,
    pub by_year: BTreeMap<String, usize>,
    /// Journals ranked by count descending, ties broken by name ascending
    pub top_journals: Vec<JournalCount>,
}

/// Walk the finalized record set and compute the summary statistics.
pub fn aggregate(
    records: &[IncludedRecord],
    summary: &RunSummary,
    year_range: (i32, i32),
    top_n: usize,
) -> PrismaStats {
    let mut by_task: BTreeMap<String, usize> = Task::ALL
        .iter()
        .map(|t| (t.label().to_string(), 0))
        .collect();
    let mut by_material: BTreeMap<String, usize> = Material::ALL
        .iter()
        .map(|m| (m.label().to_string(), 0))
        .collect();
    let mut by_year: BTreeMap<String, usize> = BTreeMap::new();
    let mut journals: BTreeMap<String, usize> = BTreeMap::new();
    let mut open_access = 0;

    for record in records {
        for task in record.tasks() {
            if let Some(count) = by_task.get_mut(task.label()) {
                *count += 1;
            }
        }
        for material in record.materials() {
            if let Some(count) = by_material.get_mut(material.label()) {
                *count += 1;
            }
        }

        let year_key = record
            .record
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());
        *by_year.entry(year_key).or_insert(0) += 1;

        let journal = record.record.venue.trim();
        let journal_key = if journal.is_empty() { UNKNOWN } else { journal };
        *journals.entry(journal_key.to_string()).or_insert(0) += 1;

        if record.record.open_access {
            open_access += 1;
        }
    }

    let mut top_journals: Vec<JournalCount> = journals
        .into_iter()
        .map(|(journal, count)| JournalCount { journal, count })
        .collect();
    // BTreeMap iteration already orders names ascending, so a stable sort by
    // descending count keeps that order within equal counts.
    top_journals.sort_by(|a, b| b.count.cmp(&a.count));
    top_journals.truncate(top_n);

    PrismaStats {
        database: "OpenAlex".to_string(),
        search_date: Local::now().format("%Y-%m-%d").to_string(),
        date_range: format!("{}-{}", year_range.0, year_range.1),
        records_identified: summary.records_identified,
        records_included: records.len(),
        excluded: summary.excluded,
        skipped_terms: summary.skipped_terms,
        open_access,
        by_task,
        by_material,
        by_year,
        top_journals,
    }
}
