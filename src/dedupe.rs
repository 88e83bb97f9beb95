//! Cross-term record deduplication.
//!
//! Records surface repeatedly across query terms. They are merged under a
//! canonical identifier (DOI when present, otherwise the normalized title):
//! the first-seen record keeps its metadata, later sightings only union in
//! their task/material tag. Iteration order is first-seen order.

use crate::catalog::{Material, Task};
use crate::openalex::RawRecord;
use std::collections::{BTreeSet, HashMap};

/// A record that passed filtering, carrying every task/material pair that
/// surfaced it. The tag set is never empty.
#[derive(Debug, Clone)]
pub struct IncludedRecord {
    pub record: RawRecord,
    pub tags: BTreeSet<(Task, Material)>,
}

impl IncludedRecord {
    /// Distinct assessment tasks across the tag set.
    pub fn tasks(&self) -> BTreeSet<Task> {
        self.tags.iter().map(|(t, _)| *t).collect()
    }

    /// Distinct structural materials across the tag set.
    pub fn materials(&self) -> BTreeSet<Material> {
        self.tags.iter().map(|(_, m)| *m).collect()
    }
}

/// Deduplication key: lowercased DOI when present and non-empty, otherwise
/// the lowercased, whitespace-collapsed title.
pub fn canonical_id(record: &RawRecord) -> String {
    match record.doi.as_deref().map(str::trim) {
        Some(doi) if !doi.is_empty() => doi.to_lowercase(),
        _ => record
            .title
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Accumulating map from canonical identifier to merged record.
#[derive(Debug, Default)]
pub struct Deduplicator {
    index: HashMap<String, usize>,
    records: Vec<IncludedRecord>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one accepted record under its canonical identifier.
    ///
    /// First sighting inserts the record with a single tag; later sightings
    /// union in the tag and leave every other field untouched.
    pub fn ingest(&mut self, record: RawRecord, tag: (Task, Material)) {
        let key = canonical_id(&record);
        match self.index.get(&key) {
            Some(&pos) => {
                self.records[pos].tags.insert(tag);
            }
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(IncludedRecord {
                    record,
                    tags: BTreeSet::from([tag]),
                });
            }
        }
    }

    /// Number of distinct records seen so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The merged record set, in first-seen order.
    pub fn finalize(self) -> Vec<IncludedRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, doi: Option<&str>) -> RawRecord {
        RawRecord {
            title: title.to_string(),
            doi: doi.map(str::to_string),
            ..RawRecord::default()
        }
    }

    const TAG_A: (Task, Material) = (Task::Geometry, Material::ReinforcedConcrete);
    const TAG_B: (Task, Material) = (Task::Strength, Material::ReinforcedConcrete);

    #[test]
    fn test_same_doi_merges_tags() {
        let mut dedupe = Deduplicator::new();
        dedupe.ingest(record("Title one", Some("10.1/x")), TAG_A);
        dedupe.ingest(record("Title two", Some("10.1/x")), TAG_B);

        let records = dedupe.finalize();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tags, BTreeSet::from([TAG_A, TAG_B]));
        // First-seen metadata wins.
        assert_eq!(records[0].record.title, "Title one");
    }

    #[test]
    fn test_doi_key_is_case_insensitive() {
        let mut dedupe = Deduplicator::new();
        dedupe.ingest(record("A", Some("10.1/X")), TAG_A);
        dedupe.ingest(record("B", Some("10.1/x")), TAG_B);
        assert_eq!(dedupe.len(), 1);
    }

    #[test]
    fn test_missing_doi_falls_back_to_normalized_title() {
        let mut dedupe = Deduplicator::new();
        dedupe.ingest(record("Crack  Detection in\tConcrete", None), TAG_A);
        dedupe.ingest(record("crack detection in concrete", None), TAG_B);
        dedupe.ingest(record("crack detection in concrete", Some("")), TAG_B);

        let records = dedupe.finalize();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tags, BTreeSet::from([TAG_A, TAG_B]));
    }

    #[test]
    fn test_different_titles_never_collapse() {
        let mut dedupe = Deduplicator::new();
        dedupe.ingest(record("Crack detection in concrete", None), TAG_A);
        dedupe.ingest(record("Crack detection in masonry", None), TAG_A);
        assert_eq!(dedupe.len(), 2);
    }

    #[test]
    fn test_repeated_tag_is_idempotent() {
        let mut dedupe = Deduplicator::new();
        dedupe.ingest(record("A", Some("10.1/x")), TAG_A);
        dedupe.ingest(record("A", Some("10.1/x")), TAG_A);

        let records = dedupe.finalize();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tags.len(), 1);
    }

    #[test]
    fn test_first_seen_order_preserved() {
        let mut dedupe = Deduplicator::new();
        dedupe.ingest(record("First", Some("10.1/a")), TAG_A);
        dedupe.ingest(record("Second", Some("10.1/b")), TAG_A);
        dedupe.ingest(record("Again first", Some("10.1/a")), TAG_B);
        dedupe.ingest(record("Third", Some("10.1/c")), TAG_A);

        let titles: Vec<String> = dedupe
            .finalize()
            .into_iter()
            .map(|r| r.record.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_tag_sets_never_empty() {
        let mut dedupe = Deduplicator::new();
        dedupe.ingest(record("A", None), TAG_A);
        for r in dedupe.finalize() {
            assert!(!r.tags.is_empty());
        }
    }
}
