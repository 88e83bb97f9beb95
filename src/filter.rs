//! Inclusion/exclusion filtering of raw records.
//!
//! A record survives when its searchable text mentions at least one core NDT
//! method, at least one structural material, and at least one assessment task
//! (or circular-construction context), and mentions none of the out-of-scope
//! exclusion words. Exclusion is checked first and always wins.
//!
//! Matching is case-insensitive substring matching, not tokenized. A keyword
//! inside a larger word counts; this is a documented limitation of the search
//! protocol, kept so the exported dataset stays comparable across runs.

use crate::catalog::{self, Task};
use crate::openalex::RawRecord;
use std::fmt;

/// Outcome of filtering one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Record is in scope; `tasks` lists the assessment tasks its text
    /// mentions (may be empty when only circular-construction context
    /// matched).
    Accepted { tasks: Vec<Task> },
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }
}

/// Why a record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Matched an out-of-scope domain word
    Excluded(&'static str),
    NoNdtMethod,
    NoMaterial,
    NoTask,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Excluded(word) => write!(f, "excluded: {word}"),
            RejectReason::NoNdtMethod => f.write_str("no core NDT method"),
            RejectReason::NoMaterial => f.write_str("no structural material"),
            RejectReason::NoTask => f.write_str("no assessment task or circular context"),
        }
    }
}

/// Lowercased title + abstract + concept labels. A missing abstract is
/// treated as empty.
fn searchable_text(record: &RawRecord) -> String {
    let mut text = record.title.to_lowercase();
    if let Some(abstract_text) = &record.abstract_text {
        text.push(' ');
        text.push_str(&abstract_text.to_lowercase());
    }
    for concept in &record.concepts {
        text.push(' ');
        text.push_str(&concept.to_lowercase());
    }
    text
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Decide whether a record is in scope. Pure; no side effects.
pub fn evaluate(record: &RawRecord) -> Verdict {
    let text = searchable_text(record);

    if let Some(word) = catalog::exclusion_terms()
        .iter()
        .copied()
        .find(|w| text.contains(w))
    {
        return Verdict::Rejected(RejectReason::Excluded(word));
    }

    if !contains_any(&text, catalog::ndt_method_terms()) {
        return Verdict::Rejected(RejectReason::NoNdtMethod);
    }

    if !contains_any(&text, catalog::material_terms()) {
        return Verdict::Rejected(RejectReason::NoMaterial);
    }

    let tasks: Vec<Task> = Task::ALL
        .into_iter()
        .filter(|t| contains_any(&text, catalog::task_terms(*t)))
        .collect();

    if tasks.is_empty() && !contains_any(&text, catalog::circular_terms()) {
        return Verdict::Rejected(RejectReason::NoTask);
    }

    Verdict::Accepted { tasks }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, abstract_text: Option<&str>) -> RawRecord {
        RawRecord {
            title: title.to_string(),
            abstract_text: abstract_text.map(str::to_string),
            ..RawRecord::default()
        }
    }

    #[test]
    fn test_accepts_in_scope_record() {
        let r = record(
            "Ultrasonic pulse velocity strength estimation of reinforced concrete columns",
            Some("Compressive strength was estimated on reinforced concrete members."),
        );
        match evaluate(&r) {
            Verdict::Accepted { tasks } => assert!(tasks.contains(&Task::Strength)),
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn test_exclusion_beats_inclusion() {
        // A perfect title match is still rejected when the abstract drifts
        // into an out-of-scope domain.
        let r = record(
            "Ultrasonic testing of concrete members",
            Some("Applications in food science quality control of concrete structure molds."),
        );
        assert_eq!(
            evaluate(&r),
            Verdict::Rejected(RejectReason::Excluded("food science"))
        );
    }

    #[test]
    fn test_rejects_without_ndt_method() {
        let r = record(
            "Compressive strength of reinforced concrete beams",
            Some("Destructive core sampling of concrete structure specimens."),
        );
        assert_eq!(evaluate(&r), Verdict::Rejected(RejectReason::NoNdtMethod));
    }

    #[test]
    fn test_rejects_without_material() {
        let r = record(
            "Impact echo defect detection in laboratory specimens",
            Some("Void detection with impact-echo."),
        );
        assert_eq!(evaluate(&r), Verdict::Rejected(RejectReason::NoMaterial));
    }

    #[test]
    fn test_rejects_without_task_or_circular() {
        let r = record(
            "Ground penetrating radar surveys of masonry wall construction",
            None,
        );
        assert_eq!(evaluate(&r), Verdict::Rejected(RejectReason::NoTask));
    }

    #[test]
    fn test_circular_context_satisfies_task_leg() {
        let r = record(
            "Ground penetrating radar screening of masonry wall components for structural reuse",
            None,
        );
        match evaluate(&r) {
            Verdict::Accepted { tasks } => assert!(tasks.is_empty()),
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_abstract_treated_as_empty() {
        let r = record(
            "Rebound hammer strength estimation of concrete bridge piers",
            None,
        );
        assert!(evaluate(&r).is_accepted());
    }

    #[test]
    fn test_concept_labels_are_searchable() {
        let mut r = record("Moisture content of timber building elements", None);
        assert_eq!(evaluate(&r), Verdict::Rejected(RejectReason::NoNdtMethod));
        r.concepts = vec!["Infrared thermography".to_string()];
        assert!(evaluate(&r).is_accepted());
    }

    #[test]
    fn test_substring_matching_is_not_tokenized() {
        // "gpr" matches inside a larger word; the protocol documents this.
        let r = record(
            "GPRS-era telemetry for moisture content monitoring of timber structure frames",
            None,
        );
        assert!(evaluate(&r).is_accepted());
    }

    #[test]
    fn test_multiple_tasks_detected() {
        let r = record(
            "Crack detection and corrosion assessment of reinforced concrete by half-cell potential",
            None,
        );
        match evaluate(&r) {
            Verdict::Accepted { tasks } => {
                assert!(tasks.contains(&Task::Defects));
                assert!(tasks.contains(&Task::Deterioration));
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }
}
