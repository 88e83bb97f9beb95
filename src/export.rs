//! Output artifact writers.
//!
//! Three independent serializers over the finalized record set: tabular
//! metadata (CSV), citations (BibTeX), and the PRISMA statistics document
//! (JSON). Each writer is a total function of its inputs; one failing does
//! not stop the others from being attempted.

use crate::dedupe::IncludedRecord;
use crate::error::{Result, SearchError};
use crate::prisma::PrismaStats;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

/// Delimiter for multi-valued CSV fields
const LIST_SEPARATOR: &str = "; ";

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    authors: String,
    year: String,
    doi: &'a str,
    journal: &'a str,
    abstract_text: &'a str,
    tasks: String,
    materials: String,
    citations: i64,
    open_access: bool,
    url: &'a str,
    openalex_id: &'a str,
}

impl<'a> CsvRow<'a> {
    fn from_record(record: &'a IncludedRecord) -> Self {
        let r = &record.record;
        Self {
            title: &r.title,
            authors: r.authors.join(LIST_SEPARATOR),
            year: r.year.map(|y| y.to_string()).unwrap_or_default(),
            doi: r.doi.as_deref().unwrap_or(""),
            journal: &r.venue,
            abstract_text: r.abstract_text.as_deref().unwrap_or(""),
            tasks: record
                .tasks()
                .iter()
                .map(|t| t.label())
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
            materials: record
                .materials()
                .iter()
                .map(|m| m.label())
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
            citations: r.cited_by,
            open_access: r.open_access,
            url: &r.url,
            openalex_id: &r.openalex_id,
        }
    }
}

/// Write the tabular metadata file, one row per record, ordered by year
/// descending then citation count descending.
pub fn write_csv(path: &Path, records: &[IncludedRecord]) -> Result<()> {
    let mut ordered: Vec<&IncludedRecord> = records.iter().collect();
    ordered.sort_by(|a, b| {
        b.record
            .year
            .cmp(&a.record.year)
            .then(b.record.cited_by.cmp(&a.record.cited_by))
    });

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| SearchError::Output(format!("{}: {e}", path.display())))?;

    for record in ordered {
        wtr.serialize(CsvRow::from_record(record))
            .map_err(|e| SearchError::Output(format!("{}: {e}", path.display())))?;
    }

    wtr.flush()
        .map_err(|e| SearchError::Output(format!("{}: {e}", path.display())))?;
    Ok(())
}

/// Write the citation file, one `@article` entry per record.
pub fn write_bibtex(path: &Path, records: &[IncludedRecord]) -> Result<()> {
    let mut seen_keys: HashMap<String, usize> = HashMap::new();
    let mut entries = Vec::with_capacity(records.len());

    for record in records {
        let r = &record.record;
        let base = cite_key_base(r.authors.first().map(String::as_str), r.year);
        let occurrence = seen_keys.entry(base.clone()).or_insert(0);
        let key = disambiguate(&base, *occurrence);
        *occurrence += 1;

        let mut entry = String::new();
        let _ = writeln!(entry, "@article{{{key},");
        let _ = writeln!(entry, "  title = {{{}}},", escape_braces(&r.title));
        let _ = writeln!(entry, "  author = {{{}}},", r.authors.join(" and "));
        let _ = writeln!(
            entry,
            "  year = {{{}}},",
            r.year.map(|y| y.to_string()).unwrap_or_default()
        );
        let _ = writeln!(entry, "  journal = {{{}}},", escape_braces(&r.venue));
        if let Some(doi) = r.doi.as_deref() {
            let _ = writeln!(entry, "  doi = {{{doi}}},");
        }
        entry.push('}');
        entries.push(entry);
    }

    std::fs::write(path, entries.join("\n\n"))
        .map_err(|e| SearchError::Output(format!("{}: {e}", path.display())))?;
    Ok(())
}

/// Write the statistics document as pretty-printed JSON.
pub fn write_stats(path: &Path, stats: &PrismaStats) -> Result<()> {
    let body = serde_json::to_string_pretty(stats)
        .map_err(|e| SearchError::Output(format!("{}: {e}", path.display())))?;
    std::fs::write(path, body)
        .map_err(|e| SearchError::Output(format!("{}: {e}", path.display())))?;
    Ok(())
}

/// Citation key stem: first author's surname plus year, ASCII-sanitized.
fn cite_key_base(first_author: Option<&str>, year: Option<i32>) -> String {
    let surname = first_author
        .and_then(|a| a.split_whitespace().last())
        .unwrap_or("Unknown");
    let year = year.map(|y| y.to_string()).unwrap_or_default();
    format!("{surname}{year}")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Append a spreadsheet-style letter suffix on key collision: the first use
/// keeps the bare key, later uses get `a`, `b`, ..., `z`, `aa`, ...
fn disambiguate(base: &str, occurrence: usize) -> String {
    if occurrence == 0 {
        return base.to_string();
    }
    let mut n = occurrence - 1;
    let mut suffix = String::new();
    loop {
        suffix.insert(0, (b'a' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    format!("{base}{suffix}")
}

fn escape_braces(text: &str) -> String {
    text.replace('{', "\\{").replace('}', "\\}")
}
