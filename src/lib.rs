//! # ndtsearch
//!
//! Systematic literature search pipeline for NDT-based structural assessment
//! reviews: queries OpenAlex with a fixed catalog of boolean search terms,
//! filters and deduplicates the results against inclusion/exclusion criteria,
//! and writes tabular metadata, citations, and PRISMA-style statistics.
//!
//! ## Modules
//!
//! - [`catalog`] - Static search-term catalog and keyword indicator lists
//! - [`openalex`] - OpenAlex API client with per-term cursor pagination
//! - [`filter`] - Inclusion/exclusion record filtering
//! - [`dedupe`] - Canonical-identifier deduplication
//! - [`prisma`] - Summary statistics over the final record set
//! - [`export`] - CSV, BibTeX, and JSON statistics writers
//! - [`pipeline`] - Run driver state tying filter and dedupe together
//! - [`error`] - Custom error types
//!
//! ## Matching caveat
//!
//! Keyword matching is case-insensitive substring matching, not tokenized: a
//! term inside a larger word counts (e.g. "gpr" inside "gprs"). This is a
//! documented property of the search protocol; consumers of the exported
//! dataset should account for the resulting false positives.

pub mod catalog;
pub mod dedupe;
pub mod error;
pub mod export;
pub mod filter;
pub mod openalex;
pub mod pipeline;
pub mod prisma;

pub use error::{Result, SearchError};
